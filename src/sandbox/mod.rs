//! Sandbox confinement
//!
//! Resolves caller-supplied paths against a fixed root and applies the
//! markdown naming convention.

pub mod naming;
pub mod validation;

pub use naming::{ensure_markdown_extension, is_markdown, require_name};
pub use validation::{ResolvedPath, Sandbox, is_within};
