//! Path validation
//!
//! Confines every caller-supplied path to the sandbox root.

use log::{info, warn};
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::{SandboxError, SecurityError, SecurityViolation};

/// A fixed directory outside of which no operation may read, write or report.
///
/// The root is canonicalized once when the sandbox is opened and never changes
/// afterwards. Several sandboxes can live side by side in one process.
#[derive(Debug, Clone)]
pub struct Sandbox {
    root: PathBuf,
}

/// A path that was inside the sandbox at the moment it was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    absolute: PathBuf,
    relative: PathBuf,
}

impl ResolvedPath {
    pub fn absolute(&self) -> &Path {
        &self.absolute
    }

    pub fn relative(&self) -> &Path {
        &self.relative
    }

    /// Root-relative form with `/` separators, `.` for the root itself.
    pub fn display_relative(&self) -> String {
        relative_display(&self.relative)
    }

    pub fn is_root(&self) -> bool {
        self.relative.as_os_str().is_empty()
    }
}

impl Sandbox {
    /// Opens a sandbox rooted at `root`, creating the directory if needed.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, SandboxError> {
        let root = root.as_ref();

        fs::create_dir_all(root).map_err(|source| SandboxError::RootUnavailable {
            root: root.to_path_buf(),
            source,
        })?;

        let canonical = root
            .canonicalize()
            .map_err(|source| SandboxError::RootUnavailable {
                root: root.to_path_buf(),
                source,
            })?;

        if !canonical.is_dir() {
            return Err(SandboxError::RootNotADirectory(canonical));
        }

        info!("Sandbox root: {}", canonical.display());
        Ok(Self { root: canonical })
    }

    /// Canonical sandbox root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves `input` under the root, or explains why it may not be used.
    ///
    /// `\` is accepted as a separator. `..` may walk back up inside the
    /// sandbox but never past the root, and symlinks met along the way must
    /// point back inside.
    pub fn resolve(&self, input: &str) -> Result<ResolvedPath, SecurityError> {
        let result = self.resolve_inner(input);
        if let Err(e) = &result {
            warn!("Blocked path {:?}: {}", input, e.violation);
        }
        result
    }

    fn resolve_inner(&self, input: &str) -> Result<ResolvedPath, SecurityError> {
        let deny = |violation| SecurityError::new(input, violation);

        if input.contains('\0') {
            return Err(deny(SecurityViolation::NulByte));
        }

        let normalized = input.replace('\\', "/");
        if has_drive_prefix(&normalized) || normalized.starts_with("//") {
            return Err(deny(SecurityViolation::DrivePrefix));
        }
        if normalized.starts_with('/') {
            return Err(deny(SecurityViolation::AbsolutePath));
        }

        let mut resolved = self.root.clone();
        for component in Path::new(&normalized).components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    if resolved == self.root {
                        return Err(deny(SecurityViolation::ParentTraversal));
                    }
                    resolved.pop();
                }
                Component::Normal(segment) => {
                    resolved.push(segment);
                    if is_symlink(&resolved) {
                        resolved = fs::canonicalize(&resolved)
                            .map_err(|e| deny(SecurityViolation::Unresolvable(e.to_string())))?;
                        if !is_within(&self.root, &resolved) {
                            return Err(deny(SecurityViolation::SymlinkEscape));
                        }
                    }
                }
                Component::RootDir => return Err(deny(SecurityViolation::AbsolutePath)),
                Component::Prefix(_) => return Err(deny(SecurityViolation::DrivePrefix)),
            }
        }

        if !is_within(&self.root, &resolved) {
            return Err(deny(SecurityViolation::OutsideRoot));
        }

        let relative = resolved
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .map_err(|_| deny(SecurityViolation::OutsideRoot))?;

        Ok(ResolvedPath {
            absolute: resolved,
            relative,
        })
    }

    /// Re-checks an absolute path built from an already resolved one, e.g. a
    /// sibling name or a directory plus basename.
    pub fn confine(&self, absolute: &Path) -> Result<ResolvedPath, SecurityError> {
        match absolute.strip_prefix(&self.root) {
            Ok(relative) => self.resolve(&relative_display(relative)),
            Err(_) => {
                let input = absolute.to_string_lossy();
                warn!("Blocked path {:?}: outside sandbox root", input);
                Err(SecurityError::new(&input, SecurityViolation::OutsideRoot))
            }
        }
    }

    /// Root-relative display form of a path known to be under the root.
    pub fn relative_display(&self, absolute: &Path) -> String {
        match absolute.strip_prefix(&self.root) {
            Ok(relative) => relative_display(relative),
            Err(_) => absolute.to_string_lossy().into_owned(),
        }
    }
}

/// Segment-aware containment: `/a/b` contains `/a/b/c` but not `/a/bc`.
pub fn is_within(root: &Path, candidate: &Path) -> bool {
    candidate.starts_with(root)
}

fn has_drive_prefix(input: &str) -> bool {
    let mut chars = input.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some(letter), Some(':')) if letter.is_ascii_alphabetic()
    )
}

fn is_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path)
        .map(|metadata| metadata.file_type().is_symlink())
        .unwrap_or(false)
}

fn relative_display(relative: &Path) -> String {
    if relative.as_os_str().is_empty() {
        return ".".to_string();
    }
    relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn containment_respects_segment_boundaries() {
        assert!(is_within(Path::new("/docs"), Path::new("/docs")));
        assert!(is_within(Path::new("/docs"), Path::new("/docs/a/b.md")));
        assert!(!is_within(Path::new("/docs"), Path::new("/docsEVIL/x")));
        assert!(!is_within(Path::new("/a/b"), Path::new("/a/bc")));
        assert!(!is_within(Path::new("/docs"), Path::new("/")));
    }

    #[test]
    fn drive_prefixes_are_recognised() {
        assert!(has_drive_prefix("C:/Windows"));
        assert!(has_drive_prefix("d:"));
        assert!(!has_drive_prefix("notes.md"));
        assert!(!has_drive_prefix("1:/x"));
        assert!(!has_drive_prefix(""));
    }

    #[test]
    fn relative_display_uses_forward_slashes() {
        assert_eq!(relative_display(Path::new("")), ".");
        assert_eq!(relative_display(Path::new("a/b.md")), "a/b.md");
    }
}
