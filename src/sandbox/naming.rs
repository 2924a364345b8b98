//! Markdown naming conventions

use crate::error::DomainError;

pub const MARKDOWN_EXTENSION: &str = ".md";

/// Appends `.md` unless the name already ends with it.
pub fn ensure_markdown_extension(name: &str) -> String {
    if name.ends_with(MARKDOWN_EXTENSION) {
        name.to_string()
    } else {
        format!("{name}{MARKDOWN_EXTENSION}")
    }
}

/// Rejects blank names before they reach the validator.
pub fn require_name(argument: &'static str, name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        Err(DomainError::EmptyName(argument))
    } else {
        Ok(())
    }
}

pub fn is_markdown(name: &str) -> bool {
    name.ends_with(MARKDOWN_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_extension_once() {
        assert_eq!(ensure_markdown_extension("notes"), "notes.md");
        assert_eq!(ensure_markdown_extension("notes.md"), "notes.md");
        assert_eq!(ensure_markdown_extension("a/b.txt"), "a/b.txt.md");
    }

    #[test]
    fn blank_names_are_refused() {
        assert_eq!(
            require_name("filename", "  "),
            Err(DomainError::EmptyName("filename"))
        );
        assert!(require_name("filename", "x").is_ok());
    }
}
