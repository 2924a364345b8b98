use std::fs;
use tempfile::TempDir;

use docbox::error::SecurityViolation;
use docbox::sandbox::Sandbox;

fn setup() -> (TempDir, Sandbox) {
    let dir = TempDir::new().unwrap();
    let sandbox = Sandbox::open(dir.path().join("docs")).unwrap();
    (dir, sandbox)
}

#[test]
fn parent_traversal_never_escapes() {
    let (_dir, sandbox) = setup();

    for input in ["..", "../x.md", "a/../../x.md", "a/b/../../../x.md", "..\\x.md", "./../x"] {
        let err = sandbox.resolve(input).unwrap_err();
        assert_eq!(err.violation, SecurityViolation::ParentTraversal, "{input}");
    }
}

#[test]
fn traversal_that_stays_inside_is_allowed() {
    let (_dir, sandbox) = setup();

    let resolved = sandbox.resolve("a/b/../c.md").unwrap();
    assert_eq!(resolved.display_relative(), "a/c.md");
    assert!(sandbox.resolve("a/..").unwrap().is_root());
}

#[test]
fn absolute_and_prefixed_paths_are_rejected() {
    let (_dir, sandbox) = setup();

    assert_eq!(
        sandbox.resolve("/etc/passwd").unwrap_err().violation,
        SecurityViolation::AbsolutePath
    );
    assert_eq!(
        sandbox.resolve("\\etc\\passwd").unwrap_err().violation,
        SecurityViolation::AbsolutePath
    );
    for input in ["C:\\Windows\\win.ini", "c:notes.md", "\\\\server\\share\\x.md", "//server/share"] {
        assert_eq!(
            sandbox.resolve(input).unwrap_err().violation,
            SecurityViolation::DrivePrefix,
            "{input}"
        );
    }
}

#[test]
fn nul_bytes_are_rejected() {
    let (_dir, sandbox) = setup();
    let err = sandbox.resolve("notes\0.md").unwrap_err();
    assert_eq!(err.violation, SecurityViolation::NulByte);
    assert!(err.to_string().starts_with("Access denied"));
}

#[test]
fn mixed_separators_and_dots_normalize() {
    let (_dir, sandbox) = setup();

    let resolved = sandbox.resolve(".\\a/./b\\c.md").unwrap();
    assert_eq!(resolved.display_relative(), "a/b/c.md");
    assert!(resolved.absolute().starts_with(sandbox.root()));
    assert!(sandbox.resolve("").unwrap().is_root());
    assert!(sandbox.resolve(".").unwrap().is_root());
}

#[test]
fn sandboxes_are_independent() {
    let dir = TempDir::new().unwrap();
    let first = Sandbox::open(dir.path().join("one")).unwrap();
    let second = Sandbox::open(dir.path().join("two")).unwrap();

    assert!(first.resolve("../two/x.md").is_err());
    assert!(first.resolve("x.md").unwrap().absolute().starts_with(first.root()));
    assert!(second.resolve("x.md").unwrap().absolute().starts_with(second.root()));
}

#[test]
fn opening_a_file_as_root_fails() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("plain.txt");
    fs::write(&file, "x").unwrap();

    assert!(Sandbox::open(&file).is_err());
}

#[cfg(unix)]
mod links {
    use super::*;
    use std::os::unix::fs::symlink;

    #[test]
    fn links_to_a_prefix_sibling_are_rejected() {
        let dir = TempDir::new().unwrap();
        let sandbox = Sandbox::open(dir.path().join("docs")).unwrap();
        let evil = dir.path().join("docsEVIL");
        fs::create_dir(&evil).unwrap();
        fs::write(evil.join("secret.md"), "secret").unwrap();
        symlink(&evil, sandbox.root().join("escape")).unwrap();

        let err = sandbox.resolve("escape/secret.md").unwrap_err();
        assert_eq!(err.violation, SecurityViolation::SymlinkEscape);
    }

    #[test]
    fn links_that_stay_inside_are_followed() {
        let (_dir, sandbox) = setup();
        fs::create_dir(sandbox.root().join("real")).unwrap();
        symlink(sandbox.root().join("real"), sandbox.root().join("alias")).unwrap();

        let resolved = sandbox.resolve("alias/page.md").unwrap();
        assert_eq!(resolved.display_relative(), "real/page.md");
    }
}
