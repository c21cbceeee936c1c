//! Atomic file replacement.
//!
//! New contents go to a temporary file next to the target, pick up the
//! target's permissions, and are renamed over it. A reader sees either the
//! old file or the new one, never a truncated mix.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

/// Replace the contents of the existing file at `path` with `contents`.
///
/// Symlinks are followed: the file they point to is replaced and the link
/// itself is left alone.
///
/// # Errors
///
/// Returns an error if `path` does not exist, the temporary file cannot be
/// created in the same directory, or the write or rename fails.
pub fn replace_file(path: &Path, contents: &[u8]) -> io::Result<()> {
    let target = fs::canonicalize(path)?;
    let permissions = fs::metadata(&target)?.permissions();
    let dir = target
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no parent directory"))?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    fs::set_permissions(tmp.path(), permissions)?;
    tmp.persist(&target).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("theme.css");
        fs::write(&path, "a { color: #010101 }").unwrap();

        replace_file(&path, b"a { color: #000000 }").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "a { color: #000000 }");
    }

    #[test]
    fn writes_bytes_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin1.css");
        fs::write(&path, b"/* \xa9 */ #030303").unwrap();

        replace_file(&path, b"/* \xa9 */ #000000").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"/* \xa9 */ #000000".to_vec());
    }

    #[test]
    fn leaves_no_temporary_files_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.scss");
        fs::write(&path, "$x: #fefefe;").unwrap();

        replace_file(&path, b"$x: #ffffff;").unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("tokens.scss")]);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = replace_file(&dir.path().join("nope.css"), b"x").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[cfg(unix)]
    #[test]
    fn keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("colors.less");
        fs::write(&path, "@c: #111111;").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();

        replace_file(&path, b"@c: #000000;").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
    }

    #[cfg(unix)]
    #[test]
    fn writes_through_symlinks() {
        let dir = tempfile::tempdir().unwrap();
        let real = dir.path().join("real.css");
        let link = dir.path().join("link.css");
        fs::write(&real, "#111111").unwrap();
        std::os::unix::fs::symlink(&real, &link).unwrap();

        replace_file(&link, b"#000000").unwrap();

        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_to_string(&real).unwrap(), "#000000");
    }
}
