//! Schema module writer.
//!
//! ## `write_module` protocol
//!
//! 1. Consult the [`CopyPolicy`]: with `SkipExisting`, an existing target is
//!    left alone without comparing contents.
//! 2. Write the bytes to `<path>.config-model.tmp`.
//! 3. Rename to the final path (atomic on POSIX).
//! 4. On rename failure, remove the temporary file.

use std::path::{Path, PathBuf};

use config_model_core::CopyPolicy;

use crate::error::{io_err, CompileError, CompileStep};

/// Outcome of writing one schema module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteResult {
    /// The file was written (absent before, or overwritten by policy).
    Written { path: PathBuf },
    /// The file already existed and the policy left it untouched.
    Skipped { path: PathBuf },
}

impl WriteResult {
    pub fn path(&self) -> &Path {
        match self {
            WriteResult::Written { path } | WriteResult::Skipped { path } => path,
        }
    }
}

/// Write `data` to `path` according to `policy`.
pub(crate) fn write_module(
    path: &Path,
    data: &[u8],
    policy: CopyPolicy,
) -> Result<WriteResult, CompileError> {
    write_module_with_tmp(path, data, policy, &tmp_path(path))
}

/// `<path>.config-model.tmp`, built on the raw `OsStr` so non-UTF-8 names
/// keep their bytes.
fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".config-model.tmp");
    PathBuf::from(tmp)
}

fn write_module_with_tmp(
    path: &Path,
    data: &[u8],
    policy: CopyPolicy,
    tmp: &Path,
) -> Result<WriteResult, CompileError> {
    if policy == CopyPolicy::SkipExisting && path.exists() {
        tracing::debug!("schema module already present, skipping: {}", path.display());
        return Ok(WriteResult::Skipped {
            path: path.to_path_buf(),
        });
    }

    let step = CompileStep::CopyModules;
    std::fs::write(tmp, data).map_err(|e| io_err(step, tmp, e))?;

    if let Err(e) = std::fs::rename(tmp, path) {
        let _ = std::fs::remove_file(tmp);
        return Err(io_err(step, path, e));
    }

    tracing::debug!("wrote schema module: {}", path.display());
    Ok(WriteResult::Written {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn first_write_returns_written() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("devicesim@1.0.0.yang");
        let result = write_module(&path, b"module devicesim {}", CopyPolicy::SkipExisting).unwrap();
        assert!(matches!(result, WriteResult::Written { .. }));
        assert_eq!(fs::read(&path).unwrap(), b"module devicesim {}");
    }

    #[test]
    fn skip_existing_never_rewrites() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("devicesim@1.0.0.yang");
        fs::write(&path, "stale").unwrap();
        let result = write_module(&path, b"fresh", CopyPolicy::SkipExisting).unwrap();
        assert!(matches!(result, WriteResult::Skipped { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), "stale");
    }

    #[test]
    fn overwrite_replaces_content() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("devicesim@1.0.0.yang");
        fs::write(&path, "stale").unwrap();
        let result = write_module(&path, b"fresh", CopyPolicy::Overwrite).unwrap();
        assert!(matches!(result, WriteResult::Written { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), "fresh");
    }

    #[test]
    fn tmp_file_removed_after_write() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("clean.yang");
        write_module(&path, b"data", CopyPolicy::Overwrite).unwrap();
        let tmp_path = PathBuf::from(format!("{}.config-model.tmp", path.display()));
        assert!(!tmp_path.exists(), ".config-model.tmp must be cleaned up");
    }

    #[test]
    fn missing_directory_is_copy_modules_io_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("yang").join("missing.yang");
        let err = write_module(&path, b"data", CopyPolicy::SkipExisting).unwrap_err();
        assert_eq!(err.step(), Some(CompileStep::CopyModules));
        assert!(matches!(err, CompileError::Io { .. }));
    }

    #[test]
    fn rename_onto_directory_fails_and_cleans_tmp() {
        let root = TempDir::new().unwrap();
        let path = root.path().join("devicesim@1.0.0.yang");
        fs::create_dir_all(path.join("occupied")).unwrap();

        let err = write_module(&path, b"new content", CopyPolicy::Overwrite).unwrap_err();
        assert_eq!(err.step(), Some(CompileStep::CopyModules));
        assert!(matches!(err, CompileError::Io { .. }), "got: {err}");
        assert!(path.join("occupied").is_dir(), "target must be left as it was");
        assert!(!tmp_path(&path).exists(), ".config-model.tmp should be cleaned up");
    }

    #[test]
    fn tmp_path_is_a_sibling() {
        let path = Path::new("/out/devicesim_1_0_0/yang/devicesim@1.0.0.yang");
        assert_eq!(
            tmp_path(path),
            PathBuf::from("/out/devicesim_1_0_0/yang/devicesim@1.0.0.yang.config-model.tmp")
        );
    }

    #[test]
    #[cfg(unix)]
    fn non_utf8_names_keep_their_bytes() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let root = TempDir::new().unwrap();
        let path = root.path().join(OsStr::from_bytes(b"dev\xffsim@1.0.0.yang"));

        let tmp = tmp_path(&path);
        assert_eq!(tmp.parent(), path.parent());
        assert!(tmp
            .file_name()
            .unwrap()
            .as_bytes()
            .starts_with(b"dev\xffsim@1.0.0.yang"));

        write_module(&path, b"data", CopyPolicy::Overwrite).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"data");
        assert!(!tmp.exists());
    }
}
