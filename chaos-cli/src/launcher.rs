//! Engine launcher.
//!
//! Resolves the platform-specific engine executable that ships next to the
//! running binary, forwards arguments unchanged, inherits stdio and reports
//! the child's exit code.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use thiserror::Error;

/// Engine executable name without platform suffix.
pub const ENGINE_BINARY: &str = "chaos-proxy";

#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("Cannot locate the running executable: {0}")]
    CurrentExe(#[source] std::io::Error),

    #[error("Engine binary not found at {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to start {}: {source}", path.display())]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Executable name for the given platform.
pub fn binary_name(windows: bool) -> String {
    if windows {
        format!("{}.exe", ENGINE_BINARY)
    } else {
        ENGINE_BINARY.to_string()
    }
}

/// Engine path for a launcher located at `exe`.
pub fn engine_path_near(exe: &Path, windows: bool) -> PathBuf {
    let dir = exe.parent().unwrap_or_else(|| Path::new("."));
    dir.join(binary_name(windows))
}

/// Engine path next to the running executable.
pub fn engine_path() -> Result<PathBuf, LaunchError> {
    let exe = std::env::current_exe().map_err(LaunchError::CurrentExe)?;
    Ok(engine_path_near(&exe, cfg!(windows)))
}

/// Run the engine at `path` to completion. Returns its exit code, or `None`
/// when the child has none (terminated by a signal).
pub fn run_at<I>(path: &Path, args: I) -> Result<Option<i32>, LaunchError>
where
    I: IntoIterator<Item = OsString>,
{
    if !path.is_file() {
        return Err(LaunchError::NotFound { path: path.to_path_buf() });
    }
    tracing::debug!("Launching {}", path.display());

    let status = Command::new(path)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|source| LaunchError::Spawn { path: path.to_path_buf(), source })?;

    tracing::debug!("Engine exited: {}", status);
    Ok(status.code())
}

/// Run the engine that ships next to this executable.
pub fn run<I>(args: I) -> Result<Option<i32>, LaunchError>
where
    I: IntoIterator<Item = OsString>,
{
    run_at(&engine_path()?, args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_name_per_platform() {
        assert_eq!(binary_name(false), "chaos-proxy");
        assert_eq!(binary_name(true), "chaos-proxy.exe");
    }

    #[test]
    fn test_engine_path_is_sibling() {
        let path = engine_path_near(Path::new("/opt/chaos/bin/chaos-runner"), false);
        assert_eq!(path, PathBuf::from("/opt/chaos/bin/chaos-proxy"));
    }

    #[test]
    fn test_missing_engine() {
        let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("{e}"));
        let err = run_at(&dir.path().join("chaos-proxy"), Vec::new());
        assert!(matches!(err, Err(LaunchError::NotFound { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_forwards_args_and_exit_code() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("{e}"));
        let engine = dir.path().join("chaos-proxy");
        std::fs::write(&engine, "#!/bin/sh\n[ \"$1\" = \"--port\" ] && [ \"$2\" = \"8080\" ] && exit 7\nexit 1\n")
            .unwrap_or_else(|e| panic!("{e}"));
        std::fs::set_permissions(&engine, std::fs::Permissions::from_mode(0o755))
            .unwrap_or_else(|e| panic!("{e}"));

        let code = run_at(&engine, vec![OsString::from("--port"), OsString::from("8080")]);
        assert_eq!(code.ok().flatten(), Some(7));
    }
}
