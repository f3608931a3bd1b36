//! Shared utilities for command implementations.

use std::path::{Path, PathBuf};

use tandem_config::{BuildPlan, ConfigDiscovery, ProjectConfig, MODE_ENV_VAR};
use tracing::debug;

use crate::error::Result;

/// Resolve a path relative to a working directory.
pub fn resolve_path(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

/// The project root: `--cwd` against the process directory, or the process
/// directory itself.
pub fn project_root(cwd: Option<&Path>) -> Result<PathBuf> {
    let current = std::env::current_dir()?;
    Ok(match cwd {
        Some(dir) => resolve_path(dir, &current),
        None => current,
    })
}

/// The raw mode signal: `--mode` if given, otherwise `NODE_ENV`.
///
/// This is the only place the process environment is consulted. A value
/// that is not valid UTF-8 is kept lossily so it is reported as set.
pub fn mode_signal(flag: Option<String>) -> Option<String> {
    flag.or_else(|| {
        std::env::var_os(MODE_ENV_VAR).map(|value| value.to_string_lossy().into_owned())
    })
}

/// Load the project config under `root` and assemble the plan.
pub fn assemble(root: &Path, mode: Option<String>) -> Result<(ProjectConfig, BuildPlan)> {
    let config = ConfigDiscovery::new(root).load_or_default()?;
    debug!(root = %config.layout.root.display(), "project layout loaded");

    let signal = mode_signal(mode);
    let plan = BuildPlan::assemble(signal.as_deref(), &config)?;
    Ok((config, plan))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn relative_paths_join_cwd() {
        let cwd = Path::new("/work");
        assert_eq!(resolve_path(Path::new("site"), cwd), PathBuf::from("/work/site"));
        assert_eq!(resolve_path(Path::new("/srv/site"), cwd), PathBuf::from("/srv/site"));
    }

    #[test]
    #[serial]
    fn flag_wins_over_environment() {
        unsafe { std::env::set_var(MODE_ENV_VAR, "production") };
        assert_eq!(
            mode_signal(Some("development".into())).as_deref(),
            Some("development")
        );
        assert_eq!(mode_signal(None).as_deref(), Some("production"));
        unsafe { std::env::remove_var(MODE_ENV_VAR) };
        assert_eq!(mode_signal(None), None);
    }

    #[cfg(unix)]
    #[test]
    #[serial]
    fn non_utf8_environment_is_reported_lossily() {
        use std::ffi::OsString;
        use std::os::unix::ffi::OsStringExt;

        unsafe { std::env::set_var(MODE_ENV_VAR, OsString::from_vec(vec![0x66, 0x6f, 0xff])) };
        let signal = mode_signal(None);
        unsafe { std::env::remove_var(MODE_ENV_VAR) };

        let signal = signal.unwrap();
        assert!(signal.starts_with("fo"));
        assert!(tandem_config::resolve_mode(Some(signal.as_str())).is_err());
    }
}
