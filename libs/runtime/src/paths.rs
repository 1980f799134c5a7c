use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};

/// Resolve the server home directory into an absolute path.
///
/// - `None` (or blank) → platform default: `$HOME/<default_subdir>` on Unix,
///   `%APPDATA%/<default_subdir>` on Windows.
/// - A leading `~` is expanded against the user's home directory.
/// - Relative paths are resolved against the current working directory.
///
/// When `create` is set the directory is created if it does not exist yet.
pub fn resolve_home_dir(
    configured: Option<String>,
    default_subdir: &str,
    create: bool,
) -> Result<PathBuf> {
    let resolved = match configured.as_deref().map(str::trim) {
        None | Some("") => platform_base_dir()?.join(default_subdir),
        Some(raw) => expand_tilde(raw)?,
    };

    let absolute = if resolved.is_absolute() {
        resolved
    } else {
        std::env::current_dir()
            .context("cannot read current directory")?
            .join(resolved)
    };

    if create {
        std::fs::create_dir_all(&absolute)
            .with_context(|| format!("cannot create home dir '{}'", absolute.display()))?;
    }

    Ok(absolute)
}

fn expand_tilde(raw: &str) -> Result<PathBuf> {
    if raw == "~" {
        return user_home();
    }
    if let Some(rest) = raw.strip_prefix("~/").or_else(|| raw.strip_prefix("~\\")) {
        return Ok(user_home()?.join(rest));
    }
    Ok(Path::new(raw).to_path_buf())
}

fn user_home() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| anyhow!("user home directory is not available"))
}

#[cfg(target_os = "windows")]
fn platform_base_dir() -> Result<PathBuf> {
    dirs::config_dir().ok_or_else(|| anyhow!("APPDATA directory is not available"))
}

#[cfg(not(target_os = "windows"))]
fn platform_base_dir() -> Result<PathBuf> {
    user_home()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn absolute_path_is_kept_and_created() {
        let tmp = tempdir().unwrap();
        let target = tmp.path().join("nested/home");

        let out = resolve_home_dir(Some(target.to_string_lossy().into()), ".quotes", true).unwrap();

        assert_eq!(out, target);
        assert!(out.is_dir());
    }

    #[test]
    fn relative_path_becomes_absolute() {
        let out = resolve_home_dir(Some("some/relative".into()), ".quotes", false).unwrap();
        assert!(out.is_absolute());
        assert!(out.ends_with("some/relative"));
    }

    #[test]
    fn tilde_is_expanded() {
        let out = resolve_home_dir(Some("~/.tilde_test".into()), ".quotes", false).unwrap();
        assert!(out.is_absolute());
        assert!(!out.to_string_lossy().starts_with('~'));
        assert!(out.ends_with(".tilde_test"));
    }
}
