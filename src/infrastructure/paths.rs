//! Filesystem locations for chefdesk state.
//!
//! Follows the XDG base directory layout: data under
//! `$XDG_DATA_HOME/chefdesk` (falling back to `~/.local/share/chefdesk`),
//! config under `$XDG_CONFIG_HOME/chefdesk` (falling back to `~/.config/chefdesk`).

use std::env;
use std::path::PathBuf;

const APP_DIR: &str = "chefdesk";

/// Returns the data directory, e.g. `~/.local/share/chefdesk`.
///
/// Falls back to the current directory when neither `XDG_DATA_HOME` nor
/// `HOME` is set.
///
/// # Examples
///
/// ```
/// use chefdesk::infrastructure::get_data_dir;
///
/// assert!(get_data_dir().ends_with("chefdesk"));
/// ```
#[must_use]
pub fn get_data_dir() -> PathBuf {
    resolve(
        env::var_os("XDG_DATA_HOME").map(PathBuf::from),
        env::var_os("HOME").map(PathBuf::from),
        &[".local", "share"],
    )
}

/// Returns the config directory, e.g. `~/.config/chefdesk`.
#[must_use]
pub fn get_config_dir() -> PathBuf {
    resolve(
        env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        env::var_os("HOME").map(PathBuf::from),
        &[".config"],
    )
}

/// Default location of the persisted session.
#[must_use]
pub fn default_session_file() -> PathBuf {
    get_data_dir().join("session.json")
}

/// Default location of the TOML config file.
#[must_use]
pub fn default_config_file() -> PathBuf {
    get_config_dir().join("config.toml")
}

/// Expands a leading `~` to `$HOME`. Other paths are returned unchanged.
///
/// # Examples
///
/// ```
/// use chefdesk::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("/var/log/chefdesk.json").to_str(), Some("/var/log/chefdesk.json"));
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    expand_with_home(path, env::var_os("HOME").map(PathBuf::from))
}

fn expand_with_home(path: &str, home: Option<PathBuf>) -> PathBuf {
    match (path, home) {
        ("~", Some(home)) => home,
        (p, Some(home)) if p.starts_with("~/") => home.join(&p[2..]),
        (p, _) => PathBuf::from(p),
    }
}

fn resolve(xdg: Option<PathBuf>, home: Option<PathBuf>, fallback: &[&str]) -> PathBuf {
    let base = xdg.filter(|p| p.is_absolute()).or_else(|| {
        home.map(|home| fallback.iter().fold(home, |path, part| path.join(part)))
    });
    base.unwrap_or_default().join(APP_DIR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xdg_wins_over_home() {
        let dir = resolve(
            Some(PathBuf::from("/xdg/data")),
            Some(PathBuf::from("/home/chef")),
            &[".local", "share"],
        );
        assert_eq!(dir, PathBuf::from("/xdg/data/chefdesk"));
    }

    #[test]
    fn relative_xdg_is_ignored() {
        let dir = resolve(
            Some(PathBuf::from("data")),
            Some(PathBuf::from("/home/chef")),
            &[".local", "share"],
        );
        assert_eq!(dir, PathBuf::from("/home/chef/.local/share/chefdesk"));
    }

    #[test]
    fn no_env_falls_back_to_relative() {
        assert_eq!(resolve(None, None, &[".config"]), PathBuf::from("chefdesk"));
    }

    #[test]
    fn tilde_expansion() {
        let home = Some(PathBuf::from("/home/chef"));
        assert_eq!(
            expand_with_home("~/traces.json", home.clone()),
            PathBuf::from("/home/chef/traces.json")
        );
        assert_eq!(expand_with_home("~", home.clone()), PathBuf::from("/home/chef"));
        assert_eq!(expand_with_home("~other", home), PathBuf::from("~other"));
        assert_eq!(expand_with_home("~/x", None), PathBuf::from("~/x"));
    }
}
