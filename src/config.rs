//! Runtime configuration read from the process environment
//!
//! - `HOME`: locates `~/.rpnrc` and `~/.rpn_history`
//! - `RPN_RC`: explicit startup file, replaces `~/.rpnrc`
//! - `RPN_MAX_DEPTH`: how deep macro expansion may nest, capped at `MAX_DEPTH_CEILING`
//! - `RPN_LOG`: tracing filter for the binary (default `warn`)

use std::env;
use std::path::PathBuf;

pub const DEFAULT_MAX_DEPTH: usize = 256;
/// Expansion recurses on the native stack, so no setting may go past this
pub const MAX_DEPTH_CEILING: usize = 1024;
pub const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub rc_path: Option<PathBuf>,
    pub history_path: Option<PathBuf>,
    pub max_depth: usize,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            rc_path: None,
            history_path: None,
            max_depth: DEFAULT_MAX_DEPTH,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup, so tests need not touch the real environment
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let home = lookup("HOME").filter(|h| !h.is_empty()).map(PathBuf::from);

        let rc_path = lookup("RPN_RC")
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .or_else(|| home.as_ref().map(|h| h.join(".rpnrc")));

        Config {
            rc_path,
            history_path: home.as_ref().map(|h| h.join(".rpn_history")),
            max_depth: lookup("RPN_MAX_DEPTH")
                .and_then(|s| s.trim().parse().ok())
                .filter(|n: &usize| *n > 0)
                .map(|n| n.min(MAX_DEPTH_CEILING))
                .unwrap_or(DEFAULT_MAX_DEPTH),
            log_filter: lookup("RPN_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn home_locates_rc_and_history() {
        let config = config_with(&[("HOME", "/home/ada")]);
        assert_eq!(config.rc_path, Some(PathBuf::from("/home/ada/.rpnrc")));
        assert_eq!(config.history_path, Some(PathBuf::from("/home/ada/.rpn_history")));
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(config.log_filter, "warn");
    }

    #[test]
    fn explicit_rc_wins() {
        let config = config_with(&[("HOME", "/home/ada"), ("RPN_RC", "/etc/rpnrc")]);
        assert_eq!(config.rc_path, Some(PathBuf::from("/etc/rpnrc")));
    }

    #[test]
    fn no_home_no_files() {
        let config = config_with(&[]);
        assert_eq!(config.rc_path, None);
        assert_eq!(config.history_path, None);
    }

    #[test]
    fn depth_must_be_a_positive_number() {
        assert_eq!(config_with(&[("RPN_MAX_DEPTH", "12")]).max_depth, 12);
        assert_eq!(config_with(&[("RPN_MAX_DEPTH", "0")]).max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(config_with(&[("RPN_MAX_DEPTH", "lots")]).max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn depth_is_capped() {
        assert_eq!(config_with(&[("RPN_MAX_DEPTH", "1024")]).max_depth, MAX_DEPTH_CEILING);
        assert_eq!(config_with(&[("RPN_MAX_DEPTH", "10000000")]).max_depth, MAX_DEPTH_CEILING);
    }
}
