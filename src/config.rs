//! Options controlling a single asset revision pass.

use serde::Deserialize;

use crate::host::Clock;

/// Fixed token used when neither a custom version nor a timestamp is wanted.
const FALLBACK_VERSION: &str = "v1";

/// Configuration for [`crate::AssetRevisioner::revise`].
///
/// Every switch is independent and has a defined default; deserialization
/// accepts any subset of fields. Values are taken as-is, no validation is
/// applied beyond defaulting.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReviseConfig {
    /// Derive the version token from the current time when no custom
    /// version is given.
    pub use_timestamp: bool,
    /// Version token to use verbatim, overriding timestamp derivation.
    pub custom_version: Option<String>,
    /// Rewrite stylesheet link references.
    pub update_css: bool,
    /// Rewrite script references flagged with the opt-in marker attribute.
    pub update_js: bool,
    /// Schedule a full page reload after the pass completes.
    pub force_reload: bool,
    /// Emit a diagnostic line for the pass and for each mutation.
    pub verbose: bool,
}

impl Default for ReviseConfig {
    fn default() -> Self {
        Self {
            use_timestamp: true,
            custom_version: None,
            update_css: true,
            update_js: true,
            force_reload: false,
            verbose: false,
        }
    }
}

impl ReviseConfig {
    /// Parse a configuration from a JSON object with camelCase keys.
    ///
    /// Unknown or malformed input yields `None` so callers can fall back to
    /// defaults without surfacing an error.
    pub fn from_json_str(content: &str) -> Option<Self> {
        serde_json::from_str(content).ok()
    }

    /// Convenience constructor pinning the version token.
    pub fn with_version(version: impl Into<String>) -> Self {
        Self {
            custom_version: Some(version.into()),
            ..Self::default()
        }
    }

    /// Resolve the version token for one pass.
    ///
    /// A custom version wins; otherwise the clock supplies a millisecond
    /// timestamp, unless timestamps are disabled entirely.
    pub fn version_token(&self, clock: &dyn Clock) -> String {
        if let Some(version) = &self.custom_version {
            version.clone()
        } else if self.use_timestamp {
            clock.now_millis().to_string()
        } else {
            FALLBACK_VERSION.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedClock(u64);

    impl Clock for FixedClock {
        fn now_millis(&self) -> u64 {
            self.0
        }
    }

    #[test]
    fn defaults_enable_both_asset_classes() {
        let config = ReviseConfig::default();
        assert!(config.use_timestamp);
        assert!(config.update_css);
        assert!(config.update_js);
        assert!(!config.force_reload);
        assert!(!config.verbose);
        assert_eq!(config.custom_version, None);
    }

    #[test]
    fn custom_version_wins_over_timestamp() {
        let config = ReviseConfig::with_version("7");
        assert_eq!(config.version_token(&FixedClock(99)), "7");
    }

    #[test]
    fn timestamp_token_comes_from_the_clock() {
        let config = ReviseConfig::default();
        assert_eq!(config.version_token(&FixedClock(1_234)), "1234");
    }

    #[test]
    fn disabled_timestamp_falls_back_to_fixed_literal() {
        let config = ReviseConfig {
            use_timestamp: false,
            ..ReviseConfig::default()
        };
        assert_eq!(config.version_token(&FixedClock(99)), "v1");
    }

    #[test]
    fn parses_partial_camel_case_json() {
        let config =
            ReviseConfig::from_json_str(r#"{"useTimestamp": false, "forceReload": true}"#)
                .unwrap();
        assert!(!config.use_timestamp);
        assert!(config.force_reload);
        assert!(config.update_css);
    }

    #[test]
    fn malformed_json_yields_none() {
        assert!(ReviseConfig::from_json_str("not json").is_none());
    }
}
