//! Navigation capability of the host environment.

use std::time::Duration;

use anyhow::Result;

/// Navigation surface: read the current location and move away from it.
pub trait Navigator: Send + Sync {
    /// Current location as a single URL string, query and fragment
    /// included.
    fn location(&self) -> String;

    /// Replace the current navigation entry with `url` (no history push).
    fn replace(&mut self, url: &str) -> Result<()>;

    /// Schedule a full reload after `delay`. Fire-and-forget: no result
    /// is awaited and no cancellation handle exists.
    fn schedule_reload(&mut self, delay: Duration);
}

/// No-op [`Navigator`] for hosts without a navigation surface, such as
/// offline rewriting of static HTML. Reloads and replacements are
/// silently discarded.
pub struct NullNavigator;

impl Navigator for NullNavigator {
    fn location(&self) -> String {
        "about:blank".to_string()
    }

    fn replace(&mut self, _url: &str) -> Result<()> {
        Ok(())
    }

    fn schedule_reload(&mut self, _delay: Duration) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_navigator_accepts_everything() {
        let mut navigator = NullNavigator;
        assert_eq!(navigator.location(), "about:blank");
        navigator.replace("https://example.com/").unwrap();
        navigator.schedule_reload(Duration::from_millis(100));
    }
}
