//! Transient error banner state.
//!
//! # Design
//! One slot, one timer. Showing an error replaces whatever was there and
//! restarts the visibility window; there is no queue of past failures.
//! The banner never reads the clock itself — callers pass `Instant` values
//! in, so expiry is exact and testable without sleeping.

use std::time::{Duration, Instant};

use crate::error::UiError;

/// How long a surfaced error stays visible.
pub const ERROR_VISIBLE_FOR: Duration = Duration::from_secs(3);

/// Single-slot error display with a fixed visibility window.
#[derive(Debug, Clone, Default)]
pub struct ErrorBanner {
    slot: Option<(UiError, Instant)>,
}

impl ErrorBanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Surface `error`, replacing any current one and restarting the window.
    pub fn show(&mut self, error: UiError, now: Instant) {
        tracing::debug!(%error, "error banner shown");
        self.slot = Some((error, now));
    }

    /// The active error, if its visibility window has not elapsed.
    pub fn current(&self, now: Instant) -> Option<UiError> {
        match self.slot {
            Some((error, shown_at))
                if now.saturating_duration_since(shown_at) < ERROR_VISIBLE_FOR =>
            {
                Some(error)
            }
            _ => None,
        }
    }

    /// Hide the banner immediately, without waiting for the window.
    pub fn dismiss(&mut self) {
        self.slot = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_banner_shows_nothing() {
        let banner = ErrorBanner::new();
        assert_eq!(banner.current(Instant::now()), None);
    }

    #[test]
    fn error_expires_after_the_window() {
        let t0 = Instant::now();
        let mut banner = ErrorBanner::new();
        banner.show(UiError::LoadFailed, t0);

        assert_eq!(banner.current(t0), Some(UiError::LoadFailed));
        assert_eq!(
            banner.current(t0 + ERROR_VISIBLE_FOR - Duration::from_millis(1)),
            Some(UiError::LoadFailed)
        );
        assert_eq!(banner.current(t0 + ERROR_VISIBLE_FOR), None);
    }

    #[test]
    fn newer_error_replaces_and_restarts() {
        let t0 = Instant::now();
        let mut banner = ErrorBanner::new();
        banner.show(UiError::LoadFailed, t0);
        banner.show(UiError::DeleteFailed, t0 + Duration::from_secs(2));

        // Four seconds in, the first error would have expired; the second is
        // only two seconds old.
        assert_eq!(
            banner.current(t0 + Duration::from_secs(4)),
            Some(UiError::DeleteFailed)
        );
        assert_eq!(banner.current(t0 + Duration::from_secs(5)), None);
    }

    #[test]
    fn dismiss_hides_immediately() {
        let t0 = Instant::now();
        let mut banner = ErrorBanner::new();
        banner.show(UiError::AddFailed, t0);
        banner.dismiss();
        assert_eq!(banner.current(t0), None);
    }
}
