//! Guard against the release that follows the popup-opening press.
//!
//! Clicking the trigger opens the popup under the pointer. Without a guard,
//! releasing that same click would land on a popup row and toggle it. The
//! guard swallows releases for one double-click interval after the opening
//! press, unless the pointer is dragged far enough first to show intent.

use checkcombo_core::{subscribe, After, Subscription};
use ratatui::layout::Position;
use std::time::Duration;

/// Default time a release stays blocked after the opening press.
pub const DEFAULT_DOUBLE_CLICK_INTERVAL: Duration = Duration::from_millis(400);

/// Default drag distance, in cells (Manhattan), that lifts the guard early.
pub const DEFAULT_DRAG_THRESHOLD: u16 = 2;

#[derive(Debug, Clone)]
pub struct ReleaseGuard {
    interval: Duration,
    threshold: u16,
    origin: Option<Position>,
    armed: bool,
    generation: u64,
}

impl ReleaseGuard {
    /// A disarmed guard blocking for `interval`, lifted by drags beyond
    /// `threshold` cells.
    pub fn new(interval: Duration, threshold: u16) -> Self {
        Self {
            interval,
            threshold,
            origin: None,
            armed: false,
            generation: 0,
        }
    }

    /// Change how long releases stay blocked after the opening press.
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    /// Change the drag distance, in cells, that lifts the guard.
    pub fn set_threshold(&mut self, threshold: u16) {
        self.threshold = threshold;
    }

    /// Record the opening press and start blocking releases.
    pub fn arm(&mut self, origin: Position) {
        self.origin = Some(origin);
        self.generation = self.generation.wrapping_add(1);
        self.armed = true;
    }

    /// Stop blocking releases. The press origin is kept until [`reset`](Self::reset).
    pub fn disarm(&mut self) {
        self.armed = false;
    }

    /// Forget the press entirely (popup closed).
    pub fn reset(&mut self) {
        self.armed = false;
        self.origin = None;
    }

    /// Whether releases are currently swallowed.
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Where the opening press landed, until the guard is reset.
    pub fn origin(&self) -> Option<Position> {
        self.origin
    }

    /// Counter bumped by every [`arm`](Self::arm); stamps timer messages.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Pointer moved to `position`. Disarms once the Manhattan distance from
    /// the press origin exceeds the threshold; returns whether it did.
    pub fn pointer_moved(&mut self, position: Position) -> bool {
        let Some(origin) = self.origin else {
            return false;
        };
        if !self.armed {
            return false;
        }
        let distance = origin.x.abs_diff(position.x) + origin.y.abs_diff(position.y);
        if distance > self.threshold {
            self.armed = false;
            return true;
        }
        false
    }

    /// The timer for `generation` fired. Stale generations are ignored.
    pub fn elapsed(&mut self, generation: u64) -> bool {
        if self.armed && generation == self.generation {
            self.armed = false;
            return true;
        }
        false
    }

    /// A one-shot timer for the current arming, or `None` when disarmed.
    ///
    /// The timer is keyed by generation, so re-arming replaces it and
    /// disarming (no longer declaring it) cancels it.
    pub fn subscription<Msg: Send + 'static>(
        &self,
        on_elapsed: impl Fn(u64) -> Msg + Send + Sync + 'static,
    ) -> Option<Subscription<Msg>> {
        if !self.armed {
            return None;
        }
        let generation = self.generation;
        Some(subscribe(After::new(self.interval, generation)).map(move |_| on_elapsed(generation)))
    }
}

impl Default for ReleaseGuard {
    fn default() -> Self {
        Self::new(DEFAULT_DOUBLE_CLICK_INTERVAL, DEFAULT_DRAG_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use checkcombo_core::SubscriptionId;

    #[test]
    fn starts_disarmed() {
        let guard = ReleaseGuard::default();
        assert!(!guard.is_armed());
        assert!(guard.origin().is_none());
        assert!(guard.subscription(|g| g).is_none());
    }

    #[test]
    fn arm_bumps_generation() {
        let mut guard = ReleaseGuard::default();
        guard.arm(Position::new(3, 1));
        let first = guard.generation();
        guard.arm(Position::new(3, 1));
        assert_eq!(guard.generation(), first + 1);
        assert!(guard.is_armed());
    }

    #[test]
    fn small_motion_keeps_guard() {
        let mut guard = ReleaseGuard::new(DEFAULT_DOUBLE_CLICK_INTERVAL, 2);
        guard.arm(Position::new(10, 5));
        assert!(!guard.pointer_moved(Position::new(11, 6)));
        assert!(guard.is_armed());
    }

    #[test]
    fn drag_past_threshold_disarms() {
        let mut guard = ReleaseGuard::new(DEFAULT_DOUBLE_CLICK_INTERVAL, 2);
        guard.arm(Position::new(10, 5));
        assert!(guard.pointer_moved(Position::new(10, 8)));
        assert!(!guard.is_armed());
        assert_eq!(guard.origin(), Some(Position::new(10, 5)));
    }

    #[test]
    fn motion_without_press_is_ignored() {
        let mut guard = ReleaseGuard::default();
        assert!(!guard.pointer_moved(Position::new(50, 50)));
    }

    #[test]
    fn stale_timer_is_ignored() {
        let mut guard = ReleaseGuard::default();
        guard.arm(Position::new(0, 0));
        let old = guard.generation();
        guard.arm(Position::new(0, 0));
        assert!(!guard.elapsed(old));
        assert!(guard.is_armed());
        assert!(guard.elapsed(guard.generation()));
        assert!(!guard.is_armed());
    }

    #[test]
    fn reset_forgets_origin() {
        let mut guard = ReleaseGuard::default();
        guard.arm(Position::new(4, 4));
        guard.reset();
        assert!(!guard.is_armed());
        assert!(guard.origin().is_none());
    }

    #[test]
    fn subscription_is_keyed_by_generation() {
        let mut guard = ReleaseGuard::default();
        guard.arm(Position::new(0, 0));
        let first = guard.subscription(|g| g).map(|s| s.id().clone());
        guard.arm(Position::new(0, 0));
        let second = guard.subscription(|g| g).map(|s| s.id().clone());
        assert!(first.is_some());
        assert_ne!(first, second);
        assert_eq!(second, Some(SubscriptionId::new::<After>(guard.generation())));
    }
}
