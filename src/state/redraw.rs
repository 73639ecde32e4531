//! Debounced view re-initialization after page draws.
//!
//! The renderer draws pages asynchronously and may report a draw several
//! times in a row. Every report cancels and re-arms a single-shot timer, so
//! the re-initialization runs once, after the draws have settled. Labeled
//! tiles are repainted once per drawn view: reporting the same page again
//! does not repeat the work.

use std::time::Duration;
use web_time::Instant;

/// Single-shot, cancel-and-reschedule timer for view re-initialization.
#[derive(Debug)]
pub struct RedrawDebouncer {
    /// Quiet period after the last draw notification.
    quiet_period: Duration,

    /// Deadline of the armed timer.
    deadline: Option<Instant>,

    /// Bumped whenever the set of shown tiles changes.
    generation: u64,

    /// View the re-initialization last ran for.
    initialized_for: Option<DrawnView>,
}

/// A page of one particular set of shown tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DrawnView {
    page: usize,
    generation: u64,
}

impl RedrawDebouncer {
    /// Create a debouncer with the given quiet period.
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            deadline: None,
            generation: 0,
            initialized_for: None,
        }
    }

    /// Record a page-draw notification, replacing any armed timer.
    pub fn notify(&mut self) {
        self.notify_at(Instant::now());
    }

    /// Record a page-draw notification at `now`.
    pub fn notify_at(&mut self, now: Instant) {
        if self.deadline.is_some() {
            log::trace!("Redraw: rescheduled");
        }
        self.deadline = Some(now + self.quiet_period);
    }

    /// Check if the timer is armed.
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Fire the timer if it is due, disarming it.
    pub fn take_due(&mut self) -> bool {
        self.take_due_at(Instant::now())
    }

    /// Fire the timer if it is due at `now`, disarming it.
    pub fn take_due_at(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Cancel the armed timer.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Record that the renderer now shows a different set of tiles.
    pub fn view_changed(&mut self) {
        self.generation += 1;
    }

    fn view(&self, page: usize) -> DrawnView {
        DrawnView {
            page,
            generation: self.generation,
        }
    }

    /// Check if `page` of the current view was already initialized.
    pub fn is_initialized_for(&self, page: usize) -> bool {
        self.initialized_for == Some(self.view(page))
    }

    /// Mark `page` of the current view as initialized.
    pub fn mark_initialized(&mut self, page: usize) {
        self.initialized_for = Some(self.view(page));
        log::trace!("Redraw: marked page {} initialized", page);
    }

    /// Require a fresh initialization on the next draw.
    pub fn invalidate(&mut self) {
        self.initialized_for = None;
        log::trace!("Redraw: invalidated");
    }
}

impl Default for RedrawDebouncer {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_REDRAW_DEBOUNCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let mut debouncer = RedrawDebouncer::default();
        assert!(!debouncer.is_armed());
        assert!(!debouncer.is_initialized_for(0));
        assert!(!debouncer.take_due());
    }

    #[test]
    fn test_fires_once_after_quiet_period() {
        let mut debouncer = RedrawDebouncer::new(Duration::from_secs(1));
        let start = Instant::now();
        debouncer.notify_at(start);
        assert!(!debouncer.take_due_at(start + Duration::from_millis(500)));
        assert!(debouncer.take_due_at(start + Duration::from_secs(1)));
        assert!(!debouncer.take_due_at(start + Duration::from_secs(2)));
    }

    #[test]
    fn test_notification_reschedules() {
        let mut debouncer = RedrawDebouncer::new(Duration::from_secs(1));
        let start = Instant::now();
        debouncer.notify_at(start);
        debouncer.notify_at(start + Duration::from_millis(800));
        assert!(!debouncer.take_due_at(start + Duration::from_millis(1200)));
        assert!(debouncer.take_due_at(start + Duration::from_millis(1800)));
    }

    #[test]
    fn test_zero_quiet_period_is_due_immediately() {
        let mut debouncer = RedrawDebouncer::new(Duration::ZERO);
        debouncer.notify();
        assert!(debouncer.take_due());
    }

    #[test]
    fn test_cancel_and_invalidate() {
        let mut debouncer = RedrawDebouncer::new(Duration::ZERO);
        debouncer.notify();
        debouncer.cancel();
        assert!(!debouncer.take_due());

        debouncer.mark_initialized(0);
        assert!(debouncer.is_initialized_for(0));
        debouncer.invalidate();
        assert!(!debouncer.is_initialized_for(0));
    }

    #[test]
    fn test_initialized_per_page_and_view() {
        let mut debouncer = RedrawDebouncer::new(Duration::ZERO);
        debouncer.mark_initialized(1);
        assert!(debouncer.is_initialized_for(1));
        assert!(!debouncer.is_initialized_for(0));

        debouncer.view_changed();
        assert!(!debouncer.is_initialized_for(1));
    }
}
