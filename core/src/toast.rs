//! Transient notification bookkeeping.
//!
//! # Design
//! The queue models the lifecycle the presentation layer animates: a toast is
//! fully visible for the display window, then spends a short exit window
//! fading before it may be dropped from the shared container. Rendering is
//! the host's concern; the queue only answers "what is on screen right now"
//! and "what can be thrown away". Concurrent toasts stack in arrival order —
//! there is no suppression or coalescing policy.
//!
//! Timings are injectable so shells and tests can pace the lifecycle however
//! they need; the defaults match the stock style sheet (3 s visible, 300 ms
//! exit animation).

use std::time::{Duration, Instant};

/// Message used when an error toast is requested without one.
pub const DEFAULT_ERROR_MESSAGE: &str = "An error occurred";

/// Visual flavor of a toast; maps to a style class on the rendered element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ToastKind {
    #[default]
    Success,
    Error,
}

/// Lifecycle timings for the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToastConfig {
    /// How long a toast stays fully visible.
    pub display: Duration,
    /// Extra time the exit animation gets before removal.
    pub exit: Duration,
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            display: Duration::from_millis(3000),
            exit: Duration::from_millis(300),
        }
    }
}

/// A single notification in the container.
#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    visible_until: Instant,
    expires_at: Instant,
}

impl Toast {
    /// Past the display window: the host should start the exit animation.
    pub fn is_leaving(&self, now: Instant) -> bool {
        now >= self.visible_until
    }

    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Shared stacking container for active toasts, oldest first.
#[derive(Debug, Default)]
pub struct ToastQueue {
    config: ToastConfig,
    toasts: Vec<Toast>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ToastConfig) -> Self {
        Self {
            config,
            toasts: Vec::new(),
        }
    }

    /// Append a toast, stamped with the current clock.
    pub fn push(&mut self, message: impl Into<String>, kind: ToastKind) {
        self.push_at(message, kind, Instant::now());
    }

    /// Append a toast with an explicit clock reading.
    pub fn push_at(&mut self, message: impl Into<String>, kind: ToastKind, now: Instant) {
        let visible_until = now + self.config.display;
        self.toasts.push(Toast {
            message: message.into(),
            kind,
            visible_until,
            expires_at: visible_until + self.config.exit,
        });
    }

    /// Convenience for a success toast.
    pub fn success(&mut self, message: impl Into<String>) {
        self.push(message, ToastKind::Success);
    }

    /// Convenience for an error toast; an absent or empty message falls back
    /// to [`DEFAULT_ERROR_MESSAGE`].
    pub fn error(&mut self, message: Option<String>) {
        let message = message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string());
        self.push(message, ToastKind::Error);
    }

    /// Drop toasts whose exit window has elapsed; returns how many went.
    pub fn sweep(&mut self) -> usize {
        self.sweep_at(Instant::now())
    }

    /// Sweep with an explicit clock reading.
    pub fn sweep_at(&mut self, now: Instant) -> usize {
        let before = self.toasts.len();
        self.toasts.retain(|toast| !toast.is_expired(now));
        before - self.toasts.len()
    }

    /// Toasts currently in the container, oldest first.
    pub fn active(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queue() -> ToastQueue {
        ToastQueue::new()
    }

    #[test]
    fn toast_lifecycle_phases() {
        let mut q = queue();
        let t0 = Instant::now();
        q.push_at("saved", ToastKind::Success, t0);

        let toast = &q.active()[0];
        assert!(!toast.is_leaving(t0));
        assert!(!toast.is_leaving(t0 + Duration::from_millis(2999)));
        assert!(toast.is_leaving(t0 + Duration::from_millis(3000)));

        // Still in the container while the exit animation runs.
        assert_eq!(q.sweep_at(t0 + Duration::from_millis(3299)), 0);
        assert_eq!(q.len(), 1);
        // Gone once display + exit have both elapsed.
        assert_eq!(q.sweep_at(t0 + Duration::from_millis(3300)), 1);
        assert!(q.is_empty());
    }

    #[test]
    fn toasts_stack_in_arrival_order() {
        let mut q = queue();
        let t0 = Instant::now();
        q.push_at("first", ToastKind::Success, t0);
        q.push_at("second", ToastKind::Error, t0 + Duration::from_millis(100));

        let messages: Vec<&str> = q.active().iter().map(|t| t.message.as_str()).collect();
        assert_eq!(messages, ["first", "second"]);

        // The older toast expires first; the younger one stays behind.
        assert_eq!(q.sweep_at(t0 + Duration::from_millis(3350)), 1);
        assert_eq!(q.active()[0].message, "second");
    }

    #[test]
    fn error_toast_falls_back_to_default_message() {
        let mut q = queue();
        q.error(None);
        q.error(Some(String::new()));
        q.error(Some("comment too long".to_string()));

        assert_eq!(q.active()[0].message, DEFAULT_ERROR_MESSAGE);
        assert_eq!(q.active()[1].message, DEFAULT_ERROR_MESSAGE);
        assert_eq!(q.active()[2].message, "comment too long");
        assert!(q.active().iter().all(|t| t.kind == ToastKind::Error));
    }

    #[test]
    fn custom_timings_are_respected() {
        let mut q = ToastQueue::with_config(ToastConfig {
            display: Duration::from_millis(100),
            exit: Duration::from_millis(10),
        });
        let t0 = Instant::now();
        q.push_at("quick", ToastKind::Success, t0);
        assert!(q.active()[0].is_leaving(t0 + Duration::from_millis(100)));
        assert_eq!(q.sweep_at(t0 + Duration::from_millis(110)), 1);
    }
}
