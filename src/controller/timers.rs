use std::time::{Duration, Instant};

/// Which controller timer fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum TimerKind {
    LoadTimeout,
    Backoff,
    Debounce,
}

/// One cancelable deadline.
#[derive(Debug, Default)]
pub(super) struct Timer(Option<Instant>);

impl Timer {
    pub(super) fn start(&mut self, at: Instant) {
        self.0 = Some(at);
    }

    pub(super) fn cancel(&mut self) {
        self.0 = None;
    }

    pub(super) fn deadline(&self) -> Option<Instant> {
        self.0
    }
}

/// Pure debouncer: one deadline that moves with every event and fires once
/// the window has been quiet. The controller keeps the latest tree itself,
/// so only the timing lives here.
#[derive(Debug)]
pub(super) struct Debouncer {
    window: Duration,
    last_event: Option<Instant>,
}

impl Debouncer {
    pub(super) fn new(window: Duration) -> Self {
        Self {
            window,
            last_event: None,
        }
    }

    pub(super) fn touch(&mut self, now: Instant) {
        self.last_event = Some(now);
    }

    /// When the pending change becomes ready, if any.
    pub(super) fn deadline(&self) -> Option<Instant> {
        self.last_event.map(|at| at + self.window)
    }

    /// Clear and report the pending change if the window elapsed.
    pub(super) fn take_if_ready(&mut self, now: Instant) -> bool {
        match self.deadline() {
            Some(deadline) if now >= deadline => {
                self.last_event = None;
                true
            }
            _ => false,
        }
    }

    pub(super) fn cancel(&mut self) {
        self.last_event = None;
    }
}

/// Earliest of the given deadlines that is due at `now`.
pub(super) fn earliest_due(
    candidates: [(Option<Instant>, TimerKind); 3],
    now: Instant,
) -> Option<TimerKind> {
    candidates
        .into_iter()
        .filter_map(|(deadline, kind)| deadline.filter(|at| *at <= now).map(|at| (at, kind)))
        .min_by_key(|(at, _)| *at)
        .map(|(_, kind)| kind)
}
