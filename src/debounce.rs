use std::time::{Duration, Instant};

/// Timer-based value stabilizer.
///
/// Given a rapidly-changing input value and a fixed delay, produces a
/// committed value that only updates once the input has stopped changing
/// for at least the delay. Every new input cancels the pending commit and
/// schedules a fresh one; only the value that survives the full quiet
/// period is committed.
///
/// The debouncer is poll-based: it records the pending value and its
/// deadline, and the owning event loop drives it via [`Debouncer::poll`].
/// There is no background timer to leak — dropping the owner cancels any
/// pending commit with it.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    committed: T,
    pending: Option<(T, Instant)>,
}

impl<T: Clone + PartialEq> Debouncer<T> {
    /// The committed value starts out equal to the initial input value.
    pub fn new(initial: T, delay: Duration) -> Self {
        Self {
            delay,
            committed: initial,
            pending: None,
        }
    }

    /// Record a new input value, superseding any pending commit.
    ///
    /// A value equal to the committed one only cancels the pending commit:
    /// committing it again would change nothing observable.
    pub fn update(&mut self, value: T, now: Instant) {
        if value == self.committed {
            self.pending = None;
        } else {
            self.pending = Some((value, now + self.delay));
        }
    }

    /// When the pending value will commit, if one is scheduled.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    /// Commit the pending value if its quiet period has elapsed.
    /// Returns the newly committed value, or `None` if nothing was due.
    pub fn poll(&mut self, now: Instant) -> Option<&T> {
        match self.pending.take() {
            Some((value, deadline)) if deadline <= now => {
                self.committed = value;
                Some(&self.committed)
            }
            not_due => {
                self.pending = not_due;
                None
            }
        }
    }

    /// The current committed value.
    #[allow(dead_code)] // the widget consumes commits via poll(); kept for direct reads
    pub fn value(&self) -> &T {
        &self.committed
    }
}
