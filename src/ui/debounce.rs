use std::time::{Duration, Instant};

/// Holds back query edits until the user pauses typing.
///
/// Poll-driven: the event loop calls [`QueryDebouncer::poll`] every
/// iteration and receives the committed value at most once per burst of
/// edits, never sooner than the quiet period after the last edit. There is
/// no timer thread; dropping the debouncer drops any pending emission.
pub struct QueryDebouncer {
    quiet: Duration,
    pending: Option<Pending>,
}

struct Pending {
    value: String,
    due: Instant,
}

impl QueryDebouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
        }
    }

    /// Note an edit; restarts the quiet period and supersedes any value
    /// recorded earlier in it.
    pub fn record(&mut self, value: &str) {
        self.record_at(value, Instant::now());
    }

    pub fn record_at(&mut self, value: &str, now: Instant) {
        self.pending = Some(Pending {
            value: value.to_string(),
            due: now + self.quiet,
        });
    }

    /// The committed query, once the quiet period has elapsed.
    pub fn poll(&mut self) -> Option<String> {
        self.poll_at(Instant::now())
    }

    pub fn poll_at(&mut self, now: Instant) -> Option<String> {
        let due = self.pending.as_ref()?.due;
        if now < due {
            return None;
        }
        self.pending.take().map(|p| p.value)
    }

    /// Discard any pending emission.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUIET: Duration = Duration::from_millis(500);

    #[test]
    fn emits_nothing_before_any_edit() {
        let mut debouncer = QueryDebouncer::new(QUIET);
        assert_eq!(debouncer.poll_at(Instant::now()), None);
    }

    #[test]
    fn holds_until_the_quiet_period_elapses() {
        let t0 = Instant::now();
        let mut debouncer = QueryDebouncer::new(QUIET);

        debouncer.record_at("homer", t0);
        assert_eq!(debouncer.poll_at(t0 + Duration::from_millis(499)), None);
        assert_eq!(
            debouncer.poll_at(t0 + Duration::from_millis(500)),
            Some("homer".to_string())
        );
    }

    #[test]
    fn emits_once_per_burst() {
        let t0 = Instant::now();
        let mut debouncer = QueryDebouncer::new(QUIET);

        debouncer.record_at("homer", t0);
        assert_eq!(
            debouncer.poll_at(t0 + QUIET),
            Some("homer".to_string())
        );
        assert_eq!(debouncer.poll_at(t0 + QUIET * 10), None);
    }

    #[test]
    fn rapid_edits_commit_only_the_final_value() {
        let t0 = Instant::now();
        let mut debouncer = QueryDebouncer::new(QUIET);

        debouncer.record_at("h", t0);
        debouncer.record_at("ho", t0 + Duration::from_millis(100));
        debouncer.record_at("hom", t0 + Duration::from_millis(250));
        debouncer.record_at("homer", t0 + Duration::from_millis(400));

        // The earlier edits' deadlines have passed, but each was superseded.
        assert_eq!(debouncer.poll_at(t0 + Duration::from_millis(600)), None);
        assert_eq!(
            debouncer.poll_at(t0 + Duration::from_millis(900)),
            Some("homer".to_string())
        );
    }

    #[test]
    fn an_edit_restarts_the_quiet_period() {
        let t0 = Instant::now();
        let mut debouncer = QueryDebouncer::new(QUIET);

        debouncer.record_at("homer", t0);
        debouncer.record_at("homer j", t0 + Duration::from_millis(450));
        assert_eq!(debouncer.poll_at(t0 + Duration::from_millis(500)), None);
        assert_eq!(
            debouncer.poll_at(t0 + Duration::from_millis(950)),
            Some("homer j".to_string())
        );
    }

    #[test]
    fn cancel_discards_the_pending_emission() {
        let t0 = Instant::now();
        let mut debouncer = QueryDebouncer::new(QUIET);

        debouncer.record_at("homer", t0);
        debouncer.cancel();
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.poll_at(t0 + QUIET * 2), None);
    }

    #[test]
    fn empty_values_are_committed_like_any_other() {
        let t0 = Instant::now();
        let mut debouncer = QueryDebouncer::new(QUIET);

        debouncer.record_at("", t0);
        assert_eq!(debouncer.poll_at(t0 + QUIET), Some(String::new()));
    }
}
