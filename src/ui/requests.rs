use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::thread;

use log::debug;

use crate::api::{ApiError, ClipClient};
use crate::models::{SearchResult, ThumbItem};

struct Response<T> {
    seq: u64,
    outcome: Result<T, ApiError>,
}

/// One background request at a time, latest intent wins.
///
/// Every issued request carries the sequence number current at issue time;
/// the worker thread deposits its outcome into a shared slot the event loop
/// drains with [`RequestSlot::poll`]. A response whose tag no longer
/// matches the latest issued tag is dropped, and a finished worker never
/// overwrites an unread newer response, so display state always reflects
/// the last committed intent regardless of network completion order.
pub struct RequestSlot<T> {
    label: &'static str,
    seq: u64,
    cell: Arc<Mutex<Option<Response<T>>>>,
}

impl<T: Send + 'static> RequestSlot<T> {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            seq: 0,
            cell: Arc::new(Mutex::new(None)),
        }
    }

    /// Run `job` on a background thread; its outcome supersedes any earlier
    /// request still in flight.
    pub fn issue<F>(&mut self, job: F) -> u64
    where
        F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    {
        self.seq += 1;
        let seq = self.seq;
        let cell = Arc::clone(&self.cell);
        let label = self.label;

        thread::spawn(move || {
            let outcome = job();
            if let Ok(mut guard) = cell.lock() {
                let superseded = guard.as_ref().is_some_and(|r| r.seq > seq);
                if superseded {
                    debug!("{}: response #{} lost the race, dropping", label, seq);
                } else {
                    *guard = Some(Response { seq, outcome });
                }
            }
        });

        debug!("{}: issued request #{}", label, seq);
        seq
    }

    /// The latest request's outcome, if it has settled. Stale responses are
    /// consumed and dropped here.
    pub fn poll(&mut self) -> Option<Result<T, ApiError>> {
        let response = match self.cell.try_lock() {
            Ok(mut guard) => guard.take()?,
            Err(_) => return None,
        };

        if response.seq != self.seq {
            debug!(
                "{}: dropping stale response #{} (current is #{})",
                self.label, response.seq, self.seq
            );
            return None;
        }
        Some(response.outcome)
    }

    /// Invalidate whatever is in flight without issuing anything new.
    pub fn abandon(&mut self) {
        self.seq += 1;
    }

    #[cfg(test)]
    pub fn current_seq(&self) -> u64 {
        self.seq
    }
}

/// Issues search requests for committed queries.
pub struct SearchController {
    slot: RequestSlot<Vec<SearchResult>>,
    pub searching: bool,
}

impl SearchController {
    pub fn new() -> Self {
        Self {
            slot: RequestSlot::new("search"),
            searching: false,
        }
    }

    pub fn search(&mut self, client: &ClipClient, query: &str) {
        let client = client.clone();
        let query = query.to_string();
        self.searching = true;
        self.slot.issue(move || client.search(&query));
    }

    pub fn poll(&mut self) -> Option<Result<Vec<SearchResult>, ApiError>> {
        let outcome = self.slot.poll();
        if outcome.is_some() {
            self.searching = false;
        }
        outcome
    }
}

/// Loads the filmstrip for the current selection.
pub struct DetailController {
    slot: RequestSlot<Vec<ThumbItem>>,
    pub loading: bool,
}

impl DetailController {
    pub fn new() -> Self {
        Self {
            slot: RequestSlot::new("thumbs"),
            loading: false,
        }
    }

    pub fn load(&mut self, client: &ClipClient, selection: &SearchResult) {
        let client = client.clone();
        let season = selection.season.clone();
        let episode = selection.episode.clone();
        let from = selection.filmstrip_start();
        self.loading = true;
        self.slot.issue(move || client.thumbs(&season, &episode, from));
    }

    /// Settles success and failure alike; `loading` clears on both paths,
    /// but never for a superseded selection's response.
    pub fn poll(&mut self) -> Option<Result<Vec<ThumbItem>, ApiError>> {
        let outcome = self.slot.poll();
        if outcome.is_some() {
            self.loading = false;
        }
        outcome
    }

    pub fn reset(&mut self) {
        self.slot.abandon();
        self.loading = false;
    }
}

/// Downloads a GIF of the selected moment and writes it to disk.
pub struct GifController {
    slot: RequestSlot<PathBuf>,
    pub exporting: bool,
}

impl GifController {
    pub fn new() -> Self {
        Self {
            slot: RequestSlot::new("gif"),
            exporting: false,
        }
    }

    pub fn export(&mut self, client: &ClipClient, selection: &SearchResult, dir: &Path) {
        let client = client.clone();
        let selection = selection.clone();
        let path = gif_output_path(dir, &selection);
        let (start, end) = selection.gif_range();
        self.exporting = true;
        self.slot.issue(move || {
            let bytes = client.gif(
                &selection.season,
                &selection.episode,
                start,
                end,
                selection.text.as_deref(),
            )?;
            fs::write(&path, bytes)?;
            Ok(path)
        });
    }

    pub fn poll(&mut self) -> Option<Result<PathBuf, ApiError>> {
        let outcome = self.slot.poll();
        if outcome.is_some() {
            self.exporting = false;
        }
        outcome
    }
}

pub fn gif_output_path(dir: &Path, selection: &SearchResult) -> PathBuf {
    dir.join(format!(
        "clip_s{}e{}_{}.gif",
        selection.season, selection.episode, selection.start
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::stub;
    use std::sync::mpsc;
    use std::time::{Duration, Instant};

    fn settle<T>(mut poll: impl FnMut() -> Option<T>) -> T {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(value) = poll() {
                return value;
            }
            assert!(Instant::now() < deadline, "request never settled");
            thread::sleep(Duration::from_millis(5));
        }
    }

    /// Polls for a while and asserts nothing ever comes out.
    fn assert_stays_empty<T>(mut poll: impl FnMut() -> Option<T>) {
        let deadline = Instant::now() + Duration::from_millis(200);
        while Instant::now() < deadline {
            assert!(poll().is_none(), "a discarded response surfaced");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn delivers_the_latest_outcome() {
        let mut slot: RequestSlot<u32> = RequestSlot::new("test");
        slot.issue(|| Ok(7));
        assert_eq!(settle(|| slot.poll()).unwrap(), 7);
    }

    #[test]
    fn superseded_response_is_dropped_even_if_it_finishes_last() {
        let mut slot: RequestSlot<&'static str> = RequestSlot::new("test");
        let (release_first, gate_first) = mpsc::channel::<()>();
        let (release_second, gate_second) = mpsc::channel::<()>();

        slot.issue(move || {
            gate_first.recv().unwrap();
            Ok("first")
        });
        slot.issue(move || {
            gate_second.recv().unwrap();
            Ok("second")
        });

        // Second (current) request completes first.
        release_second.send(()).unwrap();
        assert_eq!(settle(|| slot.poll()).unwrap(), "second");

        // First request straggles in afterwards and must vanish.
        release_first.send(()).unwrap();
        assert_stays_empty(|| slot.poll());
    }

    #[test]
    fn stale_response_cannot_clobber_an_unread_newer_one() {
        let mut slot: RequestSlot<&'static str> = RequestSlot::new("test");
        let (release_first, gate_first) = mpsc::channel::<()>();
        let (done_first, first_finished) = mpsc::channel::<()>();

        slot.issue(move || {
            gate_first.recv().unwrap();
            done_first.send(()).unwrap();
            Ok("first")
        });
        slot.issue(move || Ok("second"));

        // Let the newer response land, then let the stale worker finish
        // without polling in between.
        thread::sleep(Duration::from_millis(50));
        release_first.send(()).unwrap();
        first_finished.recv().unwrap();
        thread::sleep(Duration::from_millis(50));

        assert_eq!(settle(|| slot.poll()).unwrap(), "second");
    }

    #[test]
    fn abandon_invalidates_in_flight_requests() {
        let mut slot: RequestSlot<u32> = RequestSlot::new("test");
        slot.issue(|| Ok(7));
        slot.abandon();
        assert_stays_empty(|| slot.poll());
    }

    #[test]
    fn search_flag_clears_on_success() {
        let base = stub::serve(vec![(
            "/search",
            200,
            r#"[{"season":"1","episode":"02","start":1200}]"#.to_string(),
        )]);
        let client = ClipClient::new(&base);
        let mut search = SearchController::new();

        search.search(&client, "homer");
        assert!(search.searching);

        let results = settle(|| search.poll()).unwrap();
        assert_eq!(results[0].start, 1200);
        assert!(!search.searching);
    }

    #[test]
    fn search_flag_clears_on_failure_too() {
        let base = stub::serve(vec![("/search", 500, String::new())]);
        let client = ClipClient::new(&base);
        let mut search = SearchController::new();

        search.search(&client, "homer");
        assert!(settle(|| search.poll()).is_err());
        assert!(!search.searching);
    }

    #[test]
    fn detail_loading_clears_on_success() {
        let base = stub::serve(vec![(
            "/thumbs/1/02/200",
            200,
            r#"[{"timestamp":500},{"timestamp":900}]"#.to_string(),
        )]);
        let client = ClipClient::new(&base);
        let mut detail = DetailController::new();
        let selection = SearchResult {
            season: "1".to_string(),
            episode: "02".to_string(),
            start: 1200,
            end: None,
            text: None,
        };

        detail.load(&client, &selection);
        assert!(detail.loading);

        let thumbs = settle(|| detail.poll()).unwrap();
        assert_eq!(thumbs.len(), 2);
        assert!(!detail.loading);
    }

    #[test]
    fn detail_loading_clears_on_failure_too() {
        let base = stub::serve(vec![("/thumbs", 500, String::new())]);
        let client = ClipClient::new(&base);
        let mut detail = DetailController::new();
        let selection = SearchResult {
            season: "1".to_string(),
            episode: "02".to_string(),
            start: 1200,
            end: None,
            text: None,
        };

        detail.load(&client, &selection);
        assert!(settle(|| detail.poll()).is_err());
        assert!(!detail.loading);
    }

    #[test]
    fn switching_selection_only_ever_surfaces_the_newer_filmstrip() {
        let base = stub::serve(vec![
            ("/thumbs/1/01/", 200, r#"[{"timestamp":100}]"#.to_string()),
            ("/thumbs/2/09/", 200, r#"[{"timestamp":7700}]"#.to_string()),
        ]);
        let client = ClipClient::new(&base);
        let mut detail = DetailController::new();
        let first = SearchResult {
            season: "1".to_string(),
            episode: "01".to_string(),
            start: 2000,
            end: None,
            text: None,
        };
        let second = SearchResult {
            season: "2".to_string(),
            episode: "09".to_string(),
            start: 9000,
            end: None,
            text: None,
        };

        detail.load(&client, &first);
        detail.load(&client, &second);

        // Whatever the completion order, only the latest selection's
        // filmstrip may come out.
        let thumbs = settle(|| detail.poll()).unwrap();
        assert_eq!(thumbs, vec![ThumbItem { timestamp: 7700 }]);
        assert!(!detail.loading);
    }

    #[test]
    fn gif_export_writes_the_clip_to_disk() {
        let base = stub::serve(vec![(
            "/gif/7/21/415000/417500?text=steamed%20hams",
            200,
            "GIF89a-fake".to_string(),
        )]);
        let client = ClipClient::new(&base);
        let dir = tempfile::tempdir().unwrap();
        let mut gif = GifController::new();
        let selection = SearchResult {
            season: "7".to_string(),
            episode: "21".to_string(),
            start: 415000,
            end: Some(417500),
            text: Some("steamed hams".to_string()),
        };

        gif.export(&client, &selection, dir.path());
        assert!(gif.exporting);

        let path = settle(|| gif.poll()).unwrap();
        assert_eq!(path, dir.path().join("clip_s7e21_415000.gif"));
        assert_eq!(fs::read(&path).unwrap(), b"GIF89a-fake");
        assert!(!gif.exporting);
    }

    #[test]
    fn issue_tags_are_monotonic() {
        let mut slot: RequestSlot<u32> = RequestSlot::new("test");
        let a = slot.issue(|| Ok(1));
        let b = slot.issue(|| Ok(2));
        assert!(b > a);
        assert_eq!(slot.current_seq(), b);
    }
}
