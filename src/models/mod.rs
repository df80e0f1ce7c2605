use serde::{Deserialize, Serialize};

/// The filmstrip starts one second before the matched frame.
pub const FILMSTRIP_LEAD_IN_MS: i64 = 1000;

/// Longest clip the backend will render as a GIF.
pub const MAX_GIF_SPAN_MS: i64 = 10_000;

/// GIF span used when the backend did not report an end timestamp.
pub const DEFAULT_GIF_SPAN_MS: i64 = 3000;

/// One matched moment returned by the search endpoint. `end` and `text`
/// are sent by newer backends; older ones only send the first three fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub season: String,
    pub episode: String,
    pub start: i64,
    #[serde(default)]
    pub end: Option<i64>,
    #[serde(default)]
    pub text: Option<String>,
}

impl SearchResult {
    /// URL of the thumbnail for the matched frame itself.
    pub fn thumb_url(&self, base: &str) -> String {
        format!("{}/thumb/{}/{}/{}", base, self.season, self.episode, self.start)
    }

    /// Timestamp the filmstrip request starts from.
    pub fn filmstrip_start(&self) -> i64 {
        self.start - FILMSTRIP_LEAD_IN_MS
    }

    /// Millisecond range to render as a GIF, clamped to the backend's cap.
    pub fn gif_range(&self) -> (i64, i64) {
        let end = match self.end {
            Some(end) if end > self.start => end.min(self.start + MAX_GIF_SPAN_MS),
            _ => self.start + DEFAULT_GIF_SPAN_MS,
        };
        (self.start, end)
    }

    /// Row label: the matched quote when the backend sent one.
    pub fn label(&self) -> String {
        match &self.text {
            Some(text) if !text.is_empty() => text.clone(),
            _ => format!("Season {}, Episode {}", self.season, self.episode),
        }
    }
}

/// One frame in the filmstrip around a selected moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThumbItem {
    pub timestamp: i64,
}

impl ThumbItem {
    /// URL of this frame's thumbnail within the selected episode.
    pub fn thumb_url(&self, base: &str, season: &str, episode: &str) -> String {
        format!("{}/thumb/{}/{}/{}", base, season, episode, self.timestamp)
    }
}
