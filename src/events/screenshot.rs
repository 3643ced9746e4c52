use super::feed::FeedKind;
use std::fmt;

/// Событие обнаруженного скриншота - единственный артефакт, пересекающий
/// границу компонента в сторону слушателя
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenshotEvent {
    pub path: String,
    pub feed: FeedKind,
    pub timestamp: std::time::Instant,
}

impl ScreenshotEvent {
    pub fn new(path: impl Into<String>, feed: FeedKind) -> Self {
        Self {
            path: path.into(),
            feed,
            timestamp: std::time::Instant::now(),
        }
    }
}

impl fmt::Display for ScreenshotEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\"{}\" [{}] ({}ms ago)",
            self.path,
            self.feed,
            self.timestamp.elapsed().as_millis()
        )
    }
}
