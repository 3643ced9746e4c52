pub mod feed;
pub mod media;
pub mod screenshot;

pub use feed::FeedKind;
pub use media::MediaRecord;
pub use screenshot::ScreenshotEvent;

use std::fmt;

/// Уведомление об изменении ленты медиаданных
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeNotice {
    pub feed: FeedKind,
    /// Флаг "изменение вызвано нами самими" - наблюдается, но не влияет
    /// на обработку уведомления
    pub self_change: bool,
    pub timestamp: std::time::Instant,
}

impl ChangeNotice {
    pub fn new(feed: FeedKind, self_change: bool) -> Self {
        Self {
            feed,
            self_change,
            timestamp: std::time::Instant::now(),
        }
    }
}

impl fmt::Display for ChangeNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (self_change: {}, {}ms ago)",
            self.feed,
            self.self_change,
            self.timestamp.elapsed().as_millis()
        )
    }
}
