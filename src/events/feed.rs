use serde::{Deserialize, Serialize};
use std::fmt;

/// Лента медиаданных - две именованные реализации абстрактного
/// наблюдаемого источника ("внутреннее" и "внешнее" хранилище)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedKind {
    Internal,
    External,
}

impl FeedKind {
    /// Все известные ленты
    pub fn all() -> [FeedKind; 2] {
        [FeedKind::Internal, FeedKind::External]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FeedKind::Internal => "internal",
            FeedKind::External => "external",
        }
    }

    /// Идентификатор ленты в стиле URI (для логов)
    pub fn uri(&self) -> String {
        format!("media/{}", self.as_str())
    }
}

impl fmt::Display for FeedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_feeds() {
        let feeds = FeedKind::all();
        assert_eq!(feeds.len(), 2);
        assert!(feeds.contains(&FeedKind::Internal));
        assert!(feeds.contains(&FeedKind::External));
    }

    #[test]
    fn test_feed_display() {
        assert_eq!(FeedKind::Internal.to_string(), "internal");
        assert_eq!(FeedKind::External.to_string(), "external");
    }

    #[test]
    fn test_feed_uri() {
        assert_eq!(FeedKind::External.uri(), "media/external");
    }
}
