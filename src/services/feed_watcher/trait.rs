use crate::config::Config;
use crate::error::Result;
use crate::events::FeedKind;
use crate::services::ShotDetector;
use std::sync::Arc;

/// Trait for feed watchers that can run in different modes
#[async_trait::async_trait]
pub trait FeedWatcherTrait {
    /// Run the feed watcher
    async fn run(self: Box<Self>) -> Result<()>;
}

/// Factory function to create an appropriate feed watcher based on the dry_run flag
pub fn create_feed_watcher(
    config: Arc<Config>,
    detector: Arc<ShotDetector>,
    feed: FeedKind,
    dry_run: bool,
) -> Result<Box<dyn FeedWatcherTrait + Send>> {
    if dry_run {
        Ok(Box::new(super::dry_feed_watcher::DryRunFeedWatcher::new(
            detector, feed,
        )))
    } else {
        Ok(Box::new(super::feed_watcher::RealFeedWatcher::new(
            config, detector, feed,
        )?))
    }
}
