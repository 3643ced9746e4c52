use crate::config::Config;
use crate::error::Result;
use crate::events::{FeedKind, MediaRecord};
use std::sync::Arc;

/// Trait for media index backends that can run in different modes
#[async_trait::async_trait]
pub trait MediaIndexTrait: Send + Sync {
    /// Fetch the most recently added record of the feed, if any.
    /// An unreachable or empty store yields `Ok(None)`, not an error.
    async fn fetch_latest(&self, feed: FeedKind) -> Result<Option<MediaRecord>>;
}

/// Factory function to create an appropriate media index based on the dry_run flag
pub fn create_media_index(
    config: Arc<Config>,
    dry_run: bool,
) -> Result<Arc<dyn MediaIndexTrait + Send + Sync>> {
    if dry_run {
        Ok(Arc::new(super::dry_media_index::DryRunMediaIndex::new()))
    } else {
        Ok(Arc::new(super::fs_index::FsMediaIndex::new(config)?))
    }
}
