//! FeedWatcher service: responsibility and boundaries
//!
//! This module and its submodules are responsible ONLY for maintaining the
//! change subscription of a single feed and forwarding every notification
//! to ShotDetector, tagged with the feed that changed. They MUST NOT fetch
//! records or classify paths: both belong exclusively to ShotDetector and
//! the media_index backends.

mod dry_feed_watcher;
mod feed_watcher;
mod r#trait;

pub use self::r#trait::{create_feed_watcher, FeedWatcherTrait};
