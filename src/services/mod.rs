pub mod feed_watcher;
pub mod listener;
pub mod media_index;
pub mod shot_detector;
pub mod watch_manager;

pub use listener::ChannelListener;
pub use media_index::create_media_index;
pub use shot_detector::ShotDetector;
pub use watch_manager::WatchManager;
