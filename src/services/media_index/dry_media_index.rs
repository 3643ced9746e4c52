use crate::error::Result;
use crate::events::{FeedKind, MediaRecord};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;

use super::r#trait::MediaIndexTrait;

/// Канонические пути для режима эмуляции: чередуем скриншоты и обычные
/// снимки
const FAKE_PATHS: &[&str] = &[
    "/storage/emulated/0/Pictures/Screenshots/Screenshot_20200705-234705.jpg",
    "/storage/emulated/0/DCIM/Camera/IMG_20200705_234705.jpg",
    "/sdcard/Pictures/SCREEN-CAP-001.png",
    "/storage/emulated/0/Download/wallpaper.png",
];

pub struct DryRunMediaIndex {
    cursor: AtomicUsize,
}

impl DryRunMediaIndex {
    pub fn new() -> Self {
        info!("Инициализация DryRunMediaIndex");
        Self {
            cursor: AtomicUsize::new(0),
        }
    }
}

#[async_trait::async_trait]
impl MediaIndexTrait for DryRunMediaIndex {
    async fn fetch_latest(&self, _feed: FeedKind) -> Result<Option<MediaRecord>> {
        let index = self.cursor.fetch_add(1, Ordering::Relaxed) % FAKE_PATHS.len();
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|duration| duration.as_secs() as i64)
            .unwrap_or(0);

        Ok(Some(
            MediaRecord::new(FAKE_PATHS[index])
                .with_date_added(now)
                .with_date_taken(now),
        ))
    }
}
