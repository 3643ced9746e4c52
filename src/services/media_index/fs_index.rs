use crate::config::Config;
use crate::error::Result;
use crate::events::{FeedKind, MediaRecord};
use crate::utils::DirFinder;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

use super::r#trait::MediaIndexTrait;

/// Расширения файлов, которые считаются медиаизображениями
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif", "bmp", "heic"];

/// Файловый медиаиндекс: запись с максимальным временем добавления - это
/// самый свежий медиафайл в дереве каталога ленты
pub struct FsMediaIndex {
    roots: HashMap<FeedKind, PathBuf>,
    scan_depth: usize,
}

impl FsMediaIndex {
    pub fn new(config: Arc<Config>) -> Result<Self> {
        info!("Инициализация FsMediaIndex");

        let mut roots = HashMap::new();
        for feed in FeedKind::all() {
            let root = DirFinder::resolve_feed_dir(config.feeds.dir_for(feed), feed)?;
            info!("Лента {} -> {:?}", feed, root);
            roots.insert(feed, root);
        }

        Ok(Self {
            roots,
            scan_depth: config.detection.scan_depth,
        })
    }

    /// Обход дерева с ограничением глубины: ищем самый свежий медиафайл.
    /// Недоступный каталог трактуется как пустой.
    fn newest_in_dir(dir: &Path, depth: usize) -> Option<(PathBuf, SystemTime, SystemTime)> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("Каталог {:?} недоступен: {}", dir, e);
                return None;
            }
        };

        let mut newest: Option<(PathBuf, SystemTime, SystemTime)> = None;

        for entry in entries.flatten() {
            let path = entry.path();

            if path.is_dir() {
                if depth > 0 {
                    if let Some(candidate) = Self::newest_in_dir(&path, depth - 1) {
                        newest = Self::pick_newer(newest, candidate);
                    }
                }
                continue;
            }

            if !Self::is_media_file(&path) {
                continue;
            }

            let metadata = match entry.metadata() {
                Ok(metadata) => metadata,
                Err(e) => {
                    debug!("Метаданные {:?} недоступны: {}", path, e);
                    continue;
                }
            };

            let modified = metadata.modified().unwrap_or(UNIX_EPOCH);
            let added = metadata.created().unwrap_or(modified);
            newest = Self::pick_newer(newest, (path, added, modified));
        }

        newest
    }

    fn pick_newer(
        current: Option<(PathBuf, SystemTime, SystemTime)>,
        candidate: (PathBuf, SystemTime, SystemTime),
    ) -> Option<(PathBuf, SystemTime, SystemTime)> {
        match current {
            Some(current) if current.1 >= candidate.1 => Some(current),
            _ => Some(candidate),
        }
    }

    fn is_media_file(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext = ext.to_lowercase();
                IMAGE_EXTENSIONS.iter().any(|known| *known == ext)
            })
            .unwrap_or(false)
    }

    fn unix_seconds(time: SystemTime) -> i64 {
        match time.duration_since(UNIX_EPOCH) {
            Ok(duration) => duration.as_secs() as i64,
            Err(_) => 0,
        }
    }
}

#[async_trait::async_trait]
impl MediaIndexTrait for FsMediaIndex {
    async fn fetch_latest(&self, feed: FeedKind) -> Result<Option<MediaRecord>> {
        let root = match self.roots.get(&feed) {
            Some(root) => root,
            None => return Ok(None),
        };

        // Аналог запроса "date_added desc limit 1"
        let newest = Self::newest_in_dir(root, self.scan_depth);

        Ok(newest.map(|(path, added, modified)| {
            let record = MediaRecord::new(path)
                .with_date_added(Self::unix_seconds(added))
                .with_date_taken(Self::unix_seconds(modified));
            debug!("Свежайшая запись ленты {}: {}", feed, record);
            record
        }))
    }
}
