use crate::error::{Result, ShotError};
use crate::events::FeedKind;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub struct DirFinder;

impl DirFinder {
    /// Определить каталог ленты: явный путь из конфигурации или автопоиск
    pub fn resolve_feed_dir(configured: &str, feed: FeedKind) -> Result<PathBuf> {
        if configured != "auto" {
            let path = PathBuf::from(configured);
            return if path.is_dir() {
                info!("Используется указанный каталог ленты {}: {:?}", feed, path);
                Ok(path)
            } else {
                ShotError::feed_not_found(format!(
                    "Указанный каталог ленты {} не найден: {:?}",
                    feed, path
                ))
            };
        }

        // Автопоиск каталога ленты
        Self::auto_find_dir(feed)
    }

    fn auto_find_dir(feed: FeedKind) -> Result<PathBuf> {
        info!("Начинаем автопоиск каталога для ленты {}...", feed);

        for candidate in Self::candidates(feed) {
            if Self::is_dir_accessible(&candidate) {
                info!("Найден каталог ленты {}: {:?}", feed, candidate);
                return Ok(candidate);
            }
            debug!("Кандидат {:?} не подходит", candidate);
        }

        ShotError::feed_not_found(format!(
            "Не удалось найти каталог для ленты {}. \
             Укажите путь явно в секции [feeds] конфигурации",
            feed
        ))
    }

    /// Кандидаты: каталоги снимков пользователя для internal,
    /// точки монтирования съёмных носителей для external
    fn candidates(feed: FeedKind) -> Vec<PathBuf> {
        match feed {
            FeedKind::Internal => {
                let mut candidates = Vec::new();
                if let Ok(home) = std::env::var("HOME") {
                    let home = PathBuf::from(home);
                    candidates.push(home.join("Pictures").join("Screenshots"));
                    candidates.push(home.join("Pictures"));
                    candidates.push(home.join("Desktop"));
                }
                candidates
            }
            FeedKind::External => {
                let mut candidates = Vec::new();
                if let Ok(user) = std::env::var("USER") {
                    candidates.push(PathBuf::from("/run/media").join(&user));
                    candidates.push(PathBuf::from("/media").join(&user));
                }
                candidates.push(PathBuf::from("/media"));
                candidates.push(PathBuf::from("/mnt"));
                candidates
            }
        }
    }

    fn is_dir_accessible(path: &Path) -> bool {
        match fs::read_dir(path) {
            Ok(_) => true,
            Err(e) => {
                debug!("Каталог {:?} недоступен: {}", path, e);
                false
            }
        }
    }
}
