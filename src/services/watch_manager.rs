use crate::config::Config;
use crate::error::Result;
use crate::events::FeedKind;
use crate::services::feed_watcher::{create_feed_watcher, FeedWatcherTrait};
use crate::services::ShotDetector;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Владеет фоновыми задачами наблюдателей лент и отвечает за их остановку
pub struct WatchManager {
    handles: DashMap<FeedKind, JoinHandle<()>>,
    torn_down: AtomicBool,
}

impl WatchManager {
    pub fn new() -> Self {
        Self {
            handles: DashMap::new(),
            torn_down: AtomicBool::new(false),
        }
    }

    /// Создать и запустить наблюдателей обеих лент
    pub fn start(
        &self,
        config: Arc<Config>,
        detector: Arc<ShotDetector>,
        dry_run: bool,
    ) -> Result<()> {
        for feed in FeedKind::all() {
            let watcher = create_feed_watcher(config.clone(), detector.clone(), feed, dry_run)?;
            self.spawn_feed(feed, watcher);
        }

        info!("Наблюдатели запущены ({} лент)", self.handles.len());
        Ok(())
    }

    /// Запустить наблюдателя ленты (заменяет предыдущего, если был)
    pub fn spawn_feed(&self, feed: FeedKind, watcher: Box<dyn FeedWatcherTrait + Send>) {
        if self.torn_down.load(Ordering::SeqCst) {
            warn!(
                "WatchManager уже остановлен - наблюдатель ленты {} не запущен",
                feed
            );
            return;
        }

        let handle = tokio::spawn(async move {
            if let Err(e) = watcher.run().await {
                error!("Ошибка в FeedWatcher: {}", e);
            }
        });

        if let Some(previous) = self.handles.insert(feed, handle) {
            previous.abort();
        }
    }

    /// Количество активных наблюдателей
    pub fn active_feeds(&self) -> usize {
        self.handles.len()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down.load(Ordering::SeqCst)
    }

    /// Остановить всех наблюдателей. Идемпотентно: повторный вызов и вызов
    /// без предшествующего start - безопасные no-op
    pub async fn teardown_gracefully(&self) {
        if self.torn_down.swap(true, Ordering::SeqCst) {
            debug!("WatchManager уже остановлен");
            return;
        }

        let count = self.handles.len();
        if count > 0 {
            info!("Остановка {} наблюдателей", count);

            // Собираем все ключи
            let keys: Vec<FeedKind> = self.handles.iter().map(|entry| *entry.key()).collect();

            // Удаляем и останавливаем каждого наблюдателя
            for key in keys {
                if let Some((_, handle)) = self.handles.remove(&key) {
                    handle.abort();
                }
            }
        }
    }
}

impl Default for WatchManager {
    fn default() -> Self {
        Self::new()
    }
}
