use crate::config::Config;
use crate::debug_if_enabled;
use crate::error::{Result, ShotError};
use crate::events::{ChangeNotice, FeedKind};
use crate::services::ShotDetector;
use crate::shot_error;
use crate::utils::DirFinder;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tokio::sync::mpsc;
use tokio::time::{interval, Duration};
use tracing::{error, info, warn};

use super::r#trait::FeedWatcherTrait;

pub struct RealFeedWatcher {
    config: Arc<Config>,
    detector: Arc<ShotDetector>,
    feed: FeedKind,
    root: PathBuf,
    watcher: Option<RecommendedWatcher>,
    events_rx: Option<mpsc::UnboundedReceiver<notify::Result<Event>>>,
}

impl RealFeedWatcher {
    pub fn new(config: Arc<Config>, detector: Arc<ShotDetector>, feed: FeedKind) -> Result<Self> {
        info!("Инициализация RealFeedWatcher для ленты {}", feed.uri());

        let root = DirFinder::resolve_feed_dir(config.feeds.dir_for(feed), feed)?;

        // В режиме notify подписка регистрируется сразу, чтобы ошибка
        // регистрации всплыла на этапе инициализации
        let (watcher, events_rx) = match config.feeds.watch_mode.as_str() {
            "notify" => {
                let (watcher, events_rx) = Self::register_subscription(&root, feed)?;
                (Some(watcher), Some(events_rx))
            }
            _ => (None, None),
        };

        Ok(Self {
            config,
            detector,
            feed,
            root,
            watcher,
            events_rx,
        })
    }

    fn register_subscription(
        root: &Path,
        feed: FeedKind,
    ) -> Result<(
        RecommendedWatcher,
        mpsc::UnboundedReceiver<notify::Result<Event>>,
    )> {
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let mut watcher = RecommendedWatcher::new(
            move |result| {
                if events_tx.send(result).is_err() {
                    error!("Канал событий ленты {} закрыт", feed);
                }
            },
            notify::Config::default(),
        )
        .map_err(|e| {
            shot_error!(
                subscription,
                "Не удалось создать наблюдателя для ленты {}: {}",
                feed,
                e
            )
        })?;

        watcher
            .watch(root, RecursiveMode::Recursive)
            .map_err(|e| shot_error!(subscription, "Не удалось подписаться на {:?}: {}", root, e))?;

        info!("Подписка на {:?} зарегистрирована", root);
        Ok((watcher, events_rx))
    }

    async fn run_impl(mut self) -> Result<()> {
        info!(
            "RealFeedWatcher запущен для ленты {} ({:?})",
            self.feed, self.root
        );

        match self.config.feeds.watch_mode.as_str() {
            "notify" => {
                if let Err(e) = self.run_notify_loop().await {
                    warn!(
                        "Наблюдение через notify не удалось: {}, переключаемся на polling",
                        e
                    );
                    self.run_polling_loop().await?;
                }
            }
            "polling" => {
                self.run_polling_loop().await?;
            }
            _ => {
                return Err(ShotError::Internal(format!(
                    "Неизвестный режим наблюдения: {}",
                    self.config.feeds.watch_mode
                )));
            }
        }
        Ok(())
    }

    async fn run_notify_loop(&mut self) -> Result<()> {
        let mut events_rx = match self.events_rx.take() {
            Some(events_rx) => events_rx,
            None => {
                return Err(ShotError::ServiceUnavailable(
                    "Подписка не зарегистрирована".to_string(),
                ))
            }
        };

        while let Some(result) = events_rx.recv().await {
            match result {
                Ok(event) => {
                    if !Self::is_change_event(&event) {
                        debug_if_enabled!("Пропуск события {:?}", event.kind);
                        continue;
                    }
                    self.dispatch_change().await;
                }
                Err(e) => {
                    warn!("Ошибка наблюдателя ленты {}: {}", self.feed, e);
                }
            }
        }

        Err(ShotError::ServiceUnavailable(format!(
            "Поток событий ленты {} завершился",
            self.feed
        )))
    }

    /// Интересны только появления и изменения записей
    fn is_change_event(event: &Event) -> bool {
        matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_))
    }

    async fn run_polling_loop(&mut self) -> Result<()> {
        info!("Запуск polling наблюдения для ленты {}", self.feed);

        let mut ticker = interval(Duration::from_millis(self.config.feeds.polling_interval_ms));
        let mut last_seen: Option<SystemTime> = None;

        loop {
            ticker.tick().await;

            let newest = Self::newest_mtime(&self.root, self.config.detection.scan_depth);

            if let Some(newest) = newest {
                // Первый тик лишь запоминает исходное состояние
                if let Some(last) = last_seen {
                    if newest > last {
                        self.dispatch_change().await;
                    }
                }
                if last_seen.map_or(true, |last| newest > last) {
                    last_seen = Some(newest);
                }
            }
        }
    }

    fn newest_mtime(dir: &Path, depth: usize) -> Option<SystemTime> {
        let entries = std::fs::read_dir(dir).ok()?;
        let mut newest: Option<SystemTime> = None;

        for entry in entries.flatten() {
            let path = entry.path();
            let candidate = if path.is_dir() {
                if depth == 0 {
                    continue;
                }
                Self::newest_mtime(&path, depth - 1)
            } else {
                entry.metadata().ok().and_then(|metadata| metadata.modified().ok())
            };

            if let Some(candidate) = candidate {
                if newest.map_or(true, |current| candidate > current) {
                    newest = Some(candidate);
                }
            }
        }

        newest
    }

    /// Безусловная пересылка уведомления классификатору
    async fn dispatch_change(&self) {
        // В файловом бэкенде self_change всегда false - поле наблюдается,
        // но на обработку не влияет
        let notice = ChangeNotice::new(self.feed, false);
        debug_if_enabled!("Уведомление об изменении: {}", notice);

        if let Err(e) = self.detector.handle_change(&notice).await {
            error!("Ошибка обработки уведомления в ShotDetector: {}", e);
        }
    }
}

#[async_trait::async_trait]
impl FeedWatcherTrait for RealFeedWatcher {
    async fn run(self: Box<Self>) -> Result<()> {
        (*self).run_impl().await
    }
}

impl Drop for RealFeedWatcher {
    fn drop(&mut self) {
        // Снятие подписки идемпотентно: take() гарантирует однократность
        if let Some(mut watcher) = self.watcher.take() {
            info!("Снятие подписки с {:?}", self.root);
            if let Err(e) = watcher.unwatch(&self.root) {
                warn!("Не удалось снять подписку: {}", e);
            }
        }
    }
}
