use crate::config::Config;
use crate::debug_if_enabled;
use crate::error::Result;
use crate::events::{ChangeNotice, FeedKind, MediaRecord, ScreenshotEvent};
use crate::services::listener::OnScreenShotListener;
use crate::services::media_index::MediaIndexTrait;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::time::{timeout, Duration};
use tracing::{debug, info, warn};

pub struct ShotDetector {
    config: Arc<Config>,
    media_index: Arc<dyn MediaIndexTrait + Send + Sync>,
    // Слот слушателя: запись (set_listener) и чтение (emit) могут идти
    // из разных контекстов исполнения
    listener: RwLock<Option<Arc<dyn OnScreenShotListener>>>,
    // Счётчики для диагностики
    cycles: AtomicU64,
    shots: AtomicU64,
}

impl ShotDetector {
    pub fn new(config: Arc<Config>, media_index: Arc<dyn MediaIndexTrait + Send + Sync>) -> Self {
        info!(
            "Инициализация ShotDetector ({} ключевых слов)",
            config.keywords().len()
        );

        Self {
            config,
            media_index,
            listener: RwLock::new(None),
            cycles: AtomicU64::new(0),
            shots: AtomicU64::new(0),
        }
    }

    /// Установить слушателя (заменяет предыдущего)
    pub fn set_listener(&self, listener: Arc<dyn OnScreenShotListener>) {
        *self.listener.write() = Some(listener);
    }

    /// Снять слушателя - дальнейшие совпадения молча отбрасываются
    #[allow(dead_code)]
    pub fn clear_listener(&self) {
        *self.listener.write() = None;
    }

    /// Один цикл fetch-classify-emit. Ошибки запроса, пустой результат и
    /// таймаут трактуются как "нет события" и никогда не доходят до
    /// слушателя.
    pub async fn handle_change(&self, notice: &ChangeNotice) -> Result<()> {
        self.cycles.fetch_add(1, Ordering::Relaxed);
        debug_if_enabled!("Обработка уведомления: {}", notice);
        // notice.self_change наблюдается, но на обработку не влияет

        let query_timeout = Duration::from_millis(self.config.detection.query_timeout_ms);
        let record = match timeout(query_timeout, self.media_index.fetch_latest(notice.feed)).await
        {
            Err(_) => {
                warn!(
                    "Таймаут запроса к медиаиндексу ({:?}) для ленты {}",
                    query_timeout, notice.feed
                );
                return Ok(());
            }
            Ok(Err(e)) => {
                warn!("Ошибка запроса к медиаиндексу для ленты {}: {}", notice.feed, e);
                return Ok(());
            }
            Ok(Ok(None)) => {
                debug_if_enabled!("Лента {} пуста - нет события", notice.feed);
                return Ok(());
            }
            Ok(Ok(Some(record))) => record,
        };

        self.handle_media_record(notice.feed, &record);
        Ok(())
    }

    /// Классификация полученной записи и доставка события слушателю
    fn handle_media_record(&self, feed: FeedKind, record: &MediaRecord) {
        let path = record.path_str();

        if self.config.is_screenshot_path(&path) {
            info!("Скриншот в ленте {}: {}", feed, record);
            self.shots.fetch_add(1, Ordering::Relaxed);
            self.emit(ScreenshotEvent::new(path.into_owned(), feed));
        } else {
            debug_if_enabled!("Не скриншот: {}", record);
        }
    }

    fn emit(&self, event: ScreenshotEvent) {
        let listener = self.listener.read().clone();
        match listener {
            Some(listener) => listener.on_shot(&event.path),
            None => debug!("Слушатель не установлен - событие {} отброшено", event),
        }
    }

    /// Счётчики: (всего циклов, обнаружено скриншотов)
    pub fn stats(&self) -> (u64, u64) {
        (
            self.cycles.load(Ordering::Relaxed),
            self.shots.load(Ordering::Relaxed),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ShotError;
    use std::sync::atomic::AtomicUsize;

    struct StubIndex {
        record: Option<MediaRecord>,
    }

    #[async_trait::async_trait]
    impl MediaIndexTrait for StubIndex {
        async fn fetch_latest(&self, _feed: FeedKind) -> Result<Option<MediaRecord>> {
            Ok(self.record.clone())
        }
    }

    struct FailingIndex;

    #[async_trait::async_trait]
    impl MediaIndexTrait for FailingIndex {
        async fn fetch_latest(&self, _feed: FeedKind) -> Result<Option<MediaRecord>> {
            Err(ShotError::ServiceUnavailable("индекс недоступен".to_string()))
        }
    }

    struct SlowIndex;

    #[async_trait::async_trait]
    impl MediaIndexTrait for SlowIndex {
        async fn fetch_latest(&self, _feed: FeedKind) -> Result<Option<MediaRecord>> {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok(None)
        }
    }

    #[derive(Default)]
    struct CountingListener {
        hits: AtomicUsize,
        last_path: parking_lot::Mutex<Option<String>>,
    }

    impl OnScreenShotListener for CountingListener {
        fn on_shot(&self, path: &str) {
            self.hits.fetch_add(1, Ordering::SeqCst);
            *self.last_path.lock() = Some(path.to_string());
        }
    }

    fn detector_with(record: Option<MediaRecord>) -> ShotDetector {
        ShotDetector::new(
            Arc::new(Config::default()),
            Arc::new(StubIndex { record }),
        )
    }

    fn notice() -> ChangeNotice {
        ChangeNotice::new(FeedKind::External, false)
    }

    #[tokio::test]
    async fn test_screenshot_record_reaches_listener() {
        let detector = detector_with(Some(MediaRecord::new(
            "/storage/emulated/0/Pictures/Screenshots/Screenshot_20200705-234705.jpg",
        )));
        let listener = Arc::new(CountingListener::default());
        detector.set_listener(listener.clone());

        detector.handle_change(&notice()).await.unwrap();

        assert_eq!(listener.hits.load(Ordering::SeqCst), 1);
        assert_eq!(
            listener.last_path.lock().as_deref(),
            Some("/storage/emulated/0/Pictures/Screenshots/Screenshot_20200705-234705.jpg")
        );
    }

    #[tokio::test]
    async fn test_camera_record_is_dropped() {
        let detector = detector_with(Some(MediaRecord::new(
            "/storage/emulated/0/DCIM/Camera/IMG_20200705_234705.jpg",
        )));
        let listener = Arc::new(CountingListener::default());
        detector.set_listener(listener.clone());

        detector.handle_change(&notice()).await.unwrap();

        assert_eq!(listener.hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_feed_produces_no_event() {
        let detector = detector_with(None);
        let listener = Arc::new(CountingListener::default());
        detector.set_listener(listener.clone());

        detector.handle_change(&notice()).await.unwrap();

        assert_eq!(listener.hits.load(Ordering::SeqCst), 0);
        assert_eq!(detector.stats(), (1, 0));
    }

    #[tokio::test]
    async fn test_index_failure_is_not_fatal() {
        let detector = ShotDetector::new(Arc::new(Config::default()), Arc::new(FailingIndex));
        let listener = Arc::new(CountingListener::default());
        detector.set_listener(listener.clone());

        // Ошибка индекса трактуется как "нет события"
        assert!(detector.handle_change(&notice()).await.is_ok());
        assert_eq!(listener.hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_slow_index_hits_timeout() {
        let mut config = Config::default();
        config.detection.query_timeout_ms = 50;

        let detector = ShotDetector::new(Arc::new(config), Arc::new(SlowIndex));
        let listener = Arc::new(CountingListener::default());
        detector.set_listener(listener.clone());

        assert!(detector.handle_change(&notice()).await.is_ok());
        assert_eq!(listener.hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_listener_is_harmless() {
        let detector = detector_with(Some(MediaRecord::new("/sdcard/Pictures/SCREEN-CAP-001.png")));

        // Слушатель не установлен - событие молча отбрасывается
        assert!(detector.handle_change(&notice()).await.is_ok());
        assert_eq!(detector.stats(), (1, 1));
    }

    #[tokio::test]
    async fn test_rapid_notifications_trigger_independent_cycles() {
        let detector = detector_with(Some(MediaRecord::new(
            "/home/user/Pictures/Screenshots/shot.png",
        )));
        let listener = Arc::new(CountingListener::default());
        detector.set_listener(listener.clone());

        detector.handle_change(&notice()).await.unwrap();
        detector
            .handle_change(&ChangeNotice::new(FeedKind::Internal, true))
            .await
            .unwrap();

        assert_eq!(listener.hits.load(Ordering::SeqCst), 2);
        assert_eq!(detector.stats(), (2, 2));
    }

    #[tokio::test]
    async fn test_timestamps_do_not_affect_classification() {
        let detector = detector_with(Some(
            MediaRecord::new("/sdcard/Pictures/SCREEN-CAP-001.png")
                .with_date_added(-1)
                .with_date_taken(0),
        ));
        let listener = Arc::new(CountingListener::default());
        detector.set_listener(listener.clone());

        detector.handle_change(&notice()).await.unwrap();

        assert_eq!(listener.hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_set_listener_replaces_previous() {
        let detector = detector_with(Some(MediaRecord::new(
            "/home/user/Pictures/Screenshots/shot.png",
        )));
        let first = Arc::new(CountingListener::default());
        let second = Arc::new(CountingListener::default());

        detector.set_listener(first.clone());
        detector.set_listener(second.clone());

        detector.handle_change(&notice()).await.unwrap();

        assert_eq!(first.hits.load(Ordering::SeqCst), 0);
        assert_eq!(second.hits.load(Ordering::SeqCst), 1);
    }
}
