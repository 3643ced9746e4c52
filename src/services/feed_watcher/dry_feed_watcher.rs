use crate::error::Result;
use crate::events::{ChangeNotice, FeedKind};
use crate::services::ShotDetector;
use std::sync::Arc;
use tokio::time::{interval, Duration};
use tracing::{error, info};

use super::r#trait::FeedWatcherTrait;

pub struct DryRunFeedWatcher {
    detector: Arc<ShotDetector>,
    feed: FeedKind,
}

impl DryRunFeedWatcher {
    pub fn new(detector: Arc<ShotDetector>, feed: FeedKind) -> Self {
        info!("Инициализация DryRunFeedWatcher для ленты {}", feed);
        Self { detector, feed }
    }

    async fn run_impl(self) -> Result<()> {
        info!("Dry-run режим - FeedWatcher работает в режиме эмуляции");

        let mut ticker = interval(Duration::from_secs(5));
        let mut iteration: u64 = 0;

        loop {
            ticker.tick().await;
            iteration += 1;

            // Чередуем self_change, показывая что поле не влияет на обработку
            let notice = ChangeNotice::new(self.feed, iteration % 2 == 0);
            info!("Dry-run: эмулируем уведомление {}", notice);

            if let Err(e) = self.detector.handle_change(&notice).await {
                error!("Ошибка обработки уведомления в ShotDetector: {}", e);
            }
        }
    }
}

#[async_trait::async_trait]
impl FeedWatcherTrait for DryRunFeedWatcher {
    async fn run(self: Box<Self>) -> Result<()> {
        (*self).run_impl().await
    }
}
