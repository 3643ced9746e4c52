use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Downstream callback notified once per positive classification.
///
/// Implementations MUST be cheap and non-blocking: `on_shot` is invoked from
/// the background classification context. Anything heavier than forwarding
/// the path into a channel belongs to the consumer side.
pub trait OnScreenShotListener: Send + Sync {
    fn on_shot(&self, path: &str);
}

/// Слушатель-заглушка: состояние "слушатель не установлен" безопасно
#[allow(dead_code)]
pub struct NoopListener;

impl OnScreenShotListener for NoopListener {
    fn on_shot(&self, path: &str) {
        debug!("NoopListener: событие скриншота пропущено: {}", path);
    }
}

/// Слушатель, пересылающий пути в канал для доставки на основном контексте
pub struct ChannelListener {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelListener {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl OnScreenShotListener for ChannelListener {
    fn on_shot(&self, path: &str) {
        if self.tx.send(path.to_string()).is_err() {
            warn!("Канал доставки скриншотов закрыт - событие потеряно: {}", path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_channel_listener_delivers() {
        let (listener, mut rx) = ChannelListener::new();
        listener.on_shot("/tmp/Screenshot_1.png");
        assert_eq!(rx.recv().await.as_deref(), Some("/tmp/Screenshot_1.png"));
    }

    #[test]
    fn test_channel_listener_survives_closed_channel() {
        let (listener, rx) = ChannelListener::new();
        drop(rx);
        // Закрытый канал не должен приводить к панике
        listener.on_shot("/tmp/Screenshot_2.png");
    }

    #[test]
    fn test_noop_listener_is_harmless() {
        NoopListener.on_shot("/tmp/Screenshot_3.png");
    }
}
