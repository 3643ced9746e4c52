use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

mod config;
mod error;
mod events;
mod services;
mod utils;

use config::Config;
use services::{create_media_index, ChannelListener, ShotDetector, WatchManager};

#[derive(Parser, Debug)]
#[command(name = "shotwatch")]
#[command(about = "Утилита для обнаружения скриншотов по изменениям в медиакаталогах")]
struct Args {
    /// Путь к файлу конфигурации
    #[arg(short, long, default_value = "shotwatch.toml")]
    config: String,

    /// Режим сухого запуска (без реальных подписок)
    #[arg(long)]
    dry_run: bool,

    /// Уровень логирования
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Инициализация системы логирования
    init_tracing(&args.log_level)?;

    info!("Запуск shotwatch v{}", env!("CARGO_PKG_VERSION"));

    // Загрузка конфигурации
    let config = Arc::new(Config::load(&args.config)?);
    info!("Конфигурация загружена из: {}", args.config);

    if args.dry_run {
        warn!("Режим сухого запуска - реальные подписки отключены");
    }

    // Проверка прав доступа
    utils::permissions::check_permissions(&config)?;

    // Инициализация компонентов
    let media_index = create_media_index(config.clone(), args.dry_run)?;
    let detector = Arc::new(ShotDetector::new(config.clone(), media_index));

    // Слушатель пересылает пути обнаруженных скриншотов на основной контекст
    let (listener, mut shots_rx) = ChannelListener::new();
    detector.set_listener(Arc::new(listener));

    let manager = WatchManager::new();
    manager.start(config.clone(), detector.clone(), args.dry_run)?;

    info!("Все компоненты инициализированы");

    // Доставка событий на основном контексте
    let delivery_handle = tokio::spawn(async move {
        while let Some(path) = shots_rx.recv().await {
            info!("Обнаружен скриншот: {}", path);
        }
    });

    info!("Все сервисы запущены");

    // Ожидание сигнала завершения
    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Получен сигнал завершения (Ctrl+C)");
        }
        Err(err) => {
            error!("Ошибка при ожидании сигнала завершения: {}", err);
        }
    }

    info!("Завершение работы...");

    // Корректная остановка наблюдателей (идемпотентна)
    manager.teardown_gracefully().await;

    let (cycles, shots) = detector.stats();
    info!(
        "Всего циклов классификации: {}, обнаружено скриншотов: {}",
        cycles, shots
    );

    // Прерываем задачу доставки и ожидаем её завершения (с таймаутом)
    delivery_handle.abort();

    let shutdown_timeout = tokio::time::Duration::from_secs(5);
    let shutdown_result = tokio::time::timeout(shutdown_timeout, async {
        let _ = delivery_handle.await;
    })
    .await;

    match shutdown_result {
        Ok(_) => info!("Все сервисы завершили работу корректно"),
        Err(_) => warn!("Таймаут при завершении сервисов"),
    }

    info!("shotwatch завершил работу");
    Ok(())
}

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().compact())
        .init();

    Ok(())
}
