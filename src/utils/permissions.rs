use crate::config::Config;
use crate::error::{Result, ShotError};
use crate::events::FeedKind;
use std::fs;
use tracing::{info, warn};

/// Проверить доступ к необходимым ресурсам перед запуском
pub fn check_permissions(config: &Config) -> Result<()> {
    info!("Проверка прав доступа...");

    // Явно указанные каталоги лент
    check_feed_dirs(config)?;

    // Лимит inotify-наблюдателей
    check_inotify_limit();

    info!("Проверка прав доступа завершена успешно");
    Ok(())
}

fn check_feed_dirs(config: &Config) -> Result<()> {
    for feed in FeedKind::all() {
        let configured = config.feeds.dir_for(feed);
        if configured == "auto" {
            // Разрешается позже автопоиском
            continue;
        }

        let path = std::path::Path::new(configured);
        if !path.exists() {
            return Err(ShotError::Permission(format!(
                "Каталог ленты {} не существует: {}",
                feed, configured
            )));
        }

        match fs::read_dir(path) {
            Ok(_) => info!("Доступ к {} подтвержден", configured),
            Err(e) => {
                return Err(ShotError::Permission(format!(
                    "Нет доступа к {}: {}",
                    configured, e
                )))
            }
        }
    }

    Ok(())
}

/// При низком лимите inotify рекурсивное наблюдение может не охватить
/// всё дерево каталогов
fn check_inotify_limit() {
    const LIMIT_PATH: &str = "/proc/sys/fs/inotify/max_user_watches";
    const RECOMMENDED_MIN: u64 = 8192;

    match fs::read_to_string(LIMIT_PATH) {
        Ok(raw) => match raw.trim().parse::<u64>() {
            Ok(limit) if limit < RECOMMENDED_MIN => {
                warn!("Низкий лимит inotify-наблюдателей: {}", limit);
                warn!("   Рекомендуется увеличить:");
                warn!("   sudo sysctl fs.inotify.max_user_watches=524288");
                warn!("   (затем закрепите значение в /etc/sysctl.conf)");
            }
            Ok(limit) => info!("Лимит inotify-наблюдателей: {}", limit),
            Err(_) => warn!("Не удалось разобрать значение {}", LIMIT_PATH),
        },
        Err(_) => {
            // Не Linux либо procfs недоступен - проверка не критична
            info!("{} недоступен, пропускаем проверку лимита", LIMIT_PATH);
        }
    }
}

/// Получить рекомендуемые команды для настройки лимитов
#[allow(dead_code)]
pub fn get_setup_commands() -> Vec<String> {
    vec![
        "# Увеличить лимит inotify-наблюдателей:".to_string(),
        "sudo sysctl fs.inotify.max_user_watches=524288".to_string(),
        "".to_string(),
        "# Закрепить значение на постоянной основе:".to_string(),
        "echo 'fs.inotify.max_user_watches=524288' | sudo tee -a /etc/sysctl.conf".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_commands() {
        let commands = get_setup_commands();
        assert!(!commands.is_empty());
        assert!(commands.iter().any(|cmd| cmd.contains("sysctl")));
    }

    #[test]
    fn test_auto_dirs_pass_check() {
        let config = Config::default();
        assert!(check_feed_dirs(&config).is_ok());
    }

    #[test]
    fn test_missing_explicit_dir_fails_check() {
        let mut config = Config::default();
        config.feeds.internal_dir = "/non/existent/shotwatch".to_string();
        assert!(check_feed_dirs(&config).is_err());
    }
}
