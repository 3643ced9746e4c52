use crate::events::FeedKind;
use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Версионированный набор ключевых слов для классификации скриншотов (v1).
/// Порядок не важен - решение принимается по любому совпадению.
pub const SCREENSHOT_KEYWORDS_V1: &[&str] = &[
    "screenshot",
    "screen_shot",
    "screen-shot",
    "screen shot",
    "screencapture",
    "screen_capture",
    "screen-capture",
    "screen capture",
    "screencap",
    "screen_cap",
    "screen-cap",
    "screen cap",
    "screenshots",
];

// Предварительно нормализованный набор по умолчанию - строится один раз
static DEFAULT_KEYWORDS_LOWER: Lazy<Vec<String>> = Lazy::new(|| {
    SCREENSHOT_KEYWORDS_V1
        .iter()
        .map(|keyword| keyword.to_lowercase())
        .collect()
});

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub logging: LoggingConfig,
    pub feeds: FeedsConfig,
    pub detection: DetectionConfig,
    // Оптимизационный индекс - не сериализуется, строится после загрузки
    #[serde(skip)]
    keywords_lower: Vec<String>, // Предварительно нормализованные ключевые слова
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub filter: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeedsConfig {
    pub internal_dir: String,
    pub external_dir: String,
    pub watch_mode: String,
    pub polling_interval_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DetectionConfig {
    #[serde(default)]
    pub extra_keywords: Vec<String>,
    pub query_timeout_ms: u64,
    pub scan_depth: usize,
}

impl FeedsConfig {
    /// Настроенный каталог для ленты ("auto" разрешается позже автопоиском)
    pub fn dir_for(&self, feed: FeedKind) -> &str {
        match feed {
            FeedKind::Internal => &self.internal_dir,
            FeedKind::External => &self.external_dir,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let mut config = Self {
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
                filter: "shotwatch=info".to_string(),
            },
            feeds: FeedsConfig {
                internal_dir: "auto".to_string(),
                external_dir: "auto".to_string(),
                watch_mode: "notify".to_string(),
                polling_interval_ms: 1000,
            },
            detection: DetectionConfig {
                extra_keywords: Vec::new(),
                query_timeout_ms: 1000,
                scan_depth: 4,
            },
            keywords_lower: Vec::new(),
        };
        config.build_keyword_index();
        config
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        let figment = Figment::new()
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("SHOTWATCH_"));

        let mut config: Config = figment
            .extract()
            .with_context(|| format!("Не удалось загрузить конфигурацию из {:?}", config_path))?;

        config.validate()?;
        config.build_keyword_index();

        Ok(config)
    }

    /// Строит итоговый индекс ключевых слов: версионированный набор по
    /// умолчанию плюс дополнения из конфигурации, всё в нижнем регистре
    pub fn build_keyword_index(&mut self) {
        let mut keywords = DEFAULT_KEYWORDS_LOWER.clone();

        for keyword in &self.detection.extra_keywords {
            let keyword = keyword.to_lowercase();
            if !keywords.contains(&keyword) {
                keywords.push(keyword);
            }
        }

        self.keywords_lower = keywords;
    }

    pub fn validate(&self) -> Result<()> {
        // Валидация настроек логирования
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Неверный уровень логирования: {}", self.logging.level),
        }

        match self.logging.format.as_str() {
            "pretty" | "json" => {}
            _ => anyhow::bail!("Неверный формат логирования: {}", self.logging.format),
        }

        // Валидация настроек лент
        match self.feeds.watch_mode.as_str() {
            "notify" | "polling" => {}
            _ => anyhow::bail!("Неверный режим наблюдения: {}", self.feeds.watch_mode),
        }

        if self.feeds.polling_interval_ms < 100 {
            anyhow::bail!("polling_interval_ms должно быть минимум 100");
        }

        // Валидация настроек детекции
        if self.detection.query_timeout_ms == 0 {
            anyhow::bail!("query_timeout_ms должно быть больше 0");
        }

        for (i, keyword) in self.detection.extra_keywords.iter().enumerate() {
            if keyword.trim().is_empty() {
                anyhow::bail!("Пустое ключевое слово в detection.extra_keywords #{}", i + 1);
            }
        }

        Ok(())
    }

    /// ЕДИНСТВЕННЫЙ метод классификации: путь считается скриншотом, если в
    /// нижнем регистре содержит любое из ключевых слов (по подстроке).
    /// Временные метки записи на решение не влияют.
    pub fn is_screenshot_path(&self, path: &str) -> bool {
        // Одна аллокация + предварительно нормализованные ключевые слова
        let path_lower = path.to_lowercase();
        self.keywords_lower
            .iter()
            .any(|keyword| path_lower.contains(keyword))
    }

    /// Итоговый индекс ключевых слов
    pub fn keywords(&self) -> &[String] {
        &self.keywords_lower
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.keywords().len(), SCREENSHOT_KEYWORDS_V1.len());
    }

    #[test]
    fn test_is_screenshot_path() {
        let config = Config::default();

        // Путь со словом "screenshot" распознаётся
        assert!(config.is_screenshot_path(
            "/storage/emulated/0/Pictures/Screenshots/Screenshot_20200705-234705.jpg"
        ));

        // Обычный снимок камеры не распознаётся
        assert!(!config.is_screenshot_path(
            "/storage/emulated/0/DCIM/Camera/IMG_20200705_234705.jpg"
        ));

        // Регистронезависимое совпадение по "screen-cap"
        assert!(config.is_screenshot_path("/sdcard/Pictures/SCREEN-CAP-001.png"));
    }

    #[test]
    fn test_is_screenshot_path_substring_not_whole_word() {
        let config = Config::default();

        // Совпадение по подстроке, а не по целому слову
        assert!(config.is_screenshot_path("/home/user/myscreenshots_archive/1.png"));
        assert!(config.is_screenshot_path("/tmp/screen capture 42.png"));
        assert!(!config.is_screenshot_path("/home/user/screen/photo.png"));
    }

    #[test]
    fn test_extra_keywords_extend_index() {
        let mut config = Config::default();
        config.detection.extra_keywords = vec!["Снимок экрана".to_string()];

        // Перестраиваем индекс после изменения конфигурации
        config.build_keyword_index();

        assert!(config.is_screenshot_path("/home/user/Изображения/Снимок экрана 2020-07-05.png"));
        assert!(config.is_screenshot_path("/home/user/Изображения/снимок экрана.png"));
        assert_eq!(config.keywords().len(), SCREENSHOT_KEYWORDS_V1.len() + 1);
    }

    #[test]
    fn test_extra_keywords_deduplicated() {
        let mut config = Config::default();
        config.detection.extra_keywords = vec!["SCREENSHOT".to_string()];
        config.build_keyword_index();

        assert_eq!(config.keywords().len(), SCREENSHOT_KEYWORDS_V1.len());
    }

    #[test]
    fn test_invalid_watch_mode_rejected() {
        let mut config = Config::default();
        config.feeds.watch_mode = "dbus".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_extra_keyword_rejected() {
        let mut config = Config::default();
        config.detection.extra_keywords = vec!["  ".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_query_timeout_rejected() {
        let mut config = Config::default();
        config.detection.query_timeout_ms = 0;
        assert!(config.validate().is_err());
    }
}
