use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShotError {
    #[error("Ошибка конфигурации: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("Ошибка наблюдателя файловой системы: {0}")]
    Watch(#[from] notify::Error),

    #[error("Не удалось зарегистрировать подписку: {0}")]
    Subscription(String),

    #[error("Каталог ленты не найден: {0}")]
    FeedNotFound(String),

    #[error("Недостаточно прав доступа: {0}")]
    Permission(String),

    #[error("Сервис недоступен: {0}")]
    ServiceUnavailable(String),

    #[error("Внутренняя ошибка: {0}")]
    Internal(String),
}

impl ShotError {
    pub fn feed_not_found<T>(msg: impl Into<String>) -> Result<T> {
        Err(ShotError::FeedNotFound(msg.into()))
    }
}

pub type Result<T> = std::result::Result<T, ShotError>;

// Удобные макросы для создания ошибок
#[macro_export]
macro_rules! shot_error {
    (subscription, $($arg:tt)*) => {
        $crate::error::ShotError::Subscription(format!($($arg)*))
    };
    (feed_not_found, $($arg:tt)*) => {
        $crate::error::ShotError::FeedNotFound(format!($($arg)*))
    };
    (permission, $($arg:tt)*) => {
        $crate::error::ShotError::Permission(format!($($arg)*))
    };
    (service_unavailable, $($arg:tt)*) => {
        $crate::error::ShotError::ServiceUnavailable(format!($($arg)*))
    };
    (internal, $($arg:tt)*) => {
        $crate::error::ShotError::Internal(format!($($arg)*))
    };
}
