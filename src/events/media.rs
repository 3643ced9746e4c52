use std::borrow::Cow;
use std::fmt;
use std::path::PathBuf;

/// Запись медиаиндекса. Извлекается заново при каждом уведомлении и
/// никогда не кэшируется.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRecord {
    pub path: PathBuf,
    /// Время добавления записи в индекс (unix-секунды)
    pub date_added: i64,
    /// Время съёмки (unix-секунды) - наблюдается, но в классификации
    /// не участвует
    pub date_taken: i64,
}

impl MediaRecord {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            date_added: 0,
            date_taken: 0,
        }
    }

    pub fn with_date_added(mut self, date_added: i64) -> Self {
        self.date_added = date_added;
        self
    }

    pub fn with_date_taken(mut self, date_taken: i64) -> Self {
        self.date_taken = date_taken;
        self
    }

    /// Путь в виде строки для классификации
    pub fn path_str(&self) -> Cow<'_, str> {
        self.path.to_string_lossy()
    }
}

impl fmt::Display for MediaRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (added: {}, taken: {})",
            self.path.display(),
            self.date_added,
            self.date_taken
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_record_builders() {
        let record = MediaRecord::new("/sdcard/Pictures/shot.png")
            .with_date_added(1593964025)
            .with_date_taken(1593964020);

        assert_eq!(record.path, PathBuf::from("/sdcard/Pictures/shot.png"));
        assert_eq!(record.date_added, 1593964025);
        assert_eq!(record.date_taken, 1593964020);
    }

    #[test]
    fn test_media_record_path_str() {
        let record = MediaRecord::new("/tmp/a.jpg");
        assert_eq!(record.path_str(), "/tmp/a.jpg");
    }

    #[test]
    fn test_media_record_display() {
        let record = MediaRecord::new("/tmp/a.jpg").with_date_added(10);
        let rendered = record.to_string();
        assert!(rendered.contains("/tmp/a.jpg"));
        assert!(rendered.contains("added: 10"));
    }
}
