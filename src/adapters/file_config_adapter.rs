//! INI file configuration adapter.

use configparser::ini::Ini;
use std::path::Path;

use crate::ports::config_port::ConfigPort;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Ini::new();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_u64(&self, section: &str, key: &str, default: u64) -> u64 {
        self.config
            .getuint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_f64(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"
[feed]
base_price = 1975.5
volatility = 8
currency = USD

[monitor]
refresh_secs = 10

[store]
data_dir = /var/lib/goldwatch
"#;

    #[test]
    fn from_string_reads_sections() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(adapter.get_f64("feed", "base_price", 0.0), 1975.5);
        assert_eq!(adapter.get_u64("monitor", "refresh_secs", 5), 10);
        assert_eq!(
            adapter.get_string("store", "data_dir").as_deref(),
            Some("/var/lib/goldwatch")
        );
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let adapter = FileConfigAdapter::from_string("[feed]\n").unwrap();
        assert_eq!(adapter.get_f64("feed", "base_price", 2050.0), 2050.0);
        assert_eq!(adapter.get_u64("monitor", "refresh_secs", 5), 5);
        assert!(adapter.get_string("store", "data_dir").is_none());
    }

    #[test]
    fn from_file_reads_from_disk() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{SAMPLE}").unwrap();
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(adapter.get_f64("feed", "volatility", 0.0), 8.0);
    }

    #[test]
    fn from_file_missing_path_errors() {
        assert!(FileConfigAdapter::from_file("/nonexistent/goldwatch.ini").is_err());
    }
}
