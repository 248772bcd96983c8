use serde::Deserialize;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "touchpad-monitor.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub device: Option<PathBuf>,
    pub debounce_ms: Option<u64>,
    pub poll_ms: Option<u64>,
    pub reconnect_delay_ms: Option<u64>,
    #[serde(default)]
    pub exit_on_disconnect: bool,
    #[serde(default)]
    pub ascii_icon: bool,
    #[serde(default)]
    pub print_log: bool,
}

pub fn load_from_path(path: &Path) -> Option<FileConfig> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => {
            log::debug!("Loaded config from {}", path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!("Failed to parse {}: {}", path.display(), e);
            None
        }
    }
}

pub fn load_from_default_paths() -> Option<FileConfig> {
    for path in default_config_paths() {
        if path.exists() {
            if let Some(config) = load_from_path(&path) {
                return Some(config);
            }
        }
    }
    None
}

fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];

    if let Ok(home) = std::env::var("HOME") {
        paths.push(PathBuf::from(home).join(".config").join(CONFIG_FILE_NAME));
    }

    paths
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_file() {
        let config: FileConfig = toml::from_str(
            r#"
            device = "/dev/input/event7"
            debounce_ms = 150
            poll_ms = 25
            reconnect_delay_ms = 500
            exit_on_disconnect = true
            ascii_icon = true
            "#,
        )
        .unwrap();

        assert_eq!(config.device, Some(PathBuf::from("/dev/input/event7")));
        assert_eq!(config.debounce_ms, Some(150));
        assert_eq!(config.poll_ms, Some(25));
        assert_eq!(config.reconnect_delay_ms, Some(500));
        assert!(config.exit_on_disconnect);
        assert!(config.ascii_icon);
        assert!(!config.print_log);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert!(config.device.is_none());
        assert!(config.debounce_ms.is_none());
        assert!(!config.exit_on_disconnect);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(toml::from_str::<FileConfig>("debounce = 100").is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(load_from_path(Path::new("/nonexistent/touchpad-monitor.toml")).is_none());
    }
}
