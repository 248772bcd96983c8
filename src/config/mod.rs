mod cli;
mod file;

pub use cli::{Cli, Command};

use std::path::PathBuf;

use file::FileConfig;

use crate::error::MonitorError;
use crate::presence::{PresenceSettings, DEFAULT_DEBOUNCE_MS, DEFAULT_POLL_INTERVAL_MS};

const DEFAULT_RECONNECT_DELAY_MS: u64 = 2000;

/// Merged configuration from CLI args and TOML file.
#[derive(Debug, Clone)]
pub struct Config {
    /// Explicit event device; `None` means auto-detect.
    pub device: Option<PathBuf>,
    pub presence: PresenceSettings,
    pub reconnect_delay_ms: u64,
    pub exit_on_disconnect: bool,
    pub ascii_icon: bool,
    pub print_log: bool,
}

impl Config {
    /// Load configuration by merging TOML file with CLI overrides.
    pub fn load(cli: &Cli) -> Self {
        let file_config = cli
            .config
            .as_ref()
            .and_then(|p| file::load_from_path(p))
            .or_else(file::load_from_default_paths)
            .unwrap_or_default();

        Self::merge(cli, file_config)
    }

    fn merge(cli: &Cli, file_config: FileConfig) -> Self {
        Self {
            device: cli.device.clone().or(file_config.device),
            presence: PresenceSettings {
                debounce_ms: cli
                    .debounce_ms
                    .or(file_config.debounce_ms)
                    .unwrap_or(DEFAULT_DEBOUNCE_MS),
                poll_interval_ms: cli
                    .poll_ms
                    .or(file_config.poll_ms)
                    .unwrap_or(DEFAULT_POLL_INTERVAL_MS),
            },
            reconnect_delay_ms: cli
                .reconnect_delay_ms
                .or(file_config.reconnect_delay_ms)
                .unwrap_or(DEFAULT_RECONNECT_DELAY_MS),
            exit_on_disconnect: cli.exit_on_disconnect || file_config.exit_on_disconnect,
            ascii_icon: cli.ascii_icon || file_config.ascii_icon,
            print_log: cli.print_log || file_config.print_log,
        }
    }

    pub fn validate(&self) -> Result<(), MonitorError> {
        if self.presence.debounce_ms == 0 {
            return Err(MonitorError::InvalidConfig("debounce window must be non-zero"));
        }
        if self.presence.poll_interval_ms == 0 {
            return Err(MonitorError::InvalidConfig("poll interval must be non-zero"));
        }
        if self.presence.poll_interval_ms > self.presence.debounce_ms {
            log::warn!(
                "Poll interval {}ms exceeds debounce window {}ms; releases will lag",
                self.presence.poll_interval_ms,
                self.presence.debounce_ms
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("touchpad-monitor").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults() {
        let config = Config::merge(&cli(&[]), FileConfig::default());
        assert_eq!(config.device, None);
        assert_eq!(config.presence, PresenceSettings::default());
        assert_eq!(config.reconnect_delay_ms, DEFAULT_RECONNECT_DELAY_MS);
        assert!(!config.exit_on_disconnect);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_overrides_file() {
        let file = FileConfig {
            device: Some("/dev/input/event3".into()),
            debounce_ms: Some(200),
            poll_ms: Some(40),
            ascii_icon: true,
            ..Default::default()
        };
        let config = Config::merge(
            &cli(&["--device", "/dev/input/event9", "--debounce-ms", "120"]),
            file,
        );

        assert_eq!(config.device, Some(PathBuf::from("/dev/input/event9")));
        assert_eq!(config.presence.debounce_ms, 120);
        assert_eq!(config.presence.poll_interval_ms, 40);
        assert!(config.ascii_icon);
    }

    #[test]
    fn test_zero_intervals_rejected() {
        let config = Config::merge(&cli(&["--debounce-ms", "0"]), FileConfig::default());
        assert!(matches!(config.validate(), Err(MonitorError::InvalidConfig(_))));

        let config = Config::merge(&cli(&["--poll-ms", "0"]), FileConfig::default());
        assert!(matches!(config.validate(), Err(MonitorError::InvalidConfig(_))));
    }

    #[test]
    fn test_subcommands() {
        assert!(matches!(cli(&["dump"]).command, Some(Command::Dump)));
        assert!(matches!(cli(&["devices"]).command, Some(Command::Devices)));
        assert!(cli(&[]).command.is_none());
    }
}
