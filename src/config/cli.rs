use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "touchpad-monitor")]
#[command(about = "Show whether anyone is touching the touchpad")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Touchpad event device (auto-detected if omitted)
    #[arg(long, env = "TOUCHPAD_MONITOR_DEVICE")]
    pub device: Option<PathBuf>,

    /// Milliseconds without input before contacts are considered lifted
    #[arg(long)]
    pub debounce_ms: Option<u64>,

    /// Expiry check interval in milliseconds
    #[arg(long)]
    pub poll_ms: Option<u64>,

    /// Delay before retrying an unavailable touchpad, in milliseconds
    #[arg(long)]
    pub reconnect_delay_ms: Option<u64>,

    /// Exit instead of retrying when the touchpad disappears
    #[arg(long)]
    pub exit_on_disconnect: bool,

    /// Print an ASCII preview of the tray icon on every status change
    #[arg(long)]
    pub ascii_icon: bool,

    /// Print the audit log on exit
    #[arg(long)]
    pub print_log: bool,

    /// Path to config file
    #[arg(long, env = "TOUCHPAD_MONITOR_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Dump raw input events from the touchpad for debugging
    Dump,
    /// List input devices and mark detected touchpads
    Devices,
}
