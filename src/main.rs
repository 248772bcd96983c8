use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use clap::Parser;

use touchpad_monitor::config::{Cli, Command, Config};
use touchpad_monitor::input::{EvdevGateway, InputGateway};
use touchpad_monitor::shell::TerminalShell;
use touchpad_monitor::{device, dump};
use touchpad_monitor::{
    finish_session, AuditLog, Clock, Monitor, MonitorError, MonitorHandle, MonotonicClock,
    SharedMonitor,
};

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();

    let default_filter = if cli.command.is_some() { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let config = Config::load(&cli);
    config.validate()?;

    match cli.command {
        Some(Command::Dump) => {
            let path = resolve_device(&config).ok_or("No touchpad found; pass --device")?;
            return dump::run_dump(&path);
        }
        Some(Command::Devices) => return dump::run_devices(),
        None => {}
    }

    log::info!(
        "touchpad-monitor starting (device={}, debounce={}ms, poll={}ms)",
        config
            .device
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "auto".into()),
        config.presence.debounce_ms,
        config.presence.poll_interval_ms
    );

    let audit = AuditLog::new();
    let clock: Arc<dyn Clock> = Arc::new(MonotonicClock::new());

    let mut monitor = Monitor::spawn(
        config.presence,
        audit.clone(),
        TerminalShell::new(config.ascii_icon),
    );
    monitor.start_ticker(
        Duration::from_millis(config.presence.poll_interval_ms),
        clock.clone(),
    );

    let handle = monitor.handle();
    let monitor = SharedMonitor::new(monitor);

    // The input loop blocks in read, so Ctrl+C/SIGTERM finishes the session from the handler.
    {
        let monitor = monitor.clone();
        let audit = audit.clone();
        let print_log = config.print_log;
        let installed = ctrlc::set_handler(move || {
            log::info!("Interrupted, shutting down");
            finish(&monitor, &audit, print_log);
            std::process::exit(0);
        });
        if let Err(e) = installed {
            log::warn!("Cannot install signal handler: {}", e);
        }
    }

    run_input(&config, &handle, clock.as_ref());

    finish(&monitor, &audit, config.print_log);
    Ok(())
}

fn finish(monitor: &SharedMonitor<TerminalShell>, audit: &AuditLog, print_log: bool) {
    let Some(export) = finish_session(monitor, audit) else {
        return;
    };
    log::info!("touchpad-monitor stopped");
    if print_log {
        println!("{}", export);
    }
}

fn resolve_device(config: &Config) -> Option<PathBuf> {
    config
        .device
        .clone()
        .or_else(|| device::find_touchpad().and_then(|d| d.event_node()))
}

/// Input loop on the main thread. Retries an unavailable touchpad until told not to.
fn run_input(config: &Config, handle: &MonitorHandle, clock: &dyn Clock) {
    let mut first_attempt = true;

    loop {
        let mut gateway = resolve_device(config).map(EvdevGateway::new);
        let exists = gateway.as_ref().is_some_and(|g| g.device_exists());

        let registered = match gateway.as_mut() {
            Some(g) if exists => match g.register() {
                Ok(()) => true,
                Err(e) => {
                    log::warn!("{}", e);
                    false
                }
            },
            _ => false,
        };

        if first_attempt {
            handle.note(format!("Precision touchpad exists: {}", exists));
            if exists {
                handle.note(format!("Precision touchpad registered: {}", registered));
            } else {
                log::warn!("No precision touchpad found; status stays idle");
            }
            first_attempt = false;
        }

        if let Some(g) = gateway.as_mut().filter(|_| registered) {
            match forward_frames(g, handle, clock) {
                Ok(()) => return,
                Err(e) => log::error!("{}", e),
            }
        }

        if config.exit_on_disconnect {
            return;
        }

        log::warn!(
            "Touchpad unavailable, retrying in {}ms…",
            config.reconnect_delay_ms
        );
        thread::sleep(Duration::from_millis(config.reconnect_delay_ms));
    }
}

/// Forward frames until the device fails. `Ok` means the monitor has stopped.
fn forward_frames(
    gateway: &mut EvdevGateway,
    handle: &MonitorHandle,
    clock: &dyn Clock,
) -> Result<(), MonitorError> {
    loop {
        let batch = gateway.next_batch(clock)?;
        if !handle.observe(batch) {
            return Ok(());
        }
    }
}
