//! Terminal front end: stands in for the tray icon and window, reporting
//! status changes through the log.

use crate::monitor::StatusListener;
use crate::presence::StatusSnapshot;
use crate::status::{Background, IconImage, StatusSink};

pub struct TerminalShell {
    sink: StatusSink,
    icon: Option<IconImage>,
    background: Background,
    ascii_icon: bool,
}

impl TerminalShell {
    /// Starts in the idle state with the idle icon already rendered.
    pub fn new(ascii_icon: bool) -> Self {
        Self::with_sink(StatusSink::new(), ascii_icon)
    }

    pub fn with_sink(sink: StatusSink, ascii_icon: bool) -> Self {
        let icon = match sink.render(StatusSnapshot::IDLE) {
            Ok(icon) => Some(icon),
            Err(e) => {
                log::warn!("Starting without an icon: {}", e);
                None
            }
        };

        Self {
            background: sink.background(StatusSnapshot::IDLE),
            sink,
            icon,
            ascii_icon,
        }
    }

    pub fn icon(&self) -> Option<&IconImage> {
        self.icon.as_ref()
    }

    pub fn background(&self) -> Background {
        self.background
    }
}

impl StatusListener for TerminalShell {
    fn status_changed(&mut self, snapshot: StatusSnapshot) {
        self.background = self.sink.background(snapshot);

        match self.sink.render(snapshot) {
            Ok(icon) => {
                if self.ascii_icon {
                    eprint!("{}", icon.to_ascii());
                }
                self.icon = Some(icon);
            }
            Err(e) => log::warn!("Keeping previous icon: {}", e),
        }

        if snapshot.is_touching() {
            log::info!(
                "Touching: {} contact(s) (background {})",
                snapshot.contact_count(),
                self.background
            );
        } else {
            log::info!("Not touching (background {})", self.background);
        }
    }

    fn log_appended(&mut self, text: &str) {
        for line in text.lines() {
            log::debug!("{}", line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_idle() {
        let shell = TerminalShell::new(false);
        let idle = StatusSink::new().render(StatusSnapshot::IDLE).unwrap();
        assert_eq!(shell.icon(), Some(&idle));
        assert_eq!(shell.background().to_string(), "#EE9090");
    }

    #[test]
    fn test_status_change_updates_outputs() {
        let mut shell = TerminalShell::new(false);
        shell.status_changed(StatusSnapshot::new(2));

        let sink = StatusSink::new();
        assert_eq!(shell.icon(), Some(&sink.render(StatusSnapshot::new(2)).unwrap()));
        assert_eq!(shell.background().to_string(), "#90EE90");

        shell.status_changed(StatusSnapshot::IDLE);
        assert_eq!(shell.icon(), Some(&sink.render(StatusSnapshot::IDLE).unwrap()));
        assert_eq!(shell.background().to_string(), "#EE9090");
    }

    #[test]
    fn test_failed_render_keeps_previous_icon() {
        let previous = StatusSink::new().render(StatusSnapshot::new(1)).unwrap();
        let mut shell = TerminalShell {
            sink: StatusSink::with_icon_size(u32::MAX),
            icon: Some(previous.clone()),
            background: StatusSink::new().background(StatusSnapshot::new(1)),
            ascii_icon: false,
        };

        shell.status_changed(StatusSnapshot::IDLE);
        assert_eq!(shell.icon(), Some(&previous));
        assert_eq!(shell.background().to_string(), "#EE9090");
    }

    #[test]
    fn test_starts_without_icon_when_render_fails() {
        let mut shell = TerminalShell::with_sink(StatusSink::with_icon_size(u32::MAX), false);
        assert!(shell.icon().is_none());
        shell.status_changed(StatusSnapshot::new(3));
        assert!(shell.icon().is_none());
        assert_eq!(shell.background().to_string(), "#90EE90");
    }
}
