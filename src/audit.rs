//! Append-only record of everything the monitor observed, kept for the
//! lifetime of the process.

use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Clone, Default)]
pub struct AuditLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, entry: impl Into<String>) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry.into());
    }

    /// Copy of the current entries; later appends do not show up in it.
    pub fn entries(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All entries joined by newlines, the form handed to clipboard or stdout.
    pub fn export(&self) -> String {
        self.entries().join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_append_and_export() {
        let log = AuditLog::new();
        assert!(log.is_empty());
        log.append("Precision touchpad exists: true");
        log.append(String::from("---\nContact ID:0 Point:1,2"));
        assert_eq!(log.len(), 2);
        assert_eq!(
            log.export(),
            "Precision touchpad exists: true\n---\nContact ID:0 Point:1,2"
        );
    }

    #[test]
    fn test_entries_is_a_snapshot() {
        let log = AuditLog::new();
        log.append("a");
        let snapshot = log.entries();
        log.append("b");
        assert_eq!(snapshot, vec!["a".to_string()]);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_clones_share_entries() {
        let log = AuditLog::new();
        let writer = log.clone();
        thread::spawn(move || {
            for i in 0..10 {
                writer.append(format!("entry {}", i));
            }
        })
        .join()
        .unwrap();

        let entries = log.entries();
        assert_eq!(entries.len(), 10);
        assert_eq!(entries[0], "entry 0");
        assert_eq!(entries[9], "entry 9");
    }
}
