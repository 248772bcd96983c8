//! Contacts decoded from one touchpad frame.

use std::fmt;

/// One finger (or other object) on the touchpad surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub id: i32,
    pub x: i32,
    pub y: i32,
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Contact ID:{} Point:{},{}", self.id, self.x, self.y)
    }
}

/// Contacts observed in one input frame, stamped on arrival.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactBatch {
    contacts: Vec<Contact>,
    observed_at_ms: u64,
}

impl ContactBatch {
    pub fn new(contacts: Vec<Contact>, observed_at_ms: u64) -> Self {
        Self {
            contacts,
            observed_at_ms,
        }
    }

    pub fn empty(observed_at_ms: u64) -> Self {
        Self::new(Vec::new(), observed_at_ms)
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn observed_at_ms(&self) -> u64 {
        self.observed_at_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_display() {
        let c = Contact { id: 3, x: 120, y: -4 };
        assert_eq!(c.to_string(), "Contact ID:3 Point:120,-4");
    }

    #[test]
    fn test_empty_batch() {
        let batch = ContactBatch::empty(42);
        assert!(batch.is_empty());
        assert_eq!(batch.len(), 0);
        assert_eq!(batch.observed_at_ms(), 42);
    }
}
