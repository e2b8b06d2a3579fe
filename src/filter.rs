use crate::types::EventRecord;

/// Keeps events whose location contains `target` (case-sensitive).
#[derive(Debug, Clone)]
pub struct LocationFilter {
    pub target: String,
}

impl LocationFilter {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
        }
    }

    pub fn matches(&self, event: &EventRecord) -> bool {
        event.location.contains(&self.target)
    }

    pub fn apply(&self, mut events: Vec<EventRecord>) -> Vec<EventRecord> {
        events.retain(|e| self.matches(e));
        events
    }
}

impl Default for LocationFilter {
    fn default() -> Self {
        Self::new(crate::DEFAULT_LOCATION_TARGET)
    }
}
