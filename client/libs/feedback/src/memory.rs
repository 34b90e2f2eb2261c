//! In-memory sink collecting every record, for tests and demos.

use crate::{Feedback, FeedbackPhase, FeedbackSink};
use std::sync::{Arc, Mutex};

/// Collects emitted records; clone handles share the buffer.
#[derive(Clone, Default)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<Feedback>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything emitted so far, in order.
    pub fn records(&self) -> Vec<Feedback> {
        self.records.lock().map(|records| records.clone()).unwrap_or_default()
    }

    /// Records in the given phase.
    pub fn in_phase(&self, phase: FeedbackPhase) -> Vec<Feedback> {
        self.records()
            .into_iter()
            .filter(|record| record.phase == phase)
            .collect()
    }

    pub fn clear(&self) {
        if let Ok(mut records) = self.records.lock() {
            records.clear();
        }
    }
}

impl FeedbackSink for MemorySink {
    fn emit(&self, record: Feedback) {
        if let Ok(mut records) = self.records.lock() {
            records.push(record);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_collects_in_order() {
        let sink = MemorySink::new();
        let id = Uuid::new_v4();
        sink.emit(Feedback {
            id,
            phase: FeedbackPhase::Loading,
            message: "a".into(),
            emitted_at: chrono::Utc::now(),
        });
        sink.emit(Feedback {
            id,
            phase: FeedbackPhase::Success,
            message: "b".into(),
            emitted_at: chrono::Utc::now(),
        });

        let records = sink.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].message, "a");
        assert_eq!(sink.in_phase(FeedbackPhase::Success).len(), 1);

        sink.clear();
        assert!(sink.records().is_empty());
    }
}
