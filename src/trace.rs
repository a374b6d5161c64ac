//! Diagnostic side-channel recording what happened during a run, independent
//! of the decisions parties reach. Granularity is per-round counts rather
//! than per-message detail: enough to explain a disagreement without
//! turning every run into a message-by-message replay log.

use serde::{Deserialize, Serialize};

/// Bookkeeping for a single round of the schedule.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoundRecord {
    pub round: usize,
    pub messages_delivered: usize,
    pub messages_discarded: usize,
    pub corruptions: usize,
    pub injections: usize,
    pub equivocations: usize,
}

/// The full diagnostic record of one simulation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunTrace {
    pub rounds: Vec<RoundRecord>,
}

impl RunTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, record: RoundRecord) {
        self.rounds.push(record);
    }

    pub fn total_discarded(&self) -> usize {
        self.rounds.iter().map(|r| r.messages_discarded).sum()
    }

    pub fn total_corruptions(&self) -> usize {
        self.rounds.iter().map(|r| r.corruptions).sum()
    }

    pub fn total_injections(&self) -> usize {
        self.rounds.iter().map(|r| r.injections).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_totals_across_rounds() {
        let mut trace = RunTrace::new();
        trace.record(RoundRecord {
            round: 0,
            messages_delivered: 3,
            messages_discarded: 1,
            corruptions: 0,
            injections: 1,
            equivocations: 2,
        });
        trace.record(RoundRecord {
            round: 1,
            messages_delivered: 2,
            messages_discarded: 0,
            corruptions: 1,
            injections: 0,
            equivocations: 0,
        });
        assert_eq!(trace.total_discarded(), 1);
        assert_eq!(trace.total_corruptions(), 1);
        assert_eq!(trace.total_injections(), 1);
        assert_eq!(trace.rounds.len(), 2);
    }
}
