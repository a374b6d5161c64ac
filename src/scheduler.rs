//! Round-by-round driver: wires parties and the adversary together into the
//! f+2-round lockstep schedule of Dolev-Strong.
//!
//! Round 0 is the sender's broadcast; rounds `1..=f+1` are relay rounds.
//! Every party is polled every round, in ascending id order, even when its
//! inbound bag for that round is empty: a silent party still needs to be
//! given the chance to decide once the schedule ends.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info, warn};

use crate::adversary::Adversary;
use crate::config::SimulationConfig;
use crate::message::Message;
use crate::party::{Party, Role};
use crate::trace::{RoundRecord, RunTrace};
use crate::PartyId;

/// Drives a single deterministic run to completion.
pub struct Scheduler {
    parties: BTreeMap<PartyId, Party>,
    sender_id: PartyId,
    f: usize,
    adversary: Adversary,
}

impl Scheduler {
    pub fn new(config: &SimulationConfig, adversary: Adversary) -> Self {
        let byzantine = config.byzantine_parties();
        let parties = (0..config.total_parties as u64)
            .map(|n| {
                let id = PartyId(n);
                let role = if byzantine.contains(&id) {
                    Role::Byzantine
                } else {
                    Role::Honest
                };
                (id, Party::new(id, config.f, role))
            })
            .collect();

        Self {
            parties,
            sender_id: config.sender(),
            f: config.f,
            adversary,
        }
    }

    fn other_ids(&self, excluding: PartyId) -> Vec<PartyId> {
        self.parties.keys().copied().filter(|&id| id != excluding).collect()
    }

    /// Runs round 0 (the sender's broadcast) and rounds `1..=f+1` (relay),
    /// returning each party's final decision, its final `extracted` set, and
    /// a diagnostic trace of the run.
    pub fn run(
        mut self,
        initial_value: &str,
    ) -> (
        BTreeMap<PartyId, String>,
        BTreeMap<PartyId, BTreeSet<String>>,
        RunTrace,
    ) {
        let mut trace = RunTrace::new();
        let recipients = self.other_ids(self.sender_id);

        let mut next_inbound: BTreeMap<PartyId, Vec<Message>> = BTreeMap::new();
        let mut round0 = RoundRecord {
            round: 0,
            ..Default::default()
        };

        let sender_is_byzantine = self
            .parties
            .get(&self.sender_id)
            .map(|p| p.is_byzantine())
            .unwrap_or(false);

        if sender_is_byzantine {
            let equivocated = self.adversary.equivocate(self.sender_id, &recipients);
            round0.equivocations = equivocated.len();
            for (to, msg) in equivocated {
                next_inbound.entry(to).or_default().push(msg);
            }
            warn!(sender = %self.sender_id, "byzantine sender equivocating round 0 proposal");
        } else {
            let msg = Message::from_sender(self.sender_id, initial_value);
            for &to in &recipients {
                next_inbound.entry(to).or_default().push(msg.clone());
            }
        }
        info!(round = 0, recipients = recipients.len(), "broadcast complete");
        trace.record(round0);

        for round in 1..=(self.f + 1) {
            debug_assert!(round <= self.f + 1, "relay rounds must stay within the f+1-round schedule");
            let mut record = RoundRecord {
                round,
                ..Default::default()
            };
            let inbound_this_round = std::mem::take(&mut next_inbound);
            let ids: Vec<PartyId> = self.parties.keys().copied().collect();

            for id in ids {
                let inbound = inbound_this_round.get(&id).cloned().unwrap_or_default();
                record.messages_delivered += inbound
                    .iter()
                    .filter(|m| m.is_valid(self.sender_id, self.f))
                    .count();
                record.messages_discarded += inbound
                    .iter()
                    .filter(|m| !m.is_valid(self.sender_id, self.f))
                    .count();

                let is_byzantine = self.parties.get(&id).map(|p| p.is_byzantine()).unwrap_or(false);
                let party = self.parties.get_mut(&id).expect("party exists");
                debug!(party = %id, round, inbound = inbound.len(), "polling party");
                let mut outbound = party.receive(self.sender_id, &inbound);

                if is_byzantine {
                    for msg in outbound.iter_mut() {
                        let corrupted = self.adversary.maybe_corrupt(msg.clone());
                        if &corrupted != msg {
                            record.corruptions += 1;
                            warn!(party = %id, round, "byzantine party corrupted a relayed payload");
                        }
                        *msg = corrupted;
                    }
                }

                let others = self.other_ids(id);
                for msg in &outbound {
                    for &to in &others {
                        next_inbound.entry(to).or_default().push(msg.clone());
                    }
                }

                if is_byzantine {
                    if let Some(injected) = self.adversary.maybe_inject(self.sender_id, id, &others) {
                        record.injections += injected.len();
                        warn!(party = %id, round, targets = injected.len(), "byzantine party injected a fabricated message");
                        for (to, msg) in injected {
                            next_inbound.entry(to).or_default().push(msg);
                        }
                    }
                }
            }

            info!(round, delivered = record.messages_delivered, discarded = record.messages_discarded, "relay round complete");
            trace.record(record);
        }

        let decisions = self
            .parties
            .iter()
            .map(|(&id, party)| (id, party.decide()))
            .collect();
        let extracted = self
            .parties
            .iter()
            .map(|(&id, party)| (id, party.extracted().clone()))
            .collect();

        (decisions, extracted, trace)
    }
}
