//! Party state machine: the per-node receive/relay/decide rules.

use std::collections::BTreeSet;

use tracing::debug;

use crate::message::Message;
use crate::PartyId;

/// The protocol's fallback value when a party cannot extract a single
/// unambiguous payload by decision time.
pub const DEFAULT_DECISION: &str = "0";

/// What kind of node a party is. A tagged strategy rather than a boolean
/// flag examined at call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Honest,
    Byzantine,
}

/// A single protocol participant.
///
/// Owns only its own `extracted` set; the scheduler is the sole source of
/// inbound messages and sole consumer of outbound ones.
#[derive(Debug, Clone)]
pub struct Party {
    id: PartyId,
    f: usize,
    role: Role,
    extracted: BTreeSet<String>,
}

impl Party {
    pub fn new(id: PartyId, f: usize, role: Role) -> Self {
        Self {
            id,
            f,
            role,
            extracted: BTreeSet::new(),
        }
    }

    pub fn id(&self) -> PartyId {
        self.id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_byzantine(&self) -> bool {
        matches!(self.role, Role::Byzantine)
    }

    pub fn extracted(&self) -> &BTreeSet<String> {
        &self.extracted
    }

    /// Processes `inbound` exactly once, in arrival order, against
    /// `sender_id`'s validity predicate, and returns the messages this party
    /// relays as a result.
    ///
    /// Each inbound bag is consumed in a single pass: a payload already in
    /// `extracted` triggers no further relay, bounding relays to one per
    /// payload per party. The bag is never re-processed a second time within
    /// the same round, which would otherwise double-count extractions.
    pub fn receive(&mut self, sender_id: PartyId, inbound: &[Message]) -> Vec<Message> {
        let before = self.extracted.clone();
        let mut outbound = Vec::new();

        for msg in inbound {
            if !msg.is_valid(sender_id, self.f) {
                debug!(party = %self.id, "discarding message with invalid signature chain");
                continue;
            }
            debug_assert!(msg.signers().len() <= self.f + 2);

            let payload = msg.payload();
            if self.extracted.contains(payload) {
                continue;
            }

            self.extracted.insert(payload.to_string());
            debug!(party = %self.id, payload, "extracted new payload");

            if !msg.signers().contains(&self.id) {
                outbound.push(msg.countersigned_by(self.id));
            }
        }

        debug_assert!(
            self.extracted.is_superset(&before),
            "extracted set must never lose a payload within a single receive pass"
        );
        outbound
    }

    /// Applies the Dolev-Strong decision rule: a single extracted payload is
    /// decided outright, anything else (none, or more than one) falls back
    /// to the protocol default.
    pub fn decide(&self) -> String {
        if self.extracted.len() == 1 {
            self.extracted.iter().next().cloned().unwrap()
        } else {
            DEFAULT_DECISION.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(n: u64) -> PartyId {
        PartyId(n)
    }

    #[test]
    fn relays_newly_extracted_payload_once() {
        let mut party = Party::new(pid(1), 1, Role::Honest);
        let msg = Message::from_sender(pid(0), "buy");

        let out = party.receive(pid(0), &[msg.clone()]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].payload(), "buy");
        assert!(out[0].signers().contains(&pid(1)));

        // Same payload delivered again (e.g. via a different chain) is not
        // relayed twice.
        let repeat = msg.countersigned_by(pid(2));
        let out2 = party.receive(pid(0), &[repeat]);
        assert!(out2.is_empty());
    }

    #[test]
    fn discards_invalid_messages_silently() {
        let mut party = Party::new(pid(1), 1, Role::Honest);
        let bad = Message::from_sender(pid(2), "buy"); // wrong sender
        let out = party.receive(pid(0), &[bad]);
        assert!(out.is_empty());
        assert!(party.extracted().is_empty());
    }

    #[test]
    fn does_not_relay_if_already_signed() {
        let mut party = Party::new(pid(1), 1, Role::Honest);
        let msg = Message::from_sender(pid(0), "buy").countersigned_by(pid(1));
        let out = party.receive(pid(0), &[msg]);
        // extracted, but no new relay since party 1 already signed it
        assert!(out.is_empty());
        assert!(party.extracted().contains("buy"));
    }

    #[test]
    fn decides_sole_extracted_value() {
        let mut party = Party::new(pid(1), 1, Role::Honest);
        party.receive(pid(0), &[Message::from_sender(pid(0), "buy")]);
        assert_eq!(party.decide(), "buy");
    }

    #[test]
    fn decides_default_on_empty_extraction() {
        let party = Party::new(pid(1), 1, Role::Honest);
        assert_eq!(party.decide(), DEFAULT_DECISION);
    }

    #[test]
    fn decides_default_on_ambiguous_extraction() {
        let mut party = Party::new(pid(1), 2, Role::Honest);
        party.receive(pid(0), &[Message::from_sender(pid(0), "buy")]);
        party.receive(
            pid(0),
            &[Message::from_sender(pid(0), "sell").countersigned_by(pid(3))],
        );
        assert_eq!(party.decide(), DEFAULT_DECISION);
    }
}
