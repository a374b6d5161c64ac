//! Adversary hook: the three Byzantine behaviors a corrupt party may exhibit
//! (equivocation, corrupt relay, injection).
//!
//! All adversarial randomness is drawn from a single seeded stream owned by
//! the harness and threaded in here, so a run is fully reproducible given a
//! seed rather than depending on scattered, unseeded coin flips.

use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::message::Message;
use crate::PartyId;

/// Default equivocation pool a Byzantine sender picks from.
pub const DEFAULT_EQUIVOCATION_POOL: &[&str] = &["sell", "hold", "attack", "corrupt"];
/// Default corrupt-relay pool.
pub const DEFAULT_CORRUPTION_POOL: &[&str] = &["fake", "noise", "byzantine", "evil"];
/// Default injection pool.
pub const DEFAULT_INJECTION_POOL: &[&str] = &["sell", "panic", "crash", "exploit"];

/// Tunable probabilities and token pools for a Byzantine party's behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdversaryConfig {
    pub p_corrupt: f64,
    pub p_inject: f64,
    pub equivocation_pool: Vec<String>,
    pub corruption_pool: Vec<String>,
    pub injection_pool: Vec<String>,
}

impl Default for AdversaryConfig {
    fn default() -> Self {
        Self {
            p_corrupt: 0.5,
            p_inject: 0.5,
            equivocation_pool: to_owned(DEFAULT_EQUIVOCATION_POOL),
            corruption_pool: to_owned(DEFAULT_CORRUPTION_POOL),
            injection_pool: to_owned(DEFAULT_INJECTION_POOL),
        }
    }
}

fn to_owned(pool: &[&str]) -> Vec<String> {
    pool.iter().map(|s| s.to_string()).collect()
}

impl AdversaryConfig {
    pub(crate) fn validate(&self) -> Result<(), crate::errors::SimulationError> {
        if self.equivocation_pool.is_empty() {
            return Err(crate::errors::SimulationError::EmptyAdversaryPool {
                pool: "equivocation_pool",
            });
        }
        if self.corruption_pool.is_empty() {
            return Err(crate::errors::SimulationError::EmptyAdversaryPool {
                pool: "corruption_pool",
            });
        }
        if self.injection_pool.is_empty() {
            return Err(crate::errors::SimulationError::EmptyAdversaryPool {
                pool: "injection_pool",
            });
        }
        Ok(())
    }
}

/// The behavioral overlay applied to every Byzantine party during a run.
///
/// Holds the single seeded RNG stream that all adversarial coin flips for
/// this execution draw from, so the whole run is reproducible given a seed.
pub struct Adversary {
    config: AdversaryConfig,
    rng: ChaCha8Rng,
}

impl Adversary {
    pub fn new(config: AdversaryConfig, rng: ChaCha8Rng) -> Self {
        Self { config, rng }
    }

    /// Round 0: a Byzantine sender equivocates, picking an independent
    /// payload per recipient instead of broadcasting the real proposal.
    pub fn equivocate(&mut self, sender_id: PartyId, recipients: &[PartyId]) -> Vec<(PartyId, Message)> {
        recipients
            .iter()
            .map(|&to| {
                let payload = self
                    .config
                    .equivocation_pool
                    .choose(&mut self.rng)
                    .expect("validated non-empty")
                    .clone();
                (to, Message::from_sender(sender_id, payload))
            })
            .collect()
    }

    /// Rounds 1..=f+1: with probability `p_corrupt`, replaces the payload of
    /// a message a Byzantine party is about to relay while preserving its
    /// signer chain.
    pub fn maybe_corrupt(&mut self, msg: Message) -> Message {
        if self.rng.gen::<f64>() < self.config.p_corrupt {
            let payload = self
                .config
                .corruption_pool
                .choose(&mut self.rng)
                .expect("validated non-empty")
                .clone();
            msg.with_payload(payload)
        } else {
            msg
        }
    }

    /// Each round, with probability `p_inject`, fabricates a message whose
    /// chain is `[sender_id, adversary_id]` and sends it to everyone else.
    pub fn maybe_inject(
        &mut self,
        sender_id: PartyId,
        adversary_id: PartyId,
        recipients: &[PartyId],
    ) -> Option<Vec<(PartyId, Message)>> {
        if self.rng.gen::<f64>() >= self.config.p_inject {
            return None;
        }
        let payload = self
            .config
            .injection_pool
            .choose(&mut self.rng)
            .expect("validated non-empty")
            .clone();
        let fabricated = Message::from_sender(sender_id, payload).countersigned_by(adversary_id);
        Some(recipients.iter().map(|&to| (to, fabricated.clone())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng(seed: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(seed)
    }

    #[test]
    fn equivocation_targets_every_recipient() {
        let mut adv = Adversary::new(AdversaryConfig::default(), rng(1));
        let recipients = vec![PartyId(1), PartyId(2), PartyId(3)];
        let sent = adv.equivocate(PartyId(0), &recipients);
        assert_eq!(sent.len(), 3);
        for (to, msg) in &sent {
            assert_eq!(msg.sender(), Some(PartyId(0)));
            assert!(recipients.contains(to));
        }
    }

    #[test]
    fn corruption_preserves_chain_when_triggered() {
        let mut config = AdversaryConfig::default();
        config.p_corrupt = 1.0; // always corrupt
        let mut adv = Adversary::new(config, rng(7));
        let msg = Message::from_sender(PartyId(0), "buy").countersigned_by(PartyId(1));
        let corrupted = adv.maybe_corrupt(msg.clone());
        assert_eq!(corrupted.signers(), msg.signers());
        assert_ne!(corrupted.payload(), msg.payload());
    }

    #[test]
    fn never_corrupts_when_probability_zero() {
        let mut config = AdversaryConfig::default();
        config.p_corrupt = 0.0;
        let mut adv = Adversary::new(config, rng(3));
        let msg = Message::from_sender(PartyId(0), "buy");
        let result = adv.maybe_corrupt(msg.clone());
        assert_eq!(result, msg);
    }

    #[test]
    fn injection_produces_well_formed_fabricated_chain() {
        let mut config = AdversaryConfig::default();
        config.p_inject = 1.0;
        let mut adv = Adversary::new(config, rng(9));
        let recipients = vec![PartyId(1), PartyId(2)];
        let injected = adv.maybe_inject(PartyId(0), PartyId(2), &recipients).unwrap();
        assert_eq!(injected.len(), 2);
        for (_, msg) in &injected {
            assert_eq!(msg.signers(), &[PartyId(0), PartyId(2)]);
        }
    }

    #[test]
    fn determinism_under_same_seed() {
        let recipients = vec![PartyId(1), PartyId(2), PartyId(3)];
        let mut a = Adversary::new(AdversaryConfig::default(), rng(42));
        let mut b = Adversary::new(AdversaryConfig::default(), rng(42));
        let out_a = a.equivocate(PartyId(0), &recipients);
        let out_b = b.equivocate(PartyId(0), &recipients);
        assert_eq!(out_a, out_b);
    }
}
