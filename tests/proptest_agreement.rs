//! Property tests for the headline agreement guarantee and message validity,
//! generating configurations and malformed chains across a wide range of
//! inputs rather than a fixed scenario list.

use dolev_strong_sim::{AdversaryConfig, ConsensusRun, Message, PartyId, SimulationConfig};
use proptest::prelude::*;

fn arb_config(total_parties: usize, f: usize, byzantine_id: u64, seed: u64, sender_id: u64) -> SimulationConfig {
    let byzantine_ids = if f == 0 { vec![] } else { vec![byzantine_id] };
    SimulationConfig {
        total_parties,
        f,
        byzantine_ids,
        sender_id,
        initial_value: "buy".to_string(),
        adversary: AdversaryConfig::default(),
        seed,
    }
}

proptest! {
    /// Agreement holds for any valid (total_parties, f, byzantine_id, sender_id, seed)
    /// tuple with exactly one Byzantine party at or under the fault bound.
    #[test]
    fn agreement_holds_for_arbitrary_valid_configs(
        f in 0usize..4,
        extra in 0usize..5,
        byzantine_offset in 0u64..20,
        sender_offset in 0u64..20,
        seed in any::<u64>(),
    ) {
        let total_parties = f + 2 + extra;
        let byzantine_id = byzantine_offset % total_parties as u64;
        let sender_id = sender_offset % total_parties as u64;
        let cfg = arb_config(total_parties, f, byzantine_id, seed, sender_id);
        let run = ConsensusRun::new(cfg).unwrap();
        let analysis = run.analyze();
        prop_assert!(analysis.honest_parties_agree());
    }

    /// Any signer chain missing the sender as its first element, or containing
    /// a duplicate identifier, is rejected by the validity predicate regardless
    /// of payload or fault bound.
    #[test]
    fn validity_predicate_rejects_malformed_chains(
        sender in 0u64..10,
        wrong_first in 0u64..10,
        f in 0usize..5,
        payload in "[a-z]{1,8}",
    ) {
        prop_assume!(sender != wrong_first);
        let msg = Message::from_sender(PartyId(wrong_first), payload);
        prop_assert!(!msg.is_valid(PartyId(sender), f));
    }

    /// A chain whose length exceeds f + 2 is always rejected, no matter how
    /// it was assembled.
    #[test]
    fn overlong_chains_always_rejected(
        sender in 0u64..5,
        f in 0usize..3,
        extra_signers in 1u64..6,
    ) {
        let mut msg = Message::from_sender(PartyId(sender), "buy");
        for i in 0..(f as u64 + 2 + extra_signers) {
            msg = msg.countersigned_by(PartyId(sender + 1000 + i));
        }
        prop_assert!(!msg.is_valid(PartyId(sender), f));
    }
}
