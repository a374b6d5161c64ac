//! Deterministic simulator of the Dolev-Strong Byzantine broadcast protocol.
//!
//! Dolev-Strong is a synchronous, authenticated broadcast protocol: a
//! designated sender disseminates a value to `n` parties, up to `f` of which
//! may be Byzantine, over `f + 1` relay rounds (plus the initial broadcast),
//! using append-only signature chains in place of real cryptography.
//!
//! # Architecture
//!
//! - `message`: the wire record (payload + signer chain) and its validity predicate
//! - `party`: the per-party receive/relay/decide state machine
//! - `adversary`: the equivocation/corrupt-relay/injection behaviors a Byzantine party may exhibit
//! - `scheduler`: the round-by-round driver that wires parties and the adversary together
//! - `config`: run configuration and validation
//! - `trace`: a diagnostic side-channel recording what each round did
//! - `harness`: the top-level entry point and post-run analysis

pub mod adversary;
pub mod config;
pub mod errors;
pub mod harness;
pub mod message;
pub mod party;
pub mod scheduler;
pub mod trace;

pub use adversary::{Adversary, AdversaryConfig};
pub use config::SimulationConfig;
pub use errors::{Result, SimulationError};
pub use harness::{Analysis, ConsensusRun};
pub use message::Message;
pub use party::{Party, Role, DEFAULT_DECISION};
pub use scheduler::Scheduler;
pub use trace::RunTrace;

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Identifier of a protocol participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PartyId(pub u64);

impl fmt::Display for PartyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Installs an `EnvFilter`-based `tracing` subscriber, honoring `RUST_LOG`
/// and defaulting to `info` when it is unset.
///
/// Not called automatically by library code: a caller wires this up from a
/// test-support helper or a binary entry point, never from inside the
/// scheduler or harness themselves. Safe to call more than once per process;
/// `try_init` silently no-ops after the first successful install, which is
/// what lets every test module call it without coordinating who goes first.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}
