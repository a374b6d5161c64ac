//! Error types for the Dolev-Strong consensus simulator

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SimulationError>;

/// Errors surfaced to the caller at harness entry.
///
/// Protocol-level anomalies (malformed or over-long signature chains,
/// duplicate signers) are never errors: the protocol is defined against a
/// hostile network and silently discards them (see `party::Party::receive`).
/// Only malformed configuration reaches this type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimulationError {
    #[error("total_parties must be >= 2, got {0}")]
    TooFewParties(usize),

    #[error("total_parties ({total_parties}) must be >= f + 2 ({required}) for Dolev-Strong to guarantee agreement")]
    InsufficientParties { total_parties: usize, required: usize },

    #[error("sender_id {sender_id} is out of range for {total_parties} parties")]
    SenderOutOfRange { sender_id: u64, total_parties: usize },

    #[error("byzantine id {0} is out of range for the configured parties")]
    ByzantineIdOutOfRange(u64),

    #[error("byzantine_ids has {got} members, exceeding the fault bound f={f}")]
    TooManyByzantine { got: usize, f: usize },

    #[error("initial_value must be a non-empty string")]
    EmptyInitialValue,

    #[error("adversary pool {pool} must not be empty")]
    EmptyAdversaryPool { pool: &'static str },
}
