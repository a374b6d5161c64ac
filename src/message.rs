//! Message type and signature-chain validity.
//!
//! A message is a (payload, signers) pair. There is no cryptography: signing
//! is modeled structurally as appending one's identifier to `signers`.
//! Unforgeability of an honest signature is a construction invariant, not a
//! verified property: an honest party only ever appends its own id.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::PartyId;

/// An immutable record exchanged between parties: a payload and the ordered
/// chain of identifiers that have signed it, starting with the sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    payload: String,
    signers: Vec<PartyId>,
}

impl Message {
    /// Creates the round-0 message from `sender` carrying `payload`.
    pub fn from_sender(sender: PartyId, payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            signers: vec![sender],
        }
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn signers(&self) -> &[PartyId] {
        &self.signers
    }

    /// The designated sender, i.e. the first signer, if any.
    pub fn sender(&self) -> Option<PartyId> {
        self.signers.first().copied()
    }

    /// Returns a new message with `id` appended to the signer chain.
    pub fn countersigned_by(&self, id: PartyId) -> Self {
        let mut signers = self.signers.clone();
        signers.push(id);
        Self {
            payload: self.payload.clone(),
            signers,
        }
    }

    /// Returns a copy of this message with the payload replaced, keeping the
    /// existing signer chain. Used to model a corrupt relay (§4.3): the
    /// adversary swaps the content while the chain it rides on stays intact.
    pub fn with_payload(&self, payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            signers: self.signers.clone(),
        }
    }

    /// Validity predicate checked by an honest receiver before admitting a
    /// message in round `1..=f+1`.
    ///
    /// 1. `signers` is non-empty.
    /// 2. `signers[0] == sender_id`.
    /// 3. all elements of `signers` are distinct.
    /// 4. `len(signers) <= f + 2`.
    pub fn is_valid(&self, sender_id: PartyId, f: usize) -> bool {
        let Some(&first) = self.signers.first() else {
            return false;
        };
        if first != sender_id {
            return false;
        }
        if self.signers.len() > f + 2 {
            return false;
        }
        let distinct: HashSet<_> = self.signers.iter().collect();
        distinct.len() == self.signers.len()
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}, {{", self.payload)?;
        for (i, s) in self.signers.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{s}")?;
        }
        write!(f, "}}>")
    }
}
