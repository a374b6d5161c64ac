//! Run configuration, validated before a simulation starts.

use serde::{Deserialize, Serialize};

use crate::adversary::AdversaryConfig;
use crate::errors::{Result, SimulationError};
use crate::PartyId;

/// All knobs governing a single deterministic run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub total_parties: usize,
    pub f: usize,
    pub byzantine_ids: Vec<u64>,
    pub sender_id: u64,
    pub initial_value: String,
    #[serde(default)]
    pub adversary: AdversaryConfig,
    pub seed: u64,
}

impl SimulationConfig {
    /// Checks the structural constraints a malformed config could otherwise
    /// violate silently.
    pub fn validate(&self) -> Result<()> {
        if self.total_parties < 2 {
            return Err(SimulationError::TooFewParties(self.total_parties));
        }
        let required = self.f + 2;
        if self.total_parties < required {
            return Err(SimulationError::InsufficientParties {
                total_parties: self.total_parties,
                required,
            });
        }
        if self.sender_id >= self.total_parties as u64 {
            return Err(SimulationError::SenderOutOfRange {
                sender_id: self.sender_id,
                total_parties: self.total_parties,
            });
        }
        for &id in &self.byzantine_ids {
            if id >= self.total_parties as u64 {
                return Err(SimulationError::ByzantineIdOutOfRange(id));
            }
        }
        if self.byzantine_ids.len() > self.f {
            return Err(SimulationError::TooManyByzantine {
                got: self.byzantine_ids.len(),
                f: self.f,
            });
        }
        if self.initial_value.is_empty() {
            return Err(SimulationError::EmptyInitialValue);
        }
        self.adversary.validate()?;
        Ok(())
    }

    pub fn sender(&self) -> PartyId {
        PartyId(self.sender_id)
    }

    pub fn byzantine_parties(&self) -> Vec<PartyId> {
        self.byzantine_ids.iter().copied().map(PartyId).collect()
    }

    /// Parses a config from TOML, as might be loaded from a scenario file on disk.
    pub fn from_toml(input: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(input)
    }

    /// Parses a config from JSON, for programmatic or scripted scenario generation.
    pub fn from_json(input: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }
}
