//! Top-level entry point: wires config -> scheduler -> decisions, then
//! summarizes the outcome.

use std::collections::{BTreeMap, BTreeSet};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use crate::adversary::Adversary;
use crate::config::SimulationConfig;
use crate::errors::Result;
use crate::party::DEFAULT_DECISION;
use crate::scheduler::Scheduler;
use crate::trace::RunTrace;
use crate::PartyId;

/// A single prepared, runnable simulation.
pub struct ConsensusRun {
    config: SimulationConfig,
}

impl ConsensusRun {
    /// Validates `config` and prepares a run. Fails fast on malformed
    /// configuration rather than deep inside the scheduler.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Executes the full round schedule once and returns the decisions each
    /// party reached, its final `extracted` set, and the diagnostic trace of
    /// the run.
    #[allow(clippy::type_complexity)]
    pub fn run(
        &self,
    ) -> (
        BTreeMap<PartyId, String>,
        BTreeMap<PartyId, BTreeSet<String>>,
        RunTrace,
    ) {
        let rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        let adversary = Adversary::new(self.config.adversary.clone(), rng);
        let scheduler = Scheduler::new(&self.config, adversary);
        let (decisions, extracted, trace) = scheduler.run(&self.config.initial_value);
        info!(parties = decisions.len(), "run complete");
        (decisions, extracted, trace)
    }

    /// Runs the schedule and immediately summarizes agreement among the
    /// honest parties.
    pub fn analyze(&self) -> Analysis {
        let (decisions, extracted, trace) = self.run();
        Analysis::new(&self.config, decisions, extracted, trace)
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }
}

/// Post-run summary distinguishing honest parties from Byzantine ones and
/// reporting whether the honest parties reached agreement.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub decisions: BTreeMap<PartyId, String>,
    pub extracted: BTreeMap<PartyId, BTreeSet<String>>,
    pub honest_decisions: BTreeSet<String>,
    pub byzantine_ids: BTreeSet<PartyId>,
    pub trace: RunTrace,
}

impl Analysis {
    fn new(
        config: &SimulationConfig,
        decisions: BTreeMap<PartyId, String>,
        extracted: BTreeMap<PartyId, BTreeSet<String>>,
        trace: RunTrace,
    ) -> Self {
        let byzantine_ids: BTreeSet<PartyId> = config.byzantine_parties().into_iter().collect();
        let honest_decisions = decisions
            .iter()
            .filter(|(id, _)| !byzantine_ids.contains(id))
            .map(|(_, v)| v.clone())
            .collect();

        if honest_decisions.len() > 1 {
            warn!(distinct = honest_decisions.len(), "honest parties disagreed on the decided value");
        }

        Self {
            decisions,
            extracted,
            honest_decisions,
            byzantine_ids,
            trace,
        }
    }

    /// True iff every honest party decided on the same value.
    pub fn honest_parties_agree(&self) -> bool {
        self.honest_decisions.len() <= 1
    }

    /// The shared decision among honest parties, if they agreed.
    pub fn consensus_value(&self) -> Option<&str> {
        if self.honest_parties_agree() {
            self.honest_decisions.iter().next().map(|s| s.as_str())
        } else {
            None
        }
    }

    /// True iff the honest parties decided the protocol default rather than
    /// an extracted value.
    pub fn decided_default(&self) -> bool {
        self.consensus_value() == Some(DEFAULT_DECISION)
    }
}
