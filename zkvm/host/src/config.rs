//! Clusters the prover will produce proofs for, and the programs a proof is
//! meant for on each of them.

#![forbid(unsafe_code)]

use std::fmt;

pub const DEFAULT_CLUSTER: &str = "localnet";

/// `agent_reward::ID`
pub const REWARD_PROGRAM_ID: &str = "5PnKmMK1utdUZWZt3g5MTousReACZkpjPbTPeDAmvxFY";
/// RISC Zero Groth16 verifier the reward program CPIs into.
pub const VERIFIER_PROGRAM_ID: &str = "9yHzKyWaD3uXFcqGyPkA9BZpbnHhq1W7cBeFSQPfTMQQ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deployment {
    pub cluster: &'static str,
    pub reward_program_id: &'static str,
    pub verifier_program_id: &'static str,
}

impl Deployment {
    const fn on(cluster: &'static str) -> Self {
        Self {
            cluster,
            reward_program_id: REWARD_PROGRAM_ID,
            verifier_program_id: VERIFIER_PROGRAM_ID,
        }
    }
}

pub const DEPLOYMENTS: [Deployment; 3] = [
    Deployment::on(DEFAULT_CLUSTER),
    Deployment::on("devnet"),
    Deployment::on("mainnet-beta"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCluster(pub String);

impl fmt::Display for UnknownCluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cluster {} has no trusted deployment (known:", self.0)?;
        for deployment in &DEPLOYMENTS {
            write!(f, " {}", deployment.cluster)?;
        }
        write!(f, ")")
    }
}

impl std::error::Error for UnknownCluster {}

pub fn deployment(cluster: &str) -> Result<&'static Deployment, UnknownCluster> {
    DEPLOYMENTS
        .iter()
        .find(|deployment| deployment.cluster == cluster)
        .ok_or_else(|| UnknownCluster(cluster.to_string()))
}
