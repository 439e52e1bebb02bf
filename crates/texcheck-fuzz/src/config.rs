//! Generator and campaign settings.

use std::time::Duration;

/// Shape of the expression trees drawn by the generator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Maximum number of recursion levels above the atoms.
    pub depth: u32,
    /// Total node count the recursion aims for.
    pub desired_size: u32,
    /// Expected number of operands per compound node.
    pub expected_branch: u32,
    /// Whether top-level relations are drawn alongside expressions.
    pub relations: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            depth: 4,
            desired_size: 16,
            expected_branch: 3,
            relations: true,
        }
    }
}

/// Budget and replay settings for one campaign.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CampaignConfig {
    /// Number of cases to check.
    pub cases: u32,
    /// Wall-clock limit; the campaign stops early and passes when it expires.
    pub deadline: Option<Duration>,
    /// Replay seed. A random one is chosen when absent.
    pub seed: Option<u64>,
    /// Upper bound on shrinking steps after a failure.
    pub max_shrink_iters: u32,
    /// Rejected draws tolerated over the whole campaign.
    pub max_local_rejects: u32,
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            deadline: None,
            seed: None,
            max_shrink_iters: 1024,
            max_local_rejects: 65_536,
        }
    }
}
