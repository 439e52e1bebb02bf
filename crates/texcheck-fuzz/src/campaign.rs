//! The campaign driver.
//!
//! A campaign draws cases from a strategy with a seeded runner, checks each
//! one, and on the first failure shrinks it with the strategy's own value
//! tree. The seed is printed with every failure so a run can be replayed.

use std::time::Instant;

use proptest::strategy::{Strategy, ValueTree};
use proptest::test_runner::{Config, RngAlgorithm, TestRng, TestRunner};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use crate::config::{CampaignConfig, GeneratorConfig};
use crate::differential::{DifferentialTest, FailureReport};
use crate::error::CampaignError;
use crate::markup::{MarkupParser, MarkupSerializer};
use crate::oracle::{ground_truth, DocumentCompiler};
use crate::printable::printable;
use crate::strategy::subjects;

/// How a campaign ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Every checked case round-tripped.
    Passed {
        /// Number of cases checked before the budget or deadline ran out.
        cases: u32,
    },
    /// A case disagreed.
    Failed {
        /// The shrunk failure.
        report: Box<FailureReport>,
        /// Seed that replays this campaign.
        seed: u64,
        /// Index of the first failing case under that seed.
        case_index: u32,
    },
}

impl Outcome {
    /// Returns true when no disagreement was found.
    #[must_use]
    pub fn is_passed(&self) -> bool {
        matches!(self, Outcome::Passed { .. })
    }
}

/// Runs checks over seeded draws from a strategy.
#[derive(Clone, Debug, Default)]
pub struct Campaign {
    config: CampaignConfig,
}

impl Campaign {
    /// Creates a campaign.
    #[must_use]
    pub fn new(config: CampaignConfig) -> Self {
        Self { config }
    }

    /// Draws up to `cases` values from `strategy` and checks each one.
    ///
    /// # Errors
    ///
    /// Returns [`CampaignError::Exhausted`] when the strategy rejects more
    /// draws than the configuration tolerates.
    pub fn run<S, F>(&self, strategy: &S, check: F) -> Result<Outcome, CampaignError>
    where
        S: Strategy,
        F: Fn(&S::Value) -> Result<(), FailureReport>,
    {
        let seed = self.config.seed.unwrap_or_else(rand::random);
        let mut runner = TestRunner::new_with_rng(self.runner_config(), seeded_rng(seed));
        let started = Instant::now();
        info!(seed, cases = self.config.cases, "campaign started");

        for index in 0..self.config.cases {
            if self.config.deadline.is_some_and(|d| started.elapsed() >= d) {
                info!(seed, checked = index, "deadline reached");
                return Ok(Outcome::Passed { cases: index });
            }

            let mut tree = strategy
                .new_tree(&mut runner)
                .map_err(|reason| CampaignError::Exhausted(reason.message().to_string()))?;
            if let Err(report) = check(&tree.current()) {
                info!(seed, case_index = index, "disagreement found, shrinking");
                let report = self.shrink(&mut tree, report, &check);
                return Ok(Outcome::Failed {
                    report: Box::new(report),
                    seed,
                    case_index: index,
                });
            }
        }

        info!(seed, checked = self.config.cases, "campaign passed");
        Ok(Outcome::Passed {
            cases: self.config.cases,
        })
    }

    /// Simplifies a failing tree while it keeps failing, returning the
    /// smallest failure seen.
    fn shrink<T, F>(&self, tree: &mut T, mut best: FailureReport, check: &F) -> FailureReport
    where
        T: ValueTree,
        F: Fn(&T::Value) -> Result<(), FailureReport>,
    {
        if !tree.simplify() {
            return best;
        }
        for _ in 0..self.config.max_shrink_iters {
            match check(&tree.current()) {
                Err(report) => {
                    best = report;
                    if !tree.simplify() {
                        return best;
                    }
                }
                Ok(()) => {
                    if !tree.complicate() {
                        return best;
                    }
                }
            }
        }
        warn!(
            limit = self.config.max_shrink_iters,
            "shrink budget exhausted, reporting the smallest failure so far"
        );
        best
    }

    fn runner_config(&self) -> Config {
        Config {
            cases: self.config.cases,
            max_local_rejects: self.config.max_local_rejects,
            max_shrink_iters: self.config.max_shrink_iters,
            failure_persistence: None,
            ..Config::default()
        }
    }
}

/// Expands a `u64` seed into the runner's ChaCha seed.
fn seeded_rng(seed: u64) -> TestRng {
    let mut bytes = [0u8; 32];
    ChaCha8Rng::seed_from_u64(seed).fill_bytes(&mut bytes);
    TestRng::from_seed(RngAlgorithm::ChaCha, &bytes)
}

/// Checks that parsing the serializer's markup reproduces each generated
/// expression.
///
/// With a compiler, only markup it accepts is checked and failures carry
/// the compiled artifact. Without one, every printable case is checked.
///
/// # Errors
///
/// Returns [`CampaignError::Compiler`] when the compiler fails its probe and
/// [`CampaignError::Exhausted`] when generation is exhausted.
pub fn round_trip<S, P, C>(
    campaign: &Campaign,
    generator: &GeneratorConfig,
    serializer: S,
    parser: P,
    compiler: Option<C>,
) -> Result<Outcome, CampaignError>
where
    S: MarkupSerializer + 'static,
    P: MarkupParser,
    C: DocumentCompiler + 'static,
{
    let cases = printable(subjects(generator), serializer);
    let test = DifferentialTest::new(parser);
    match compiler {
        Some(compiler) => {
            compiler.probe()?;
            campaign.run(&ground_truth(cases, compiler), |case| test.check(case))
        }
        None => campaign.run(&cases, |case| test.check(case)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::Latex;
    use crate::oracle::LatexCompiler;
    use proptest::prelude::*;

    fn campaign(cases: u32, seed: u64) -> Campaign {
        Campaign::new(CampaignConfig {
            cases,
            seed: Some(seed),
            ..CampaignConfig::default()
        })
    }

    #[test]
    fn test_passing_campaign() {
        let outcome = campaign(32, 7).run(&(0u32..100), |_| Ok(())).unwrap();
        assert_eq!(outcome, Outcome::Passed { cases: 32 });
    }

    #[test]
    fn test_failure_is_shrunk() {
        let fail_above = |n: &u32| {
            if *n >= 10 {
                Err(FailureReport {
                    original: texcheck_core::Expr::integer(i64::from(*n)),
                    parsed: None,
                    parse_error: None,
                    markup: n.to_string(),
                    artifact: None,
                })
            } else {
                Ok(())
            }
        };
        let outcome = campaign(256, 3).run(&(0u32..1000), fail_above).unwrap();
        match outcome {
            Outcome::Failed { report, seed, .. } => {
                assert_eq!(seed, 3);
                assert_eq!(report.markup, "10");
            }
            Outcome::Passed { .. } => panic!("expected a failure"),
        }
    }

    #[test]
    fn test_exhausted_generation() {
        let never = (0u32..10).prop_filter("never", |_| false);
        let config = CampaignConfig {
            cases: 4,
            seed: Some(1),
            max_local_rejects: 16,
            ..CampaignConfig::default()
        };
        let result = Campaign::new(config).run(&never, |_| Ok(()));
        assert!(matches!(result, Err(CampaignError::Exhausted(_))));
    }

    #[test]
    fn test_atoms_round_trip_without_compiler() {
        let generator = GeneratorConfig {
            depth: 0,
            relations: false,
            ..GeneratorConfig::default()
        };
        let outcome =
            round_trip(&campaign(64, 11), &generator, Latex, Latex, None::<LatexCompiler>).unwrap();
        assert_eq!(outcome, Outcome::Passed { cases: 64 });
    }
}
