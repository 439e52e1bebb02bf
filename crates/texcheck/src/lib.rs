//! # texcheck
//!
//! Randomized round-trip checking for LaTeX markup: generate an expression,
//! render it, parse the markup back, and report when the two disagree.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use texcheck::prelude::*;
//!
//! let campaign = Campaign::new(CampaignConfig::default());
//! let compiler = LatexCompiler::new(CompilerConfig::default());
//! let outcome = round_trip(&campaign, &GeneratorConfig::default(), Latex, Latex, Some(compiler))?;
//! if let Outcome::Failed { report, seed, .. } = outcome {
//!     Reporter::new().report(&report, &mut std::io::stdout())?;
//!     eprintln!("replay with --seed {seed}");
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub use texcheck_core as core;
pub use texcheck_fuzz as fuzz;
pub use texcheck_latex as latex;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use texcheck_core::{Evaluation, Expr, ExprNode, Float};
    pub use texcheck_fuzz::{
        round_trip, Campaign, CampaignConfig, CompilerConfig, DifferentialTest, FailureReport,
        GeneratorConfig, Latex, LatexCompiler, Outcome, Reporter,
    };
    pub use texcheck_latex::{parse_latex, to_latex};
}
