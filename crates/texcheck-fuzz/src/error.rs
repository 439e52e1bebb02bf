//! Errors raised by the oracle and the campaign driver.
//!
//! Unsupported constructions, unprintable expressions and uncompilable markup
//! are not errors at this level: the generators reject those draws and move
//! on. What is left here are the failures that stop a campaign.

use std::io;
use std::process::ExitStatus;

use thiserror::Error;

/// The document compiler did not produce an artifact.
#[derive(Debug, Error)]
pub enum CompileError {
    /// Reading or writing the scratch directory failed.
    #[error("i/o error in the compile directory: {0}")]
    Io(#[from] io::Error),

    /// The compiler program could not be started.
    #[error("cannot run `{program}`: {source}")]
    Spawn {
        /// The program that was invoked.
        program: String,
        /// The underlying error.
        #[source]
        source: io::Error,
    },

    /// The compiler ran and rejected the document.
    #[error("compiler exited with {status}")]
    Failed {
        /// Exit status of the compiler.
        status: ExitStatus,
        /// The tail of the compiler's output.
        log: String,
    },

    /// The compiler succeeded but left no artifact behind.
    #[error("compiler produced no `{0}` artifact")]
    MissingArtifact(String),
}

/// A campaign could not run to completion.
#[derive(Debug, Error)]
pub enum CampaignError {
    /// The campaign rejected more draws in total than `max_local_rejects` allows.
    #[error("generation exhausted: {0}")]
    Exhausted(String),

    /// The ground-truth compiler is unusable.
    #[error("ground-truth compiler unavailable: {0}")]
    Compiler(#[from] CompileError),
}
