//! Ground truth from an external document compiler.
//!
//! Markup only reaches the round-trip check once a real typesetter has
//! accepted it. Cases the compiler rejects are dropped as draws, so a parser
//! is never blamed for markup that was invalid to begin with.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use proptest::prelude::*;
use tracing::debug;

use crate::error::CompileError;
use crate::printable::GenerationCase;

/// Source file name inside the scratch directory.
const SOURCE_STEM: &str = "case";

/// Bytes of compiler output kept in [`CompileError::Failed`].
const LOG_TAIL: usize = 2048;

/// A compiled document.
#[derive(Clone, PartialEq, Eq)]
pub struct Artifact {
    bytes: Vec<u8>,
    extension: String,
}

impl Artifact {
    /// Wraps compiled bytes with the file extension they were read from.
    #[must_use]
    pub fn new(bytes: Vec<u8>, extension: impl Into<String>) -> Self {
        Self {
            bytes,
            extension: extension.into(),
        }
    }

    /// The raw document.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// File extension, without the dot.
    #[must_use]
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true for a zero-length artifact.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Writes the artifact to `dir/<stem>.<extension>` and returns the path.
    ///
    /// # Errors
    ///
    /// Propagates filesystem errors.
    pub fn write_to(&self, dir: &Path, stem: &str) -> io::Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(format!("{stem}.{}", self.extension));
        fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

impl std::fmt::Debug for Artifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Artifact({} bytes of .{})", self.bytes.len(), self.extension)
    }
}

/// A case whose markup the ground-truth compiler accepted.
///
/// The artifact is not optional: a value of this type is proof that the
/// markup compiled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OracleCase {
    /// The expression and its markup.
    pub case: GenerationCase,
    /// The compiled document.
    pub artifact: Artifact,
}

/// Compiles math-mode markup into a document.
pub trait DocumentCompiler {
    /// Compiles `markup`.
    ///
    /// # Errors
    ///
    /// Fails when the markup does not compile or the compiler cannot run.
    fn compile(&self, markup: &str) -> Result<Artifact, CompileError>;

    /// Checks that the compiler is usable before a campaign starts.
    ///
    /// # Errors
    ///
    /// Fails when no markup could ever compile, such as a missing program.
    fn probe(&self) -> Result<(), CompileError> {
        Ok(())
    }
}

/// Settings for [`LatexCompiler`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompilerConfig {
    /// Program to run.
    pub program: String,
    /// Arguments placed before the source file name.
    pub args: Vec<String>,
    /// Extension of the file the program writes next to the source.
    pub artifact_extension: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            program: "pdflatex".to_string(),
            args: vec![
                "-interaction=nonstopmode".to_string(),
                "-halt-on-error".to_string(),
            ],
            artifact_extension: "pdf".to_string(),
        }
    }
}

/// Runs a LaTeX engine as a subprocess in a fresh scratch directory.
#[derive(Clone, Debug, Default)]
pub struct LatexCompiler {
    config: CompilerConfig,
}

impl LatexCompiler {
    /// Creates a compiler from its settings.
    #[must_use]
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    /// The compiler's settings.
    #[must_use]
    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }
}

impl DocumentCompiler for LatexCompiler {
    fn compile(&self, markup: &str) -> Result<Artifact, CompileError> {
        // Removed on drop, whichever way this function returns.
        let dir = tempfile::tempdir()?;
        let source = format!("{SOURCE_STEM}.tex");
        fs::write(dir.path().join(&source), document(markup))?;

        let output = Command::new(&self.config.program)
            .args(&self.config.args)
            .arg(&source)
            .current_dir(dir.path())
            .stdin(Stdio::null())
            .output()
            .map_err(|source| CompileError::Spawn {
                program: self.config.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(CompileError::Failed {
                status: output.status,
                log: tail(&output.stdout),
            });
        }

        let extension = &self.config.artifact_extension;
        match fs::read(dir.path().join(format!("{SOURCE_STEM}.{extension}"))) {
            Ok(bytes) => Ok(Artifact::new(bytes, extension.as_str())),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Err(CompileError::MissingArtifact(extension.clone()))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Checks that the program starts and answers `--version` successfully.
    fn probe(&self) -> Result<(), CompileError> {
        let output = Command::new(&self.config.program)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .map_err(|source| CompileError::Spawn {
                program: self.config.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(CompileError::Failed {
                status: output.status,
                log: tail(&output.stderr),
            });
        }
        debug!(program = %self.config.program, "compiler available");
        Ok(())
    }
}

/// Wraps markup in a minimal display-math document.
#[must_use]
pub fn document(markup: &str) -> String {
    format!(
        "\\documentclass{{article}}\n\
         \\usepackage{{amsmath}}\n\
         \\begin{{document}}\n\
         \\[ {markup} \\]\n\
         \\end{{document}}\n"
    )
}

fn tail(output: &[u8]) -> String {
    let text = String::from_utf8_lossy(output);
    let start = text.len().saturating_sub(LOG_TAIL);
    let start = (start..text.len())
        .find(|&i| text.is_char_boundary(i))
        .unwrap_or(text.len());
    text[start..].to_string()
}

/// Compiles each case, dropping those the compiler rejects.
pub fn ground_truth<C>(
    cases: impl Strategy<Value = GenerationCase>,
    compiler: C,
) -> impl Strategy<Value = OracleCase>
where
    C: DocumentCompiler + 'static,
{
    cases.prop_filter_map("markup rejected by the compiler", move |case| {
        attest(&compiler, case)
    })
}

/// Compiles one case, or returns `None` when the compiler rejects it.
pub fn attest<C: DocumentCompiler>(compiler: &C, case: GenerationCase) -> Option<OracleCase> {
    match compiler.compile(&case.markup) {
        Ok(artifact) => Some(OracleCase { case, artifact }),
        Err(err) => {
            debug!(markup = %case.markup, reason = %err, "markup does not compile");
            None
        }
    }
}
