//! Human-readable failure reports.

use std::io::{self, Write};
use std::path::PathBuf;

use texcheck_core::Expr;
use tracing::warn;

use crate::differential::FailureReport;

/// Writes failure reports, optionally saving artifacts to a directory.
#[derive(Clone, Debug, Default)]
pub struct Reporter {
    artifact_dir: Option<PathBuf>,
}

impl Reporter {
    /// A reporter that describes artifacts without saving them.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Saves artifacts of reported failures under `dir`.
    #[must_use]
    pub fn with_artifact_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.artifact_dir = Some(dir.into());
        self
    }

    /// Writes `report` to `out`.
    ///
    /// # Errors
    ///
    /// Propagates write errors on `out`. Failing to save the artifact is
    /// logged and reported inline instead.
    pub fn report(&self, report: &FailureReport, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "round trip failed")?;
        describe(out, "original", Some(&report.original))?;
        describe(out, "parsed", report.parsed.as_ref())?;
        if let Some(err) = &report.parse_error {
            writeln!(out, "  parse error: {err}")?;
        }
        writeln!(out, "  markup: {}", report.markup)?;

        match (&report.artifact, &self.artifact_dir) {
            (None, _) => writeln!(out, "  artifact: none (not compiled)")?,
            (Some(artifact), Some(dir)) => match artifact.write_to(dir, "failure") {
                Ok(path) => writeln!(out, "  artifact: {}", path.display())?,
                Err(err) => {
                    warn!(dir = %dir.display(), error = %err, "cannot save artifact");
                    writeln!(out, "  artifact: {} bytes (not saved: {err})", artifact.len())?;
                }
            },
            (Some(artifact), None) => writeln!(
                out,
                "  artifact: {} bytes of .{}",
                artifact.len(),
                artifact.extension()
            )?,
        }
        Ok(())
    }
}

fn describe(out: &mut impl Write, label: &str, expr: Option<&Expr>) -> io::Result<()> {
    match expr {
        Some(expr) => {
            writeln!(out, "  {label}: {expr}")?;
            writeln!(out, "    classes: {}", expr.class_chain().join(" < "))
        }
        None => writeln!(out, "  {label}: <absent>"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::Artifact;

    fn sample(artifact: Option<Artifact>) -> FailureReport {
        FailureReport {
            original: Expr::symbol("A"),
            parsed: None,
            parse_error: Some("unexpected end of input".into()),
            markup: "A".into(),
            artifact,
        }
    }

    fn render(reporter: &Reporter, report: &FailureReport) -> String {
        let mut out = Vec::new();
        reporter.report(report, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_report_lists_both_sides() {
        let text = render(&Reporter::new(), &sample(None));
        assert!(text.contains("original: A"));
        assert!(text.contains("classes: Symbol < Atom < Expr"));
        assert!(text.contains("parsed: <absent>"));
        assert!(text.contains("parse error: unexpected end of input"));
        assert!(text.contains("artifact: none"));
    }

    #[test]
    fn test_artifact_is_described_by_size() {
        let text = render(&Reporter::new(), &sample(Some(Artifact::new(vec![0; 10], "pdf"))));
        assert!(text.contains("artifact: 10 bytes of .pdf"));
    }

    #[test]
    fn test_artifact_is_saved() {
        let dir = tempfile::tempdir().unwrap();
        let reporter = Reporter::new().with_artifact_dir(dir.path());
        let text = render(&reporter, &sample(Some(Artifact::new(vec![7], "pdf"))));
        assert!(dir.path().join("failure.pdf").exists());
        assert!(text.contains("failure.pdf"));
    }
}
