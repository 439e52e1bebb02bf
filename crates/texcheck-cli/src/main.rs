//! texcheck: one-shot round-trip campaign.
//!
//! Exits 0 without output when no disagreement is found, 1 after printing
//! the first (shrunk) disagreement and its replay seed, and 2 when the
//! campaign cannot run.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use texcheck::prelude::*;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "texcheck", version)]
#[command(
    about = "Check that parsing serialized LaTeX reproduces the original expression",
    long_about = None
)]
struct Cli {
    /// Number of cases to check
    #[arg(long, default_value = "256")]
    cases: u32,

    /// Stop after this many seconds and report a pass
    #[arg(long, value_name = "SECS")]
    deadline: Option<u64>,

    /// Replay seed (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum expression nesting above the atoms
    #[arg(long, default_value = "4")]
    max_depth: u32,

    /// Do not generate top-level relations
    #[arg(long)]
    no_relations: bool,

    /// Skip the ground-truth compiler and check every printable case
    #[arg(long)]
    skip_compile: bool,

    /// Document compiler program
    #[arg(long, env = "TEXCHECK_COMPILER", default_value = "pdflatex")]
    compiler: String,

    /// Extra argument for the compiler (repeatable; replaces the defaults)
    #[arg(long = "compiler-arg", value_name = "ARG", allow_hyphen_values = true)]
    compiler_args: Vec<String>,

    /// Extension of the compiled artifact
    #[arg(long, default_value = "pdf")]
    artifact_ext: String,

    /// Directory to save the artifact of a failing case
    #[arg(long, value_name = "DIR")]
    artifact_dir: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(io::stderr)
        .init();

    let generator = GeneratorConfig {
        depth: cli.max_depth,
        relations: !cli.no_relations,
        ..GeneratorConfig::default()
    };
    let campaign = Campaign::new(CampaignConfig {
        cases: cli.cases,
        deadline: cli.deadline.map(Duration::from_secs),
        seed: cli.seed,
        ..CampaignConfig::default()
    });

    let compiler = (!cli.skip_compile).then(|| {
        let mut config = CompilerConfig {
            program: cli.compiler.clone(),
            artifact_extension: cli.artifact_ext.clone(),
            ..CompilerConfig::default()
        };
        if !cli.compiler_args.is_empty() {
            config.args = cli.compiler_args.clone();
        }
        LatexCompiler::new(config)
    });

    match round_trip(&campaign, &generator, Latex, Latex, compiler) {
        Ok(Outcome::Passed { .. }) => ExitCode::SUCCESS,
        Ok(Outcome::Failed {
            report,
            seed,
            case_index,
        }) => {
            let mut reporter = Reporter::new();
            if let Some(dir) = &cli.artifact_dir {
                reporter = reporter.with_artifact_dir(dir);
            }
            if let Err(e) = reporter.report(&report, &mut io::stdout().lock()) {
                error!(error = %e, "failed to write report");
            }
            println!(
                "replay: {} (first failure at case {case_index})",
                replay_command(&cli, seed)
            );
            ExitCode::from(1)
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(2)
        }
    }
}

/// Builds the command line that replays a campaign with `seed`.
///
/// Every flag that shapes the draw sequence or the pipeline is echoed when it
/// differs from its default. The compiler is always echoed, since its default
/// can come from the environment.
fn replay_command(cli: &Cli, seed: u64) -> String {
    let mut cmd = format!("texcheck --seed {seed}");
    if cli.cases != CampaignConfig::default().cases {
        cmd.push_str(&format!(" --cases {}", cli.cases));
    }
    if cli.max_depth != GeneratorConfig::default().depth {
        cmd.push_str(&format!(" --max-depth {}", cli.max_depth));
    }
    if cli.no_relations {
        cmd.push_str(" --no-relations");
    }
    if cli.skip_compile {
        cmd.push_str(" --skip-compile");
        return cmd;
    }
    cmd.push_str(&format!(" --compiler {}", quoted(&cli.compiler)));
    for arg in &cli.compiler_args {
        cmd.push_str(&format!(" --compiler-arg={}", quoted(arg)));
    }
    if cli.artifact_ext != CompilerConfig::default().artifact_extension {
        cmd.push_str(&format!(" --artifact-ext {}", quoted(&cli.artifact_ext)));
    }
    cmd
}

/// Single-quotes `arg` for a POSIX shell when it holds anything but plain characters.
fn quoted(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_=./:,+".contains(c));
    if plain {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', "'\\''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["texcheck"]).unwrap();
        assert_eq!(cli.cases, 256);
        assert_eq!(cli.max_depth, 4);
        assert!(!cli.skip_compile);
        assert!(cli.compiler_args.is_empty());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_compiler_flags() {
        let cli = Cli::try_parse_from([
            "texcheck",
            "--compiler",
            "lualatex",
            "--compiler-arg",
            "-halt-on-error",
            "--artifact-ext",
            "dvi",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.compiler, "lualatex");
        assert_eq!(cli.compiler_args, vec!["-halt-on-error"]);
        assert_eq!(cli.artifact_ext, "dvi");
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_replay_echoes_generation_flags() {
        let cli = Cli::try_parse_from([
            "texcheck",
            "--max-depth",
            "1",
            "--no-relations",
            "--skip-compile",
            "--seed",
            "42",
        ])
        .unwrap();
        let replay = replay_command(&cli, 42);
        assert_eq!(replay, "texcheck --seed 42 --max-depth 1 --no-relations --skip-compile");

        let again = Cli::try_parse_from(replay.split(' ')).unwrap();
        assert_eq!(again.seed, Some(42));
        assert_eq!(again.max_depth, 1);
        assert!(again.no_relations);
        assert!(again.skip_compile);
    }

    #[test]
    fn test_replay_echoes_compiler() {
        let cli = Cli::try_parse_from([
            "texcheck",
            "--cases",
            "32",
            "--compiler",
            "lualatex",
            "--compiler-arg",
            "-halt-on-error",
            "--compiler-arg",
            "-jobname=it's",
            "--artifact-ext",
            "dvi",
        ])
        .unwrap();
        assert_eq!(
            replay_command(&cli, 7),
            "texcheck --seed 7 --cases 32 --compiler lualatex \
             --compiler-arg=-halt-on-error --compiler-arg='-jobname=it'\\''s' \
             --artifact-ext dvi"
        );
    }
}
