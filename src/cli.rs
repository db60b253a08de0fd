//! Minimal CLI: manifest → (generated suites | authoring templates), plus a
//! value sampler for eyeballing the synthesizer.
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, warn};

use crate::manifest::{SessionConfig, load_config, load_functions};
use crate::model::{RangeHint, Strategy, TypeTag};
use crate::render::{DialectKind, collect_imports, js, rebase_imports};
use crate::session::Session;
use crate::synth::Synth;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// generate JavaScript unit-test suites from scanned function descriptors
#[derive(Parser, Debug)]
#[command(name = "casegen", version)]
pub struct CommandLineInterface {
    /// more logging (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// generate one grouping block of cases per function
    Generate(GenerateOut),
    /// emit hand-authoring skeletons with placeholder values
    Template(TemplateOut),
    /// print synthesized values for one type tag
    Sample(SampleOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// One or more scanner manifests. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,

    /// only functions with this name (repeatable)
    #[arg(long)]
    only: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct GenerateOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// session config (policy, type tags, range hints)
    #[arg(long)]
    config: Option<PathBuf>,

    /// `Uniform` or `NormalCurve`
    #[arg(long)]
    strategy: Option<String>,

    /// primary rounds per function
    #[arg(long)]
    count: Option<usize>,

    /// append one edge-case round per primary round
    #[arg(long)]
    edge: bool,

    #[arg(long, value_enum)]
    dialect: Option<DialectKind>,

    #[arg(long)]
    seed: Option<u64>,

    /// output test file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct TemplateOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[arg(long, value_enum, default_value_t = DialectKind::Mocha)]
    dialect: DialectKind,

    /// output test file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct SampleOut {
    /// type tag, e.g. `Number` or `Map`
    #[arg(long = "type")]
    tag: TypeTag,

    #[arg(long, value_enum, default_value_t = SampleStrategy::Uniform)]
    strategy: SampleStrategy,

    #[arg(long, allow_negative_numbers = true)]
    min: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    max: Option<f64>,

    /// number of values
    #[arg(short, default_value_t = 5)]
    n: usize,

    #[arg(long)]
    seed: Option<u64>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum SampleStrategy {
    Uniform,
    Edge,
    Normal,
}

impl From<SampleStrategy> for Strategy {
    fn from(s: SampleStrategy) -> Self {
        match s {
            SampleStrategy::Uniform => Strategy::Uniform,
            SampleStrategy::Edge => Strategy::EdgeCase,
            SampleStrategy::Normal => Strategy::NormalCurve,
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load_session(&self) -> anyhow::Result<Session> {
        let mut functions = load_functions(&self.input).context("failed to load function manifests")?;
        if !self.only.is_empty() {
            functions.retain(|f| self.only.contains(&f.name));
        }
        if functions.is_empty() {
            warn!("no functions to generate for");
        }
        let mut session = Session::new();
        session.register_all(functions);
        Ok(session)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn verbosity(&self) -> u8 {
        self.verbose
    }

    pub fn run(&self) -> anyhow::Result<()> {
        match &self.cmd {
            Command::Generate(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }

                let mut session = target.input_settings.load_session()?;
                let config = match &target.config {
                    Some(path) => load_config(path)
                        .with_context(|| format!("failed to load session config {}", path.display()))?,
                    None => SessionConfig::default(),
                };
                for rejected in config.apply(&mut session) {
                    warn!("config entry ignored: {rejected}");
                }

                // flags win over the config file
                if let Some(strategy) = &target.strategy {
                    session.set_strategy(strategy)?;
                }
                if let Some(count) = target.count {
                    session.set_count(count);
                }
                if target.edge {
                    session.set_edge_round(true);
                }
                let dialect = target.dialect.or(config.dialect).unwrap_or_default().dialect();
                let mut rng = seeded_rng(target.seed.or(config.seed));

                let source = session.generate_file_in(dialect, output_dir(target.out.as_ref()), &mut rng);
                write_output(target.out.as_ref(), &source)?;
                eprintln!(
                    "{} {} function(s) as {} ({}, count {}{})",
                    "generated".green().bold(),
                    session.functions().count(),
                    dialect.name(),
                    session.policy().strategy,
                    session.policy().count,
                    if session.policy().include_edge_round { ", edge round" } else { "" },
                );
            }
            Command::Template(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }

                let session = target.input_settings.load_session()?;
                let functions = session.functions().cloned().collect::<Vec<_>>();
                let dialect = target.dialect.dialect();
                let imports = rebase_imports(collect_imports(&functions), output_dir(target.out.as_ref()));
                let mut source = dialect.preamble(&imports);
                for function in &functions {
                    source.push('\n');
                    source.push_str(&dialect.template(function));
                    source.push('\n');
                }
                write_output(target.out.as_ref(), &source)?;
                eprintln!("{} {} template(s)", "wrote".green().bold(), functions.len());
            }
            Command::Sample(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }

                let strategy = Strategy::from(target.strategy);
                if strategy == Strategy::NormalCurve && !target.tag.supports_normal_curve() {
                    bail!("{} is not supported by the normal-curve strategy", target.tag);
                }
                let hint = RangeHint::new(target.min, target.max);
                let mut rng = seeded_rng(target.seed);
                let mut synth = Synth::new(&mut rng);
                for _ in 0..target.n {
                    println!("{}", js::literal(&synth.value(target.tag, strategy, Some(&hint))));
                }
            }
        }
        Ok(())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => {
            info!(seed, "using fixed seed");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    }
}

/// Directory imports are resolved from: the output file's parent, or the
/// working directory when printing to stdout.
fn output_dir(out: Option<&PathBuf>) -> &Path {
    out.and_then(|p| p.parent()).unwrap_or(Path::new(""))
}

fn write_output(out: Option<&PathBuf>, source: &str) -> anyhow::Result<()> {
    match out {
        Some(out) => {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            std::fs::write(out, source).with_context(|| format!("failed to write {}", out.display()))?;
        }
        None => println!("{source}"),
    }
    Ok(())
}

// ------------------------------- Tests ------------------------------------ //
