//! Minimal CLI: type graph(s) → GraphQL schema text
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;

use crate::emit::{emit_to_string, Emitter};
use crate::graph::{Node, TypeGraph};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// lower JSON type graphs into a GraphQL schema with CRUD query/mutation artifacts
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    /// raise log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// lower a single type graph to a file or stdout
    Emit(EmitOut),
    /// lower every type graph matching the inputs into an output directory
    Build(BuildOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct EmitOut {
    /// type graph JSON document
    #[arg(long, short)]
    input: PathBuf,

    /// output .graphql file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct BuildOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// directory receiving one schema file per input unit
    #[arg(long)]
    out_dir: PathBuf,

    /// extension of generated schema files
    #[arg(long, default_value = "graphql")]
    extension: String,

    /// worker threads (defaults to the number of CPUs)
    #[arg(long)]
    jobs: Option<usize>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

/// What happened to one discovered input unit.
#[derive(Debug)]
pub enum UnitOutcome {
    Written { path: PathBuf, declarations: usize },
    /// The unit does not define a schema.
    Skipped,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn verbosity(&self) -> u8 {
        self.verbose
    }

    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Emit(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }
                let graph = crate::path_de::load_graph(&target.input)?;
                match target.out.as_ref() {
                    Some(out) => {
                        let outcome = write_unit(&graph, out)?;
                        tracing::info!(?outcome, "schema written");
                    }
                    None => {
                        let schema_src = emit_to_string(&graph)
                            .with_context(|| format!("failed to lower {}", target.input.display()))?;
                        print!("{schema_src}");
                    }
                }
                Ok(())
            }
            Command::Build(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }
                let units = resolve_file_path_patterns(&target.input_settings.input)?;
                std::fs::create_dir_all(&target.out_dir)
                    .with_context(|| format!("failed to create {}", target.out_dir.display()))?;

                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(target.jobs.unwrap_or(0))
                    .build()
                    .context("failed to start worker pool")?;
                let results = pool.install(|| build_units(&units, &target.out_dir, &target.extension));

                let failed = report(&results);
                if failed > 0 {
                    bail!("{failed} of {} units failed", results.len());
                }
                Ok(())
            }
        }
    }
}

/// Lower every unit independently; one unit's failure never stops the others.
pub fn build_units(units: &[PathBuf], out_dir: &Path, extension: &str) -> Vec<(PathBuf, Result<UnitOutcome>)> {
    units
        .par_iter()
        .map(|unit| {
            let outcome = build_unit(unit, out_dir, extension);
            if let Err(error) = &outcome {
                tracing::error!(unit = %unit.display(), "{error:#}");
            }
            (unit.clone(), outcome)
        })
        .collect()
}

fn build_unit(unit: &Path, out_dir: &Path, extension: &str) -> Result<UnitOutcome> {
    let graph = crate::path_de::load_graph(unit)?;
    if !defines_schema(&graph) {
        tracing::warn!(unit = %unit.display(), "no interface declarations, skipping");
        return Ok(UnitOutcome::Skipped);
    }
    let stem = unit
        .file_stem()
        .with_context(|| format!("input {} has no file name", unit.display()))?;
    let out = out_dir.join(stem).with_extension(extension);
    write_unit(&graph, &out).with_context(|| format!("failed to lower {}", unit.display()))
}

/// Schema-detection predicate: a unit defines a schema when it declares at
/// least one interface.
pub fn defines_schema(graph: &TypeGraph) -> bool {
    graph.values().any(|node| matches!(node, Node::Interface { .. }))
}

/// Run one full pass into `out`; a failed pass leaves no file behind.
fn write_unit(graph: &TypeGraph, out: &Path) -> Result<UnitOutcome> {
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let emitter = Emitter::new(graph);
    let declarations = emitter.entries().len();
    let file = File::create(out).with_context(|| format!("failed to create {}", out.display()))?;
    let mut writer = BufWriter::new(file);
    let written = emitter
        .emit_all(&[], &mut writer)
        .and_then(|()| writer.flush().map_err(Into::into));
    if let Err(error) = written {
        drop(writer);
        let _ = std::fs::remove_file(out);
        return Err(error.into());
    }
    tracing::info!(out = %out.display(), declarations, "schema written");
    Ok(UnitOutcome::Written { path: out.to_path_buf(), declarations })
}

fn report(results: &[(PathBuf, Result<UnitOutcome>)]) -> usize {
    let mut failed = 0;
    for (unit, outcome) in results {
        match outcome {
            Ok(UnitOutcome::Written { path, declarations }) => eprintln!(
                "{} {} → {} ({declarations} declarations)",
                "ok".green().bold(),
                unit.display(),
                path.display()
            ),
            Ok(UnitOutcome::Skipped) => eprintln!("{} {}", "skip".yellow().bold(), unit.display()),
            Err(error) => {
                failed += 1;
                eprintln!("{} {}: {error:#}", "fail".red().bold(), unit.display());
            }
        }
    }
    failed
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{' ))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            // Treat as a glob pattern
            let mut matched_any = false;
            let entries = glob::glob(pattern)
                .with_context(|| format!("invalid glob pattern: {pattern}"))?;
            for entry in entries {
                matched_any = true;
                out.push(entry?);
            }
            if !matched_any {
                // Pattern was explicitly a glob but matched nothing -> surface as an error
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            // Treat as a literal path
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
