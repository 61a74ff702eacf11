use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::{
    fs,
    path::{Path, PathBuf},
    process,
    time::Duration,
};
use tracing_subscriber::EnvFilter;

use crew_flow::{
    codegen::CodeGenerator,
    config::Settings,
    json_output::{CheckJsonOutput, SimulateJsonOutput},
    lint::{Severity, has_errors, validate},
    loader::load_graph_from_path,
    presets::{presets, presets_of_kind},
    simulate::{RunStatus, Simulator},
};

#[derive(Parser, Debug)]
#[command(name = "crew-flow", about = "Check, dry-run and export crew flows")]
struct Cli {
    /// Settings file (JSON, or TOML with the `toml` feature).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a saved flow and print its diagnostics.
    Check(CheckArgs),
    /// Walk a flow from its start nodes and report node readiness.
    Simulate(SimulateArgs),
    /// Emit the Python crew script for a flow.
    Generate(GenerateArgs),
    /// List the node templates offered by the editor.
    Presets(PresetsArgs),
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Saved flow JSON file.
    flow: PathBuf,
    /// Emit a machine-readable JSON payload.
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct SimulateArgs {
    /// Saved flow JSON file.
    flow: PathBuf,
    /// Delay per evaluated node, overriding settings.
    #[arg(long = "delay-ms")]
    delay_ms: Option<u64>,
    /// Emit a machine-readable JSON payload.
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Saved flow JSON file.
    flow: PathBuf,
    /// Write the script here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct PresetsArgs {
    #[arg(long, value_enum)]
    kind: Option<KindArg>,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum KindArg {
    Agent,
    Task,
    Tool,
    Flow,
}

impl KindArg {
    fn as_str(self) -> &'static str {
        match self {
            KindArg::Agent => "agent",
            KindArg::Task => "task",
            KindArg::Tool => "tool",
            KindArg::Flow => "flow",
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("crew_flow=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let settings = load_settings(cli.config.as_deref())?;
    match cli.command {
        Commands::Check(args) => handle_check(args),
        Commands::Simulate(args) => handle_simulate(args, &settings).await,
        Commands::Generate(args) => handle_generate(args, &settings),
        Commands::Presets(args) => handle_presets(args),
    }
}

fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let settings = match path {
        Some(path) => Settings::load_from_file(path)?,
        None => Settings::default(),
    };
    settings.with_env_overrides()
}

fn handle_check(args: CheckArgs) -> Result<()> {
    if args.json {
        let output = match load_graph_from_path(&args.flow) {
            Ok(graph) => CheckJsonOutput::from_diagnostics(validate(&graph)),
            Err(err) => CheckJsonOutput::error(err),
        };
        let ok = output.ok;
        println!("{}", output.into_string());
        if !ok {
            process::exit(1);
        }
        return Ok(());
    }

    let graph = load_graph_from_path(&args.flow)?;
    let diagnostics = validate(&graph);
    for diag in &diagnostics {
        let severity = match diag.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        let node = diag.node_id.as_deref().unwrap_or("-");
        println!("{severity:<7} {:<26} {node}: {}", diag.code, diag.message);
    }
    if has_errors(&diagnostics) {
        anyhow::bail!("{} failed validation", args.flow.display());
    }
    println!("OK  {} ({} finding(s))", args.flow.display(), diagnostics.len());
    Ok(())
}

async fn handle_simulate(args: SimulateArgs, settings: &Settings) -> Result<()> {
    let mut options = settings.simulator_options();
    if let Some(ms) = args.delay_ms {
        options.step_delay = Duration::from_millis(ms);
    }
    let simulator = Simulator::new(options);

    if args.json {
        let output = match load_graph_from_path(&args.flow) {
            Ok(graph) => SimulateJsonOutput::from_report(simulator.run(&graph).await),
            Err(err) => SimulateJsonOutput::error(err),
        };
        let ok = output.ok;
        println!("{}", output.into_string());
        if !ok {
            process::exit(1);
        }
        return Ok(());
    }

    let graph = load_graph_from_path(&args.flow)?;
    let report = simulator.run(&graph).await;
    for record in &report.records {
        let status = match record.status {
            RunStatus::Success => "ok",
            RunStatus::Warning => "warn",
            RunStatus::Error => "error",
        };
        let node = if record.node_id.is_empty() {
            "-"
        } else {
            record.node_id.as_str()
        };
        println!("{status:<5} {node}: {}", record.message);
    }
    let counts = report.counts();
    println!(
        "{} success, {} warning(s), {} error(s)",
        counts.success, counts.warning, counts.error
    );
    if report.has_errors() {
        anyhow::bail!("simulation of {} reported errors", args.flow.display());
    }
    Ok(())
}

fn handle_generate(args: GenerateArgs, settings: &Settings) -> Result<()> {
    let graph = load_graph_from_path(&args.flow)?;
    let generator = CodeGenerator::new(settings.generator_options())?;
    let script = generator.generate(&graph)?;
    match args.out {
        Some(path) => {
            fs::write(&path, &script)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("Wrote {}", path.display());
        }
        None => print!("{script}"),
    }
    Ok(())
}

fn handle_presets(args: PresetsArgs) -> Result<()> {
    let list = match args.kind {
        Some(kind) => presets_of_kind(kind.as_str()),
        None => presets(),
    };
    println!("{}", serde_json::to_string_pretty(&list)?);
    Ok(())
}
