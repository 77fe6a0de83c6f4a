//! aclgen CLI — derive Arm Compute Library compiler flags.

mod commands;
mod inputs;

use std::process;

use aclgen_host::{ProcessHost, MODULE_DEFAULTS_TYPE};
use clap::{Parser, Subcommand};

use inputs::{load_config, InputArgs, ResolvedInputs};

#[derive(Parser)]
#[command(
    name = "aclgen",
    version,
    about = "Derive Arm Compute Library compiler flags",
    long_about = None,
    after_help = format!(
        "Flags are the cppflags of the '{}' module defaults.",
        MODULE_DEFAULTS_TYPE
    )
)]
struct Cli {
    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the derived compiler flags
    Flags {
        #[command(flatten)]
        inputs: InputArgs,
        /// Output format (text, lines, json)
        #[arg(long)]
        format: Option<String>,
        /// Show why each flag was emitted
        #[arg(long)]
        explain: bool,
    },
    /// Print the platform version table
    Versions {
        #[command(flatten)]
        inputs: InputArgs,
    },
    /// Show resolved inputs and report values that will be ignored
    Check {
        #[command(flatten)]
        inputs: InputArgs,
    },
}

fn init_logging(level: &str) {
    let filter = level.parse::<log::LevelFilter>().unwrap_or_else(|_| {
        eprintln!("warning: invalid log level '{level}', using warn");
        log::LevelFilter::Warn
    });
    env_logger::Builder::new()
        .filter_level(filter)
        .format_timestamp_micros()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn resolve(args: &InputArgs) -> anyhow::Result<ResolvedInputs> {
    let cwd = std::env::current_dir()?;
    let config = load_config(args, &cwd)?;
    if let Some((_, path)) = &config {
        log::info!("using {}", path.display());
    }
    let env = ProcessHost::new(
        args.platform_version.clone().unwrap_or_default(),
        args.arches.clone(),
    );
    Ok(ResolvedInputs::resolve(
        args,
        config.as_ref().map(|(c, p)| (c, p.as_path())),
        &env,
    ))
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Flags {
            inputs,
            format,
            explain,
        } => {
            let resolved = resolve(&inputs)?;
            commands::flags::run(&resolved, format.as_deref(), explain)
        }
        Commands::Versions { inputs } => {
            let resolved = resolve(&inputs)?;
            commands::versions::run(resolved.policy.value)
        }
        Commands::Check { inputs } => {
            let resolved = resolve(&inputs)?;
            commands::check::run(&resolved)
        }
    }
}
