//! measure-kit CLI
//!
//! Command-line interface for turning FHIR measure bundles into runnable
//! CQL execution projects

mod commands;
mod output;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use measure_kit_core::{EngineVersion, Result, init_json_tracing, init_tracing};
use std::io;
use std::path::PathBuf;
use tracing::error;

#[derive(Parser)]
#[command(name = "measure-kit")]
#[command(about = "measure-kit: build runnable CQL execution projects from FHIR measure bundles")]
#[command(version = measure_kit_core::VERSION)]
#[command(
    long_about = "measure-kit converts a FHIR measure bundle into a self-contained project for the\n\
cql-execution engine: extracted ELM/CQL libraries, a value set map for the code service,\n\
and a runner that evaluates the measure against a patient bundle.\n\
\n\
Examples:\n  \
measure-kit generate -m measure.json -p patient.json     # Generate ./my-execution\n  \
measure-kit generate -m measure.json -p patient.json -o cms122 --engine-version 3.0.0-beta.x\n  \
measure-kit valuesets measure.json --pretty               # Print the value set map\n  \
measure-kit inspect measure.json                          # Summarize a bundle"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(
        short,
        long,
        global = true,
        help = "Path to configuration file (.measurekitrc.json/.measurekitrc.toml/measure-kit.yaml)"
    )]
    config: Option<PathBuf>,

    /// Verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Log format
    #[arg(long, global = true, value_enum, default_value = "text")]
    log_format: LogFormat,

    /// Generate shell completion script
    #[arg(
        long,
        value_enum,
        help = "Generate completion script for specified shell"
    )]
    generate_completion: Option<Shell>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an execution project from a measure bundle and a patient bundle
    #[command(alias = "gen")]
    Generate {
        /// Measure bundle (JSON)
        #[arg(short, long, help = "Path to the measure bundle")]
        measure_bundle: PathBuf,

        /// Patient bundle (JSON)
        #[arg(short, long, help = "Path to the patient bundle")]
        patient_bundle: PathBuf,

        /// Output directory
        #[arg(short, long, help = "Output directory (default: my-execution)")]
        output: Option<PathBuf>,

        /// Package name of the generated project
        #[arg(short, long, help = "Project name (default: output directory name)")]
        name: Option<String>,

        /// cql-execution version line
        #[arg(long, value_enum, help = "cql-execution version to target")]
        engine_version: Option<EngineVersionArg>,

        /// Measurement period start
        #[arg(long, requires = "period_end", help = "Measurement period start (YYYY-MM-DD)")]
        period_start: Option<String>,

        /// Measurement period end
        #[arg(long, requires = "period_start", help = "Measurement period end (YYYY-MM-DD)")]
        period_end: Option<String>,

        /// Clean output directory before generating
        #[arg(long, help = "Remove the output directory before generating")]
        clean: bool,
    },

    /// Print the value set map built from a measure bundle
    #[command(alias = "vs")]
    Valuesets {
        /// Measure bundle (JSON)
        measure_bundle: PathBuf,

        /// Pretty-print the JSON
        #[arg(long, help = "Pretty-print the JSON output")]
        pretty: bool,
    },

    /// Summarize the contents of a measure bundle
    Inspect {
        /// Measure bundle (JSON)
        measure_bundle: PathBuf,
    },

    /// Show version information
    #[command(alias = "ver")]
    Version {
        /// Show detailed version information
        #[arg(long, help = "Show detailed version and build information")]
        detailed: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum EngineVersionArg {
    /// cql-execution 2.x
    #[value(name = "2.x")]
    V2,
    /// cql-execution 3.0.0 beta
    #[value(name = "3.0.0-beta.x")]
    V3Beta,
}

impl From<EngineVersionArg> for EngineVersion {
    fn from(arg: EngineVersionArg) -> Self {
        match arg {
            EngineVersionArg::V2 => EngineVersion::V2,
            EngineVersionArg::V3Beta => EngineVersion::V3Beta,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum LogFormat {
    /// Human-readable log lines
    Text,
    /// One JSON object per log event
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle shell completion generation
    if let Some(shell) = cli.generate_completion {
        generate_completion_script(shell);
        return Ok(());
    }

    if !cli.no_color && std::env::var("NO_COLOR").is_err() {
        colored::control::unset_override();
    } else {
        colored::control::set_override(false);
    }

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => "measure_kit=warn",
        1 => "measure_kit=info",
        2 => "measure_kit=debug",
        _ => "measure_kit=trace",
    };
    if std::env::var("RUST_LOG").is_err() {
        unsafe {
            std::env::set_var("RUST_LOG", log_level);
        }
    }
    match cli.log_format {
        LogFormat::Text => init_tracing(),
        LogFormat::Json => init_json_tracing(),
    }

    match run_command(cli) {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("measure-kit failed: {}", e);
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn generate_completion_script(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

fn run_command(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Generate {
            measure_bundle,
            patient_bundle,
            output,
            name,
            engine_version,
            period_start,
            period_end,
            clean,
        }) => {
            let overrides = commands::GenerateOverrides {
                output,
                name,
                engine_version: engine_version.map(EngineVersion::from),
                period: period_start.zip(period_end),
                clean,
            };
            commands::generate_command(measure_bundle, patient_bundle, overrides, cli.config)
        }

        Some(Commands::Valuesets {
            measure_bundle,
            pretty,
        }) => commands::valuesets_command(measure_bundle, pretty),

        Some(Commands::Inspect { measure_bundle }) => commands::inspect_command(measure_bundle),

        Some(Commands::Version { detailed }) => {
            if detailed {
                println!("measure-kit {}", measure_kit_core::VERSION);
                println!("Build information:");
                println!("  Target: {}", std::env::consts::ARCH);
                println!("  OS: {}", std::env::consts::OS);
            } else {
                println!("{}", measure_kit_core::VERSION);
            }
            Ok(())
        }

        None => {
            // No subcommand provided, show help
            let mut cmd = Cli::command();
            cmd.print_help()?;
            Ok(())
        }
    }
}
