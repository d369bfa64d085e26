use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use mcdc_rs::decision::Program;
use mcdc_rs::observed;
use mcdc_rs::report::{self, ReportConfig};

#[derive(Parser)]
#[command(name = "mcdc")]
#[command(about = "Generate and verify MC/DC test cases for the decisions of a program", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v: info, -vv: debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enumerate truth tables and derive minimal MC/DC test cases
    Generate {
        /// Program to analyze
        input: PathBuf,

        /// Report file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Do not enumerate decisions with more conditions than this
        #[arg(long, default_value_t = ReportConfig::default().max_conditions)]
        max_conditions: usize,
    },
    /// Check MC/DC achieved by observed executions
    Verify {
        /// Program to analyze
        input: PathBuf,

        /// JSON file of observed [assignment, outcome] pairs
        #[arg(long)]
        observed: PathBuf,

        /// Report file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Exit with status 1 if any decision lacks coverage
        #[arg(long)]
        fail_on_gap: bool,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => simplelog::LevelFilter::Warn,
        1 => simplelog::LevelFilter::Info,
        _ => simplelog::LevelFilter::Debug,
    };
    simplelog::TermLogger::init(
        level,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    match cli.command {
        Commands::Generate {
            input,
            output,
            max_conditions,
        } => {
            let config = ReportConfig {
                max_conditions,
                ..ReportConfig::default()
            };
            let program = load_program(&input)?;
            let report = report::enumerate(program.decisions(), &config)?;
            log::info!("{} decisions reported", report.decisions.len());
            emit(&report.to_string(), output.as_deref())?;
        }
        Commands::Verify {
            input,
            observed,
            output,
            fail_on_gap,
        } => {
            let program = load_program(&input)?;
            let rows = observed::from_file(&observed)
                .wrap_err_with(|| format!("failed to read observations from {}", observed.display()))?;
            let report = report::verify(program.decisions(), &rows, &ReportConfig::default());
            log::info!(
                "{} decisions reported, {} failing",
                report.decisions.len(),
                report.failures().count()
            );
            emit(&report.to_string(), output.as_deref())?;
            if fail_on_gap && !report.passed() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn load_program(path: &Path) -> Result<Program> {
    let program = Program::from_file(path).wrap_err_with(|| format!("failed to analyze {}", path.display()))?;
    log::info!("{}: {} decisions", path.display(), program.decisions().len());
    Ok(program)
}

fn emit(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, text).wrap_err_with(|| format!("failed to write {}", path.display()))?;
            println!("MC/DC report written to {}", path.display());
        }
        None => print!("{}", text),
    }
    Ok(())
}
