use clap::Parser;
use rpc_testgen::interface::cli::{Cli, Commands};
use rpc_testgen::interface::config::CONFIG_FILE;
use rpc_testgen::interface::output::print_outcome_summary;
use rpc_testgen::{generate_from_config, GenerateConfig};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Generate { config_file, .. } => run_generate(&cli.command, config_file.clone()),
        Commands::Init {
            output, force, ..
        } => run_init(&cli.command, output, *force),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_generate(
    cmd: &Commands,
    config_file: Option<PathBuf>,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let config = match config_file {
        Some(path) => GenerateConfig::from_file(path)?,
        None if Path::new(CONFIG_FILE).exists() => GenerateConfig::from_file(CONFIG_FILE)?,
        None => GenerateConfig::from(cmd),
    };

    let report = generate_from_config(&config)?;

    let outcomes: Vec<_> = report.outcomes().cloned().collect();
    print_outcome_summary(&outcomes);

    if report.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        for failure in &report.failures {
            eprintln!("❌ {}: {}", failure.target, failure.message);
        }
        Ok(ExitCode::FAILURE)
    }
}

fn run_init(
    cmd: &Commands,
    output: &Path,
    force: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    if output.exists() && !force {
        return Err(format!(
            "{} already exists (use --force to overwrite)",
            output.display()
        )
        .into());
    }

    let config = GenerateConfig::from(cmd);
    config.validate()?;
    config.write_file(output)?;
    println!("✓ Wrote {}", output.display());
    println!("  Edit it, then run: rpc-testgen generate");
    Ok(ExitCode::SUCCESS)
}
