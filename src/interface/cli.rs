use crate::interface::config::GenerateConfig;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rpc-testgen", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate client initializers and test skeletons for the target module
    Generate {
        /// Project source root scanned for RPC service traits
        #[arg(short = 'p', long = "project-path", default_value = ".")]
        project_path: PathBuf,

        /// Module directory (relative to the project root) holding the
        /// target bindings; generated artifacts land here
        #[arg(short = 't', long = "target-path", default_value = "src")]
        target_path: PathBuf,

        /// Binding to generate for; repeatable. Omit to discover every
        /// binding whose type matches a service
        #[arg(short = 'b', long = "binding")]
        binding: Vec<String>,

        /// Force a specific service trait instead of matching by type
        #[arg(short = 's', long = "service")]
        service: Option<String>,

        /// Do not emit the run_tests.sh helper
        #[arg(long, action = clap::ArgAction::SetTrue)]
        no_run_script: bool,

        /// Verbose output
        #[arg(long, action = clap::ArgAction::SetTrue)]
        verbose: bool,

        /// Configuration file path; when given, the other flags are ignored
        #[arg(short = 'c', long = "config")]
        config_file: Option<PathBuf>,
    },
    /// Write a starter configuration file
    Init {
        /// Project source root to record in the configuration
        #[arg(short = 'p', long = "project-path", default_value = ".")]
        project_path: PathBuf,

        /// Target module directory to record in the configuration
        #[arg(short = 't', long = "target-path", default_value = "src")]
        target_path: PathBuf,

        /// Where to write the configuration file
        #[arg(short = 'o', long = "output", default_value = "rpc-testgen.json")]
        output: PathBuf,

        /// Overwrite an existing configuration file
        #[arg(long, action = clap::ArgAction::SetTrue)]
        force: bool,
    },
}

impl From<&Commands> for GenerateConfig {
    fn from(cmd: &Commands) -> Self {
        match cmd {
            Commands::Generate {
                project_path,
                target_path,
                binding,
                service,
                no_run_script,
                verbose,
                ..
            } => GenerateConfig {
                project_path: project_path.to_string_lossy().to_string(),
                target_path: target_path.to_string_lossy().to_string(),
                bindings: binding.clone(),
                service: service.clone(),
                emit_run_script: Some(!*no_run_script),
                verbose: Some(*verbose),
            },
            Commands::Init {
                project_path,
                target_path,
                ..
            } => GenerateConfig {
                project_path: project_path.to_string_lossy().to_string(),
                target_path: target_path.to_string_lossy().to_string(),
                ..Default::default()
            },
        }
    }
}
