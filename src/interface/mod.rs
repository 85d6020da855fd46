pub mod cli;
pub mod config;
pub mod output;

use crate::analysis::ProjectAnalyzer;
use crate::error::{Error, Result};
use crate::generators::templates::create_template_engine;
use crate::generators::{ArtifactOutcome, ClientGenerator};
use crate::models::ServiceTarget;
use serde::Serialize;
use std::path::Path;

pub use config::GenerateConfig;
pub use output::{Logger, ProgressReporter};

/// Everything that happened for one target binding.
#[derive(Debug, Clone, Serialize)]
pub struct TargetReport {
    pub binding: String,
    pub service: String,
    pub outcomes: Vec<ArtifactOutcome>,
}

/// A target that failed; the rest of the run is unaffected.
#[derive(Debug, Clone, Serialize)]
pub struct TargetFailure {
    pub target: String,
    pub message: String,
}

/// Aggregate result of a generation run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationReport {
    pub targets: Vec<TargetReport>,
    pub failures: Vec<TargetFailure>,
}

impl GenerationReport {
    pub fn outcomes(&self) -> impl Iterator<Item = &ArtifactOutcome> {
        self.targets.iter().flat_map(|t| t.outcomes.iter())
    }

    pub fn written_count(&self) -> usize {
        self.outcomes().filter(|o| o.is_written()).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes().filter(|o| !o.is_written()).count()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Run generation as described by the configuration.
///
/// Per-target failures are collected into the report instead of aborting the
/// run; only setup problems (bad configuration, unreadable project, template
/// engine) fail the call itself.
pub fn generate_from_config(config: &GenerateConfig) -> Result<GenerationReport> {
    let logger = Logger::new(config.is_verbose(), false);
    config
        .validate()
        .map_err(|e| Error::Config(e.to_string()))?;

    let mut progress = ProgressReporter::new(logger.clone(), 3);

    progress.start_step("Analyzing project");
    let project_root = Path::new(&config.project_path);
    let mut analyzer = ProjectAnalyzer::new();
    let services = analyzer.analyze_project(project_root)?;
    logger.verbose(&format!("Found {} service trait(s):", services.len()));
    for service in services {
        logger.verbose(&format!(
            "  - {} ({}:{})",
            service.name, service.file_path, service.line_number
        ));
    }
    if services.is_empty() {
        logger.warning(
            "No RPC service traits found. A service trait declares only async \
             methods of the form `async fn name(&mut self, ctx, request) -> Result<Response, E>`.",
        );
        return Ok(GenerationReport::default());
    }
    progress.complete_step(Some(&format!("{} service trait(s)", services.len())));

    progress.start_step("Resolving targets");
    let target_dir = project_root.join(&config.target_path);
    let targets = analyzer.resolve_targets(
        project_root,
        &target_dir,
        &config.bindings,
        config.service.as_deref(),
    )?;
    if targets.is_empty() {
        logger.warning(&format!(
            "No bindings in {} match a discovered service.",
            target_dir.display()
        ));
        return Ok(GenerationReport::default());
    }
    for target in &targets {
        logger.verbose(&format!(
            "  - {} -> {} ({} method(s))",
            target.binding.scope_id(),
            target.service.name,
            target.num_methods()
        ));
    }
    progress.complete_step(Some(&format!("{} target(s)", targets.len())));

    progress.start_step("Generating artifacts");
    let tera = create_template_engine()?;
    let mut report = GenerationReport::default();
    for target in &targets {
        match generate_target(target, &target_dir, &tera, &logger, config.emit_run_script()) {
            Ok(target_report) => report.targets.push(target_report),
            Err(err) => {
                logger.error(&format!("{}: {}", target.binding.scope_id(), err));
                report.failures.push(TargetFailure {
                    target: target.binding.scope_id(),
                    message: err.to_string(),
                });
            }
        }
    }
    progress.complete_step(None);
    progress.finish(&format!(
        "{} artifact(s) written, {} skipped, {} target(s) failed",
        report.written_count(),
        report.skipped_count(),
        report.failures.len()
    ));

    Ok(report)
}

/// One target, one generator instance: initializer, per-method skeletons,
/// run script. The first artifact error aborts this target only.
fn generate_target(
    target: &ServiceTarget,
    target_dir: &Path,
    tera: &tera::Tera,
    logger: &Logger,
    emit_run_script: bool,
) -> Result<TargetReport> {
    let generator = ClientGenerator::new(target, target_dir, tera, logger)?;

    let mut outcomes = vec![generator.generate_clients_file()?];
    for handler in generator.handlers() {
        outcomes.push(handler.generate_test_file()?);
    }
    if emit_run_script {
        outcomes.push(generator.generate_run_tests_file()?);
    }

    Ok(TargetReport {
        binding: target.binding.scope_id(),
        service: target.service.name.clone(),
        outcomes,
    })
}
