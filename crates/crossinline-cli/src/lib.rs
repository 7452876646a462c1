//! Library interface for the crossinline CLI

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use crossinline_core::{DiagnosticEngine, InlineConfig, ProgramManifest};
use crossinline_eligibility::{EligibilityGate, EligibilityReport, Verdict};
use tracing::{debug, info};

/// Configuration flags shared by every subcommand
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Inlining configuration file (TOML)
    #[arg(short, long, env = "CROSSINLINE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Maximum statement count for speculative resolution
    #[arg(short, long)]
    pub threshold: Option<u32>,

    /// Turn cross-module inlining off entirely
    #[arg(long)]
    pub disable_cross_module: bool,

    /// Behave as if the optimizer was told not to inline
    #[arg(long)]
    pub no_optimizer_inlining: bool,
}

impl ConfigArgs {
    /// Load the configuration file, if any, and apply command-line overrides.
    pub fn resolve(&self) -> Result<InlineConfig> {
        let mut config = match &self.config {
            Some(path) => InlineConfig::load(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => InlineConfig::default(),
        };

        if let Some(threshold) = self.threshold {
            config.statement_threshold = threshold;
        }
        if self.disable_cross_module {
            config.cross_module_inlining = false;
        }
        if self.no_optimizer_inlining {
            config.optimizer_inlining = false;
        }

        debug!("Using inlining config: {:?}", config);
        Ok(config)
    }
}

fn load_manifest(path: &Path) -> Result<ProgramManifest> {
    ProgramManifest::load(path)
        .with_context(|| format!("Failed to read program manifest {}", path.display()))
}

/// Evaluate every declaration of the manifest.
pub fn run_check(manifest: &Path, config: InlineConfig) -> Result<EligibilityReport> {
    let mut loaded = load_manifest(manifest)?
        .build()
        .with_context(|| format!("Invalid program manifest {}", manifest.display()))?;
    info!(
        "Loaded {} functions from {}",
        loaded.program.declaration_count(),
        manifest.display()
    );

    let gate = EligibilityGate::new(config);
    let mut diagnostics = DiagnosticEngine::new();
    Ok(EligibilityReport::evaluate(
        &gate,
        &mut loaded.program,
        &mut loaded.resolver,
        &mut diagnostics,
    ))
}

/// Evaluate a single `unit::function` of the manifest in isolation.
pub fn run_explain(manifest: &Path, declaration: &str, config: InlineConfig) -> Result<Verdict> {
    let mut loaded = load_manifest(manifest)?
        .build()
        .with_context(|| format!("Invalid program manifest {}", manifest.display()))?;
    let decl = loaded
        .program
        .lookup(declaration)
        .with_context(|| format!("No function '{}' in {}", declaration, manifest.display()))?;

    let gate = EligibilityGate::new(config);
    let mut diagnostics = DiagnosticEngine::new();
    Ok(gate.evaluate(
        &mut loaded.program,
        &mut loaded.resolver,
        &mut diagnostics,
        decl,
    ))
}

/// Human-readable table of a report
pub fn render_report(report: &EligibilityReport) -> String {
    let width = report
        .decisions
        .iter()
        .map(|d| d.declaration.len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for decision in &report.decisions {
        let verdict = match decision.reason {
            None => "eligible".to_string(),
            Some(reason) => format!("no: {} ({})", reason.code(), reason),
        };
        let _ = writeln!(out, "{:<width$}  {}", decision.declaration, verdict, width = width);
    }

    let _ = writeln!(
        out,
        "\n{} of {} functions eligible for cross-module inlining",
        report.eligible().count(),
        report.decisions.len()
    );
    if report.suppressed_errors > 0 {
        let _ = writeln!(
            out,
            "{} error(s) suppressed during speculative resolution",
            report.suppressed_errors
        );
    }
    out
}
