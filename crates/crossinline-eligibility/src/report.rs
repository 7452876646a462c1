//! Whole-program eligibility reports

use std::collections::BTreeMap;
use std::path::Path;

use crossinline_core::{DiagnosticEngine, InlineConfig, Program, ResolutionStage, SemanticResolver};
use serde::Serialize;
use tracing::info;

use crate::error::ReportError;
use crate::gate::EligibilityGate;
use crate::reason::{Ineligibility, Verdict};

/// Gate outcome for one declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
    /// `unit::function`
    pub declaration: String,
    pub eligible: bool,
    pub reason: Option<Ineligibility>,
    /// Resolution stage once the gate was done with it
    pub stage: ResolutionStage,
}

#[derive(Debug, Clone, Serialize)]
pub struct EligibilityReport {
    pub config: InlineConfig,
    pub decisions: Vec<Decision>,
    /// Errors swallowed by speculative resolution during this run
    pub suppressed_errors: usize,
    /// Errors that reached the user during this run
    pub reported_errors: usize,
}

impl EligibilityReport {
    /// Run the gate over every declaration of `program`, in declaration order.
    ///
    /// Earlier verdicts can affect later ones: resolving one function
    /// speculatively may resolve others through deferred work.
    pub fn evaluate<R>(
        gate: &EligibilityGate,
        program: &mut Program,
        resolver: &mut R,
        diagnostics: &mut DiagnosticEngine,
    ) -> Self
    where
        R: SemanticResolver + ?Sized,
    {
        let suppressed_before = diagnostics.total_suppressed();
        let reported_before = diagnostics.error_count();

        let ids: Vec<_> = program.declarations().map(|(id, _)| id).collect();
        let decisions: Vec<Decision> = ids
            .into_iter()
            .map(|id| {
                let verdict = gate.evaluate(program, resolver, diagnostics, id);
                Decision {
                    declaration: program.qualified_name(id),
                    eligible: verdict.is_eligible(),
                    reason: verdict.reason(),
                    stage: program[id].stage(),
                }
            })
            .collect();

        let report = Self {
            config: gate.config().clone(),
            decisions,
            suppressed_errors: diagnostics.total_suppressed() - suppressed_before,
            reported_errors: diagnostics.error_count() - reported_before,
        };
        info!(
            "{} of {} functions eligible for cross-module inlining",
            report.eligible().count(),
            report.decisions.len()
        );
        report
    }

    pub fn eligible(&self) -> impl Iterator<Item = &Decision> {
        self.decisions.iter().filter(|d| d.eligible)
    }

    pub fn find(&self, declaration: &str) -> Option<&Decision> {
        self.decisions.iter().find(|d| d.declaration == declaration)
    }

    pub fn verdict_of(&self, declaration: &str) -> Option<Verdict> {
        self.find(declaration).map(|d| match d.reason {
            Some(reason) => Verdict::Ineligible(reason),
            None => Verdict::Eligible,
        })
    }

    /// How often each ineligibility reason came up, keyed by reason code
    pub fn reason_counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for reason in self.decisions.iter().filter_map(|d| d.reason) {
            *counts.entry(reason.code()).or_insert(0) += 1;
        }
        counts
    }

    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn export_to_file(&self, path: &Path) -> Result<(), ReportError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
