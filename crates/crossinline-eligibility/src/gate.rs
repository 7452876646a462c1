//! Decides whether a function may be defined available-externally in the
//! current compilation, so the optimizer can inline it across units.
//!
//! Checks run cheapest first and the first failing one answers. Later checks
//! rely on earlier ones (the statement count needs a body), so the order is
//! part of the contract. Only when every policy check passes is the body
//! resolved speculatively, which is by far the most expensive step.

use crossinline_core::{
    DeclId, DiagnosticEngine, FunctionBody, InlineConfig, InlineIntent, Program, ResolutionStage,
    SemanticResolver,
};
use tracing::{debug, instrument};

use crate::heuristic::is_inline_candidate;
use crate::locality::is_defined_elsewhere;
use crate::reason::{Ineligibility, Verdict};
use crate::speculative::verify_speculatively;

/// Eligibility gate for available-externally definitions.
///
/// Holds no state between calls: every verdict depends only on the config
/// and the declaration's state at call time.
#[derive(Debug, Clone, Default)]
pub struct EligibilityGate {
    config: InlineConfig,
}

impl EligibilityGate {
    pub fn new(config: InlineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &InlineConfig {
        &self.config
    }

    /// Whether `decl` should be emitted available-externally. On `true` the
    /// declaration has been fully resolved as a side effect.
    pub fn is_eligible<R>(
        &self,
        program: &mut Program,
        resolver: &mut R,
        diagnostics: &mut DiagnosticEngine,
        decl: DeclId,
    ) -> bool
    where
        R: SemanticResolver + ?Sized,
    {
        self.evaluate(program, resolver, diagnostics, decl)
            .is_eligible()
    }

    /// Like [`is_eligible`](Self::is_eligible), but says why not.
    #[instrument(
        skip(self, program, resolver, diagnostics),
        fields(decl = %program.qualified_name(decl)),
        level = "debug"
    )]
    pub fn evaluate<R>(
        &self,
        program: &mut Program,
        resolver: &mut R,
        diagnostics: &mut DiagnosticEngine,
        decl: DeclId,
    ) -> Verdict
    where
        R: SemanticResolver + ?Sized,
    {
        let result = self
            .check_policy(program, decl)
            .and_then(|()| {
                debug!("Potential inlining candidate");
                verify_speculatively(program, resolver, diagnostics, decl)
            });

        match result {
            Ok(()) => debug!("Defined available-externally"),
            Err(reason) => debug!(reason = reason.code(), "{}", reason),
        }
        Verdict::from(result)
    }

    /// Run the policy checks that precede speculative resolution, without
    /// touching the declaration.
    pub fn check_policy(&self, program: &Program, decl: DeclId) -> Result<(), Ineligibility> {
        let func = &program[decl];

        if !self.config.cross_module_inlining {
            return Err(Ineligibility::CrossModuleInliningDisabled);
        }

        if func.inlining == InlineIntent::Never {
            return Err(Ineligibility::NeverInline);
        }

        // Always-inline functions are inlined even when the optimizer is
        // told not to inline.
        if func.inlining == InlineIntent::Always {
            debug!("Always-inline requested, overrides optimizer flags");
        } else if !self.config.optimizer_inlining {
            return Err(Ineligibility::OptimizerInliningDisabled);
        }

        if func.is_unit_test() {
            return Err(Ineligibility::UnitTest);
        }
        if func.is_alias() {
            return Err(Ineligibility::Alias);
        }
        assert!(
            func.body.is_some() || func.stage() < ResolutionStage::BodyResolved,
            "'{}' reached body resolution without a body",
            program.qualified_name(decl)
        );
        let body: &FunctionBody = func.body.as_ref().ok_or(Ineligibility::NoBody)?;

        // The frontend names the functions called by the invariant wrapper
        // differently depending on analysis order, so the wrapper cannot be
        // emitted in another unit.
        if func.is_invariant() {
            return Err(Ineligibility::InvariantWrapper);
        }

        // The runtime's type-info classes get special treatment that breaks
        // when their functions are emitted elsewhere.
        if program.unit(func.unit).is_named(&self.config.runtime_root_unit) {
            return Err(Ineligibility::RuntimeRootUnit);
        }

        // Resolution this far means the regular compilation path defines the
        // function. This also rules out nested functions.
        if func.stage() >= ResolutionStage::BodyResolved {
            return Err(Ineligibility::AlreadyResolved);
        }

        if is_defined_elsewhere(program, decl) {
            return Err(Ineligibility::DefinedElsewhere);
        }

        if func.weak {
            return Err(Ineligibility::WeakLinkage);
        }

        let threshold = self.config.statement_threshold;
        if func.inlining != InlineIntent::Always && !is_inline_candidate(body, threshold) {
            return Err(Ineligibility::TooManyStatements { threshold });
        }

        Ok(())
    }
}
