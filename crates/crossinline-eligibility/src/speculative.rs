//! Speculative full resolution of a candidate's body
//!
//! Resolution runs inside an inlining suppression scope so that errors from a
//! purely speculative attempt never reach the user. If the declaration is
//! really compiled elsewhere, that path resolves it again without suppression
//! and reports genuine errors there.
//!
//! A failed attempt may still have advanced the declaration's stage. Keeping
//! re-resolution of such a declaration sound is the resolver's job.

use crossinline_core::{DeclId, DiagnosticEngine, Program, ResolutionStage, SemanticResolver};
use tracing::{debug, instrument};

use crate::reason::Ineligibility;

/// Fully resolve `decl` (and any deferred work it triggers) with diagnostics
/// suppressed.
///
/// On success the declaration is left at [`ResolutionStage::FullyResolved`].
#[instrument(
    skip_all,
    fields(decl = %program.qualified_name(decl)),
    level = "debug",
    name = "speculative_resolution"
)]
pub fn verify_speculatively<R>(
    program: &mut Program,
    resolver: &mut R,
    diagnostics: &mut DiagnosticEngine,
    decl: DeclId,
) -> Result<(), Ineligibility>
where
    R: SemanticResolver + ?Sized,
{
    debug!("Do semantic analysis");

    let (resolved, swallowed) = {
        let mut scope = diagnostics.suppress_for_inlining();
        let resolved = resolver.resolve_function_body(program, decl, &mut scope);
        if resolved {
            resolver.run_deferred(program, &mut scope);
        } else {
            debug!("Failed to resolve function body");
        }
        (resolved, scope.finish())
    };

    if !resolved {
        return Err(Ineligibility::ResolutionFailed);
    }
    if swallowed > 0 {
        debug!("{} error(s) occurred during semantic analysis", swallowed);
        return Err(Ineligibility::SuppressedErrors { count: swallowed });
    }

    let func = &program[decl];
    assert!(
        func.stage() >= ResolutionStage::FullyResolved,
        "resolver reported success for '{}' without finishing resolution",
        func.name
    );

    // Only known once the body has been analysed.
    if func.naked {
        debug!("Naked asm functions cannot be inlined");
        return Err(Ineligibility::Naked);
    }

    Ok(())
}
