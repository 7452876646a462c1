use crossinline_core::{DeclId, Program};
use tracing::trace;

/// Whether `decl` is already guaranteed a definition outside the root units
/// being emitted, so no speculative treatment is needed.
///
/// Walks from `decl` outwards through its lexically enclosing functions. A
/// link that is not a template instance and lives in a non-root unit settles
/// the answer. The chain is finite: a [`Program`] only accepts a nesting
/// parent that was added before its child, so parents always have smaller
/// ids and the walk cannot cycle.
pub fn is_defined_elsewhere(program: &Program, decl: DeclId) -> bool {
    let mut current = Some(decl);
    while let Some(id) = current {
        let func = &program[id];
        if !func.instantiated && !program.unit(func.unit).is_root {
            trace!(
                "{} is owned by non-root unit '{}'",
                program.qualified_name(id),
                program.unit(func.unit).name
            );
            return true;
        }
        current = func.nesting_parent;
    }
    false
}
