//! Statement-count heuristic deciding whether a body is small enough to be
//! worth resolving speculatively.
//!
//! Every statement weighs the same and counting stops as soon as the
//! threshold is exceeded, so large bodies cost at most `threshold + 1` visits.
//! Whether a candidate actually gets inlined is still up to the optimizer.

use std::ops::ControlFlow;

use crossinline_core::{FunctionBody, Statement, StoppableVisitor, TreeWalker};
use tracing::debug;

/// Counts statements until more than `threshold` have been seen.
#[derive(Debug, Clone)]
pub struct StatementCounter {
    threshold: u32,
    count: u32,
}

impl StatementCounter {
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold,
            count: 0,
        }
    }

    /// Statements visited so far. Never exceeds `threshold + 1`.
    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn exceeded(&self) -> bool {
        self.count > self.threshold
    }
}

impl StoppableVisitor for StatementCounter {
    fn visit_statement(&mut self, _stmt: &Statement) -> ControlFlow<()> {
        self.count += 1;
        if self.exceeded() {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }
}

/// Count the statements of `body`, giving up once the count passes
/// `threshold`.
pub fn count_statements_bounded(body: &FunctionBody, threshold: u32) -> u32 {
    let mut counter = StatementCounter::new(threshold);
    let _ = TreeWalker::new().walk_body(body, &mut counter);
    counter.count()
}

/// Whether `body` has at most `threshold` statements.
pub fn is_inline_candidate(body: &FunctionBody, threshold: u32) -> bool {
    let count = count_statements_bounded(body, threshold);
    debug!(
        "Contains {} statements or more (threshold = {})",
        count, threshold
    );
    count <= threshold
}
