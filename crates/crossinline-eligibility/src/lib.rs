//! Cross-module inlining eligibility for crossinline
//!
//! Given a function about to be compiled, decide whether it should also be
//! fully resolved and defined available-externally in every unit that
//! references it, so the optimizer can inline it there. Whether it actually
//! gets inlined is left to the optimizer.

pub mod error;
pub mod gate;
pub mod heuristic;
pub mod locality;
pub mod reason;
pub mod report;
pub mod speculative;

pub use error::ReportError;
pub use gate::EligibilityGate;
pub use heuristic::{is_inline_candidate, StatementCounter};
pub use locality::is_defined_elsewhere;
pub use reason::{Ineligibility, Verdict};
pub use report::{Decision, EligibilityReport};
pub use speculative::verify_speculatively;
