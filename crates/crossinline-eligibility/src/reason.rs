use std::fmt;

use serde::Serialize;

/// Why a declaration is not defined as available-externally.
///
/// None of these are errors; they are the expected "no" answers of the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Ineligibility {
    CrossModuleInliningDisabled,
    NeverInline,
    OptimizerInliningDisabled,
    UnitTest,
    Alias,
    NoBody,
    InvariantWrapper,
    RuntimeRootUnit,
    AlreadyResolved,
    DefinedElsewhere,
    WeakLinkage,
    TooManyStatements { threshold: u32 },
    ResolutionFailed,
    SuppressedErrors { count: usize },
    Naked,
}

impl Ineligibility {
    /// Stable short code for logs and reports
    pub fn code(&self) -> &'static str {
        match self {
            Ineligibility::CrossModuleInliningDisabled => "cross-module-inlining-disabled",
            Ineligibility::NeverInline => "never-inline",
            Ineligibility::OptimizerInliningDisabled => "optimizer-inlining-disabled",
            Ineligibility::UnitTest => "unit-test",
            Ineligibility::Alias => "alias",
            Ineligibility::NoBody => "no-body",
            Ineligibility::InvariantWrapper => "invariant-wrapper",
            Ineligibility::RuntimeRootUnit => "runtime-root-unit",
            Ineligibility::AlreadyResolved => "already-resolved",
            Ineligibility::DefinedElsewhere => "defined-elsewhere",
            Ineligibility::WeakLinkage => "weak-linkage",
            Ineligibility::TooManyStatements { .. } => "too-many-statements",
            Ineligibility::ResolutionFailed => "resolution-failed",
            Ineligibility::SuppressedErrors { .. } => "suppressed-errors",
            Ineligibility::Naked => "naked",
        }
    }
}

impl fmt::Display for Ineligibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ineligibility::CrossModuleInliningDisabled => {
                write!(f, "cross-module inlining fully disabled")
            }
            Ineligibility::NeverInline => write!(f, "marked never-inline"),
            Ineligibility::OptimizerInliningDisabled => {
                write!(f, "optimizer flags indicate no inlining")
            }
            Ineligibility::UnitTest => write!(f, "unit test declaration"),
            Ineligibility::Alias => write!(f, "function alias declaration"),
            Ineligibility::NoBody => write!(f, "no function body available for inlining"),
            Ineligibility::InvariantWrapper => write!(f, "invariant wrapper cannot be emitted"),
            Ineligibility::RuntimeRootUnit => {
                write!(f, "functions of the runtime root unit are not inlined")
            }
            Ineligibility::AlreadyResolved => write!(f, "semantic analysis already completed"),
            Ineligibility::DefinedElsewhere => write!(f, "function will be defined elsewhere"),
            Ineligibility::WeakLinkage => write!(f, "weak functions cannot be inlined"),
            Ineligibility::TooManyStatements { threshold } => {
                write!(f, "more than {} statements", threshold)
            }
            Ineligibility::ResolutionFailed => write!(f, "speculative resolution failed"),
            Ineligibility::SuppressedErrors { count } => {
                write!(f, "{} error(s) during speculative resolution", count)
            }
            Ineligibility::Naked => write!(f, "naked functions cannot be inlined"),
        }
    }
}

/// Outcome of the eligibility gate for one declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Fully resolved and ready to be emitted available-externally
    Eligible,
    Ineligible(Ineligibility),
}

impl Verdict {
    pub fn is_eligible(&self) -> bool {
        matches!(self, Verdict::Eligible)
    }

    pub fn reason(&self) -> Option<Ineligibility> {
        match self {
            Verdict::Eligible => None,
            Verdict::Ineligible(reason) => Some(*reason),
        }
    }
}

impl From<Result<(), Ineligibility>> for Verdict {
    fn from(result: Result<(), Ineligibility>) -> Self {
        match result {
            Ok(()) => Verdict::Eligible,
            Err(reason) => Verdict::Ineligible(reason),
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Eligible => write!(f, "eligible"),
            Verdict::Ineligible(reason) => write!(f, "ineligible ({})", reason),
        }
    }
}
