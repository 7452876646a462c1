//! Diagnostic reporting with scoped suppression
//!
//! Diagnostics emitted while a [`SuppressionScope`] is open are counted and
//! dropped instead of reaching the user-visible error list. Scopes nest in
//! strict LIFO order: a scope mutably borrows the engine (or the enclosing
//! scope), so an inner scope always closes first.

use std::fmt;
use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};
use tracing::{error, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    /// `unit::function` the diagnostic is attached to, if any
    pub location: Option<String>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            location: None,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            location: None,
        }
    }

    pub fn at(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        match &self.location {
            Some(location) => write!(f, "{}: {}: {}", location, severity, self.message),
            None => write!(f, "{}: {}", severity, self.message),
        }
    }
}

/// Collects diagnostics for one compilation session.
#[derive(Debug, Default)]
pub struct DiagnosticEngine {
    reported: Vec<Diagnostic>,
    /// Number of open suppression scopes
    depth: usize,
    /// Errors swallowed by the currently open scopes
    suppressed_errors: usize,
    /// Errors swallowed over the whole session
    total_suppressed: usize,
    inlining_scope_open: bool,
}

impl DiagnosticEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report a diagnostic. While suppressed it is only counted.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        if self.depth > 0 {
            trace!(depth = self.depth, "suppressed: {}", diagnostic);
            if diagnostic.severity == Severity::Error {
                self.suppressed_errors += 1;
                self.total_suppressed += 1;
            }
            return;
        }

        if diagnostic.severity == Severity::Error {
            error!("{}", diagnostic);
        }
        self.reported.push(diagnostic);
    }

    /// Diagnostics that reached the user
    pub fn reported(&self) -> &[Diagnostic] {
        &self.reported
    }

    pub fn error_count(&self) -> usize {
        self.reported
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn is_suppressed(&self) -> bool {
        self.depth > 0
    }

    pub fn suppression_depth(&self) -> usize {
        self.depth
    }

    /// Errors swallowed by suppression scopes over the whole session
    pub fn total_suppressed(&self) -> usize {
        self.total_suppressed
    }

    /// Whether a speculative inlining attempt currently owns a scope
    pub fn is_suppressed_for_inlining(&self) -> bool {
        self.inlining_scope_open
    }

    /// Open a suppression scope. Scopes may nest.
    pub fn suppress(&mut self) -> SuppressionScope<'_> {
        SuppressionScope::open(self, false)
    }

    /// Open the scope used by a speculative inlining attempt.
    ///
    /// Only one such attempt may be in flight; opening a second one is a bug
    /// in the caller and panics.
    pub fn suppress_for_inlining(&mut self) -> SuppressionScope<'_> {
        assert!(
            !self.inlining_scope_open,
            "speculative inlining suppression scope is already open"
        );
        SuppressionScope::open(self, true)
    }
}

/// RAII guard returned by [`DiagnosticEngine::suppress`].
///
/// Dereferences to the engine so diagnostics can be emitted through it.
/// Closing (explicitly via [`finish`](Self::finish) or by dropping) restores
/// the suppressed-error counter to its value when the scope was opened.
pub struct SuppressionScope<'a> {
    engine: &'a mut DiagnosticEngine,
    saved_suppressed: usize,
    depth: usize,
    for_inlining: bool,
    closed: bool,
}

impl<'a> SuppressionScope<'a> {
    fn open(engine: &'a mut DiagnosticEngine, for_inlining: bool) -> Self {
        engine.depth += 1;
        if for_inlining {
            engine.inlining_scope_open = true;
        }
        let saved_suppressed = engine.suppressed_errors;
        let depth = engine.depth;
        Self {
            engine,
            saved_suppressed,
            depth,
            for_inlining,
            closed: false,
        }
    }

    /// Errors swallowed since this scope was opened
    pub fn errors_so_far(&self) -> usize {
        self.engine.suppressed_errors - self.saved_suppressed
    }

    /// Close the scope and return how many errors it swallowed.
    pub fn finish(mut self) -> usize {
        self.close()
    }

    fn close(&mut self) -> usize {
        assert_eq!(
            self.engine.depth, self.depth,
            "suppression scopes closed out of order"
        );
        self.closed = true;

        let swallowed = self.errors_so_far();
        self.engine.suppressed_errors = self.saved_suppressed;
        self.engine.depth -= 1;
        if self.for_inlining {
            self.engine.inlining_scope_open = false;
        }
        swallowed
    }
}

impl Deref for SuppressionScope<'_> {
    type Target = DiagnosticEngine;

    fn deref(&self) -> &DiagnosticEngine {
        &*self.engine
    }
}

impl DerefMut for SuppressionScope<'_> {
    fn deref_mut(&mut self) -> &mut DiagnosticEngine {
        &mut *self.engine
    }
}

impl Drop for SuppressionScope<'_> {
    fn drop(&mut self) {
        if !self.closed {
            self.close();
        }
    }
}
