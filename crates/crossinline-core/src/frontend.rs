//! Semantic resolution collaborator
//!
//! The inlining engine never analyses function bodies itself; it asks a
//! [`SemanticResolver`] to do so. [`ScriptedResolver`] is a deterministic
//! implementation driven by per-declaration scripts, used by the CLI and the
//! test suites.
//!
//! Resolvers must tolerate being asked to resolve a declaration again after
//! an earlier attempt failed part-way: a failed attempt may leave the
//! declaration at an intermediate stage.

use std::collections::{HashMap, VecDeque};
use std::ops::ControlFlow;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::ast::{FunctionBody, ResolutionStage, Statement};
use crate::compilation_unit::{DeclId, Program};
use crate::diagnostics::{Diagnostic, DiagnosticEngine};
use crate::walker::{StoppableVisitor, TreeWalker};

pub trait SemanticResolver {
    /// Fully resolve the body of `decl`, advancing it to
    /// [`ResolutionStage::FullyResolved`] on success. Returns `false` if
    /// resolution failed.
    fn resolve_function_body(
        &mut self,
        program: &mut Program,
        decl: DeclId,
        diagnostics: &mut DiagnosticEngine,
    ) -> bool;

    /// Run body resolution work deferred by earlier calls.
    fn run_deferred(&mut self, program: &mut Program, diagnostics: &mut DiagnosticEngine);
}

/// How resolving a declaration's body turns out
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionOutcome {
    #[default]
    Succeeds,
    /// Resolution gives up; the declaration stays at `BodyResolved`.
    Fails,
    /// Resolution completes but reports these errors along the way.
    Diagnoses(Vec<String>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionScript {
    #[serde(default)]
    pub outcome: ResolutionOutcome,
    /// Declarations whose body resolution gets queued as deferred work
    #[serde(default)]
    pub deferred: Vec<DeclId>,
}

impl ResolutionScript {
    pub fn succeeds() -> Self {
        Self::default()
    }

    pub fn fails() -> Self {
        Self {
            outcome: ResolutionOutcome::Fails,
            deferred: Vec::new(),
        }
    }

    pub fn diagnoses(messages: &[&str]) -> Self {
        Self {
            outcome: ResolutionOutcome::Diagnoses(messages.iter().map(|m| m.to_string()).collect()),
            deferred: Vec::new(),
        }
    }

    pub fn with_deferred(mut self, decl: DeclId) -> Self {
        self.deferred.push(decl);
        self
    }
}

/// Deterministic resolver. Declarations without a script resolve cleanly.
#[derive(Debug, Clone, Default)]
pub struct ScriptedResolver {
    scripts: HashMap<DeclId, ResolutionScript>,
    deferred: VecDeque<DeclId>,
    attempts: Vec<DeclId>,
}

impl ScriptedResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(&mut self, decl: DeclId, script: ResolutionScript) -> &mut Self {
        self.scripts.insert(decl, script);
        self
    }

    /// Number of `resolve_function_body` calls made so far
    pub fn attempt_count(&self) -> usize {
        self.attempts.len()
    }

    /// Declarations passed to `resolve_function_body`, in call order
    pub fn attempts(&self) -> &[DeclId] {
        &self.attempts
    }

    pub fn pending_deferred(&self) -> usize {
        self.deferred.len()
    }

    fn resolve(
        &mut self,
        program: &mut Program,
        decl: DeclId,
        diagnostics: &mut DiagnosticEngine,
    ) -> bool {
        let location = program.qualified_name(decl);
        let script = self.scripts.get(&decl).cloned().unwrap_or_default();

        program[decl].advance_stage(ResolutionStage::BodyResolved);

        match script.outcome {
            ResolutionOutcome::Fails => {
                debug!("body resolution of {} failed", location);
                diagnostics.emit(
                    Diagnostic::error("function body could not be resolved").at(location),
                );
                return false;
            }
            ResolutionOutcome::Diagnoses(messages) => {
                for message in messages {
                    diagnostics.emit(Diagnostic::error(message).at(location.as_str()));
                }
            }
            ResolutionOutcome::Succeeds => {}
        }

        let naked = program[decl]
            .body
            .as_ref()
            .is_some_and(contains_naked_asm);
        let resolved = &mut program[decl];
        resolved.naked |= naked;
        resolved.advance_stage(ResolutionStage::FullyResolved);

        self.deferred.extend(script.deferred);
        true
    }
}

impl SemanticResolver for ScriptedResolver {
    fn resolve_function_body(
        &mut self,
        program: &mut Program,
        decl: DeclId,
        diagnostics: &mut DiagnosticEngine,
    ) -> bool {
        self.attempts.push(decl);
        self.resolve(program, decl, diagnostics)
    }

    fn run_deferred(&mut self, program: &mut Program, diagnostics: &mut DiagnosticEngine) {
        while let Some(decl) = self.deferred.pop_front() {
            if program[decl].stage() >= ResolutionStage::FullyResolved {
                continue;
            }
            trace!("running deferred resolution of {}", program.qualified_name(decl));
            self.resolve(program, decl, diagnostics);
        }
    }
}

struct NakedAsmFinder {
    found: bool,
}

impl StoppableVisitor for NakedAsmFinder {
    fn visit_statement(&mut self, stmt: &Statement) -> ControlFlow<()> {
        if let Statement::Asm { naked: true, .. } = stmt {
            self.found = true;
            return ControlFlow::Break(());
        }
        ControlFlow::Continue(())
    }
}

/// Whether the body contains a naked inline assembly block
pub fn contains_naked_asm(body: &FunctionBody) -> bool {
    let mut finder = NakedAsmFinder { found: false };
    let _ = TreeWalker::new().walk_body(body, &mut finder);
    finder.found
}
