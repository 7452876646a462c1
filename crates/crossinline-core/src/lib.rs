//! Frontend object model for crossinline: declarations, compilation units,
//! statement trees, diagnostics and the semantic resolution collaborator

pub mod ast;
pub mod compilation_unit;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod frontend;
pub mod manifest;
pub mod walker;

pub use ast::{
    DeclKind, Expression, FuncDeclaration, FunctionBody, Initializer, InlineIntent,
    ResolutionStage, Statement,
};
pub use compilation_unit::{CompilationUnit, DeclId, Program, UnitId};
pub use config::{InlineConfig, DEFAULT_STATEMENT_THRESHOLD};
pub use diagnostics::{Diagnostic, DiagnosticEngine, Severity, SuppressionScope};
pub use error::CoreError;
pub use frontend::{ResolutionOutcome, ResolutionScript, ScriptedResolver, SemanticResolver};
pub use manifest::{LoadedProgram, ProgramManifest};
pub use walker::{StoppableVisitor, TreeWalker};
