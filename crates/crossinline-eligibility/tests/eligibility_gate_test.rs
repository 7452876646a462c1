//! End-to-end behaviour of the eligibility gate against a scripted frontend

use crossinline_core::{
    CompilationUnit, DeclId, DeclKind, DiagnosticEngine, FuncDeclaration, FunctionBody,
    InlineConfig, InlineIntent, Program, ResolutionScript, ResolutionStage, ScriptedResolver,
    Statement, UnitId,
};
use crossinline_eligibility::{EligibilityGate, Ineligibility, Verdict};
use pretty_assertions::assert_eq;

struct Session {
    program: Program,
    resolver: ScriptedResolver,
    diagnostics: DiagnosticEngine,
    app: UnitId,
    imported: UnitId,
}

impl Session {
    fn new() -> Self {
        let mut program = Program::new();
        let app = program.add_unit(CompilationUnit::new("app").root());
        let imported = program.add_unit(CompilationUnit::new("std.algorithm"));
        Self {
            program,
            resolver: ScriptedResolver::new(),
            diagnostics: DiagnosticEngine::new(),
            app,
            imported,
        }
    }

    fn add(&mut self, decl: FuncDeclaration) -> DeclId {
        self.program.add_declaration(decl)
    }

    fn evaluate(&mut self, gate: &EligibilityGate, decl: DeclId) -> Verdict {
        gate.evaluate(
            &mut self.program,
            &mut self.resolver,
            &mut self.diagnostics,
            decl,
        )
    }
}

fn small(name: &str, unit: UnitId) -> FuncDeclaration {
    FuncDeclaration::new(name, unit).with_body(FunctionBody::with_statement_count(2))
}

fn ineligible(reason: Ineligibility) -> Verdict {
    Verdict::Ineligible(reason)
}

#[test]
fn test_small_root_function_is_eligible_and_resolved() {
    let mut s = Session::new();
    let f = s.add(small("clamp", s.app));
    let gate = EligibilityGate::default();

    assert_eq!(s.evaluate(&gate, f), Verdict::Eligible);
    assert_eq!(s.program[f].stage(), ResolutionStage::FullyResolved);
    assert_eq!(s.resolver.attempts(), &[f]);
}

#[test]
fn test_non_root_plain_function_never_attempts_resolution() {
    let mut s = Session::new();
    let f = s.add(small("max", s.imported));
    let gate = EligibilityGate::default();

    assert_eq!(s.evaluate(&gate, f), ineligible(Ineligibility::DefinedElsewhere));
    assert_eq!(s.resolver.attempt_count(), 0);
    assert_eq!(s.program[f].stage(), ResolutionStage::Unresolved);
}

#[test]
fn test_template_instance_from_non_root_unit_is_eligible() {
    let mut s = Session::new();
    let f = s.add(small("max!int", s.imported).instantiated());
    let gate = EligibilityGate::default();

    assert_eq!(s.evaluate(&gate, f), Verdict::Eligible);
}

#[test]
fn test_same_input_same_verdict_then_already_resolved() {
    let mut s = Session::new();
    let f = s.add(small("clamp", s.app));
    let gate = EligibilityGate::default();

    let mut twin = Session {
        program: s.program.clone(),
        resolver: s.resolver.clone(),
        diagnostics: DiagnosticEngine::new(),
        app: s.app,
        imported: s.imported,
    };
    let first = s.evaluate(&gate, f);
    assert_eq!(twin.evaluate(&gate, f), first);
    assert_eq!(first, Verdict::Eligible);

    // The first call resolved the function; it is now defined the regular way.
    assert_eq!(s.program[f].stage(), ResolutionStage::FullyResolved);
    assert_eq!(s.evaluate(&gate, f), ineligible(Ineligibility::AlreadyResolved));
    assert_eq!(s.resolver.attempt_count(), 1);
}

#[test]
fn test_speculative_errors_never_reach_the_user() {
    let mut s = Session::new();
    let f = s.add(small("parse", s.app));
    s.resolver.script(
        f,
        ResolutionScript::diagnoses(&["forward reference to `Token`"]),
    );
    let gate = EligibilityGate::default();

    assert_eq!(
        s.evaluate(&gate, f),
        ineligible(Ineligibility::SuppressedErrors { count: 1 })
    );
    assert!(s.diagnostics.reported().is_empty());
    assert_eq!(s.diagnostics.error_count(), 0);
    assert_eq!(s.diagnostics.total_suppressed(), 1);
    assert!(!s.diagnostics.is_suppressed());
}

#[test]
fn test_failed_resolution_is_silent_and_keeps_partial_progress() {
    let mut s = Session::new();
    let f = s.add(small("parse", s.app));
    s.resolver.script(f, ResolutionScript::fails());
    let gate = EligibilityGate::default();

    assert_eq!(s.evaluate(&gate, f), ineligible(Ineligibility::ResolutionFailed));
    assert!(!s.diagnostics.has_errors());
    assert_eq!(s.program[f].stage(), ResolutionStage::BodyResolved);
    assert_eq!(s.evaluate(&gate, f), ineligible(Ineligibility::AlreadyResolved));
}

#[test]
fn test_errors_outside_the_attempt_are_still_reported() {
    let mut s = Session::new();
    let f = s.add(small("parse", s.app));
    s.resolver.script(f, ResolutionScript::diagnoses(&["bad cast"]));
    let gate = EligibilityGate::default();

    let _ = s.evaluate(&gate, f);
    s.diagnostics
        .emit(crossinline_core::Diagnostic::error("real error"));
    assert_eq!(s.diagnostics.error_count(), 1);
}

#[test]
fn test_weak_functions_are_never_eligible() {
    let mut s = Session::new();
    let plain = s.add(small("hook", s.app).weak());
    let always = s.add(
        small("hook_always", s.app)
            .weak()
            .with_inlining(InlineIntent::Always),
    );
    let gate = EligibilityGate::default();

    assert_eq!(s.evaluate(&gate, plain), ineligible(Ineligibility::WeakLinkage));
    assert_eq!(s.evaluate(&gate, always), ineligible(Ineligibility::WeakLinkage));
    assert_eq!(s.resolver.attempt_count(), 0);
}

#[test]
fn test_statement_threshold_boundary() {
    let mut s = Session::new();
    let ten = s.add(
        FuncDeclaration::new("ten", s.app).with_body(FunctionBody::with_statement_count(10)),
    );
    let eleven = s.add(
        FuncDeclaration::new("eleven", s.app).with_body(FunctionBody::with_statement_count(11)),
    );
    let eleven_always = s.add(
        FuncDeclaration::new("eleven_always", s.app)
            .with_body(FunctionBody::with_statement_count(11))
            .with_inlining(InlineIntent::Always),
    );
    let gate = EligibilityGate::new(InlineConfig::default().with_statement_threshold(10));

    assert_eq!(s.evaluate(&gate, ten), Verdict::Eligible);
    assert_eq!(
        s.evaluate(&gate, eleven),
        ineligible(Ineligibility::TooManyStatements { threshold: 10 })
    );
    assert_eq!(s.resolver.attempts(), &[ten]);

    assert_eq!(s.evaluate(&gate, eleven_always), Verdict::Eligible);
    assert_eq!(s.resolver.attempts(), &[ten, eleven_always]);
}

#[test]
fn test_unit_test_is_rejected_without_resolution() {
    let mut s = Session::new();
    let f = s.add(
        FuncDeclaration::new("__unittest_L12", s.app)
            .with_kind(DeclKind::UnitTest)
            .with_body(FunctionBody::with_statement_count(1)),
    );
    let gate = EligibilityGate::default();

    assert_eq!(s.evaluate(&gate, f), ineligible(Ineligibility::UnitTest));
    assert_eq!(s.resolver.attempt_count(), 0);
}

#[test]
fn test_structural_disqualifiers() {
    let mut s = Session::new();
    let alias = s.add(FuncDeclaration::new("each", s.app).with_kind(DeclKind::Alias));
    let bodiless = s.add(FuncDeclaration::new("extern_fn", s.app));
    let invariant = s.add(small("__invariant", s.app).with_kind(DeclKind::Invariant));
    let never = s.add(small("cold", s.app).with_inlining(InlineIntent::Never));
    let gate = EligibilityGate::default();

    assert_eq!(s.evaluate(&gate, alias), ineligible(Ineligibility::Alias));
    assert_eq!(s.evaluate(&gate, bodiless), ineligible(Ineligibility::NoBody));
    assert_eq!(
        s.evaluate(&gate, invariant),
        ineligible(Ineligibility::InvariantWrapper)
    );
    assert_eq!(s.evaluate(&gate, never), ineligible(Ineligibility::NeverInline));
    assert_eq!(s.resolver.attempt_count(), 0);
}

#[test]
fn test_runtime_root_unit_is_excluded() {
    let mut s = Session::new();
    let object = s.program.add_unit(CompilationUnit::new("object").root());
    let f = s.add(small("opEquals", object));
    let gate = EligibilityGate::default();

    assert_eq!(s.evaluate(&gate, f), ineligible(Ineligibility::RuntimeRootUnit));
}

#[test]
fn test_nested_function_resolved_with_its_parent_is_excluded() {
    let mut s = Session::new();
    let outer = s.add(small("outer", s.app));
    let inner = s.add(
        small("inner", s.app)
            .nested_in(outer)
            .with_stage(ResolutionStage::BodyResolved),
    );
    let gate = EligibilityGate::default();

    assert_eq!(s.evaluate(&gate, inner), ineligible(Ineligibility::AlreadyResolved));
}

#[test]
fn test_nested_function_inherits_parent_locality() {
    let mut s = Session::new();
    let outer = s.add(small("sort", s.imported));
    let inner = s.add(small("less", s.imported).instantiated().nested_in(outer));
    let gate = EligibilityGate::default();

    assert_eq!(s.evaluate(&gate, inner), ineligible(Ineligibility::DefinedElsewhere));
}

#[test]
fn test_naked_function_rejected_after_resolution() {
    let mut s = Session::new();
    let f = s.add(
        FuncDeclaration::new("syscall", s.app)
            .with_body(FunctionBody::new(vec![Statement::naked_asm("syscall; ret;")])),
    );
    let gate = EligibilityGate::default();

    assert_eq!(s.evaluate(&gate, f), ineligible(Ineligibility::Naked));
    assert_eq!(s.resolver.attempt_count(), 1);
    assert_eq!(s.program[f].stage(), ResolutionStage::FullyResolved);
}

#[test]
fn test_disabled_configuration() {
    let mut s = Session::new();
    let plain = s.add(small("plain", s.app));
    let always = s.add(small("always", s.app).with_inlining(InlineIntent::Always));

    let off = EligibilityGate::new(InlineConfig::default().with_cross_module_inlining(false));
    assert_eq!(
        s.evaluate(&off, always),
        ineligible(Ineligibility::CrossModuleInliningDisabled)
    );

    let no_opt = EligibilityGate::new(InlineConfig::default().with_optimizer_inlining(false));
    assert_eq!(
        s.evaluate(&no_opt, plain),
        ineligible(Ineligibility::OptimizerInliningDisabled)
    );
    assert_eq!(s.resolver.attempt_count(), 0);

    assert_eq!(s.evaluate(&no_opt, always), Verdict::Eligible);
}

#[test]
fn test_is_eligible_matches_evaluate() {
    let mut s = Session::new();
    let f = s.add(small("clamp", s.app));
    let g = s.add(small("max", s.imported));
    let gate = EligibilityGate::default();

    assert!(gate.is_eligible(&mut s.program, &mut s.resolver, &mut s.diagnostics, f));
    assert!(!gate.is_eligible(&mut s.program, &mut s.resolver, &mut s.diagnostics, g));
}
