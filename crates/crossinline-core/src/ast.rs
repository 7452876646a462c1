//! Function declarations and the statement trees that make up their bodies
//!
//! The frontend owns and builds these objects. The inlining engine only reads
//! them, except for the resolution stage and the `naked` flag which a
//! [`SemanticResolver`](crate::frontend::SemanticResolver) updates.

use serde::{Deserialize, Serialize};

use crate::compilation_unit::{DeclId, UnitId};

/// How far semantic analysis of a declaration has progressed.
///
/// Stages are ordered; a declaration's stage only ever moves forward.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStage {
    #[default]
    Unresolved,
    SignatureResolved,
    MembersResolved,
    /// Body resolution has started.
    BodyResolved,
    FullyResolved,
}

/// Inlining request attached to a function (`pragma(inline, ...)` and friends).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InlineIntent {
    #[default]
    Default,
    Always,
    Never,
}

/// What sort of function a declaration is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclKind {
    #[default]
    Function,
    /// A `unittest` block.
    UnitTest,
    /// A function alias; has no body of its own.
    Alias,
    /// The compiler-synthesized wrapper calling all class invariants.
    Invariant,
}

/// Opaque expression. The tree walker never looks inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Expression(pub String);

impl Expression {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }
}

/// Opaque variable initializer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Initializer(pub Expression);

impl Initializer {
    pub fn new(text: impl Into<String>) -> Self {
        Self(Expression::new(text))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Statement {
    Expression {
        expr: Expression,
    },
    Variable {
        name: String,
        #[serde(default)]
        init: Option<Initializer>,
    },
    /// A nested function declaration. Only its name is kept in the tree; the
    /// declaration itself lives in the [`Program`](crate::Program).
    Function {
        name: String,
    },
    Return {
        #[serde(default)]
        value: Option<Expression>,
    },
    Block {
        #[serde(default)]
        statements: Vec<Statement>,
    },
    If {
        condition: Expression,
        then_branch: Box<Statement>,
        #[serde(default)]
        else_branch: Option<Box<Statement>>,
    },
    While {
        condition: Expression,
        body: Box<Statement>,
    },
    For {
        #[serde(default)]
        init: Option<Box<Statement>>,
        #[serde(default)]
        condition: Option<Expression>,
        #[serde(default)]
        step: Option<Expression>,
        body: Box<Statement>,
    },
    Switch {
        scrutinee: Expression,
        #[serde(default)]
        cases: Vec<Statement>,
    },
    /// `case value:` or, without a value, `default:`.
    Case {
        #[serde(default)]
        value: Option<Expression>,
        #[serde(default)]
        statements: Vec<Statement>,
    },
    Break,
    Continue,
    /// Inline assembly. A `naked` block makes the whole function naked.
    Asm {
        #[serde(default)]
        naked: bool,
        #[serde(default)]
        code: String,
    },
}

impl Statement {
    pub fn expr(text: impl Into<String>) -> Self {
        Statement::Expression {
            expr: Expression::new(text),
        }
    }

    pub fn block(statements: Vec<Statement>) -> Self {
        Statement::Block { statements }
    }

    pub fn if_then(condition: impl Into<String>, then_branch: Statement) -> Self {
        Statement::If {
            condition: Expression::new(condition),
            then_branch: Box::new(then_branch),
            else_branch: None,
        }
    }

    pub fn while_loop(condition: impl Into<String>, body: Statement) -> Self {
        Statement::While {
            condition: Expression::new(condition),
            body: Box::new(body),
        }
    }

    pub fn ret(value: Option<&str>) -> Self {
        Statement::Return {
            value: value.map(Expression::new),
        }
    }

    pub fn naked_asm(code: impl Into<String>) -> Self {
        Statement::Asm {
            naked: true,
            code: code.into(),
        }
    }
}

/// The statements between a function's braces. The braces themselves do not
/// count as a statement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FunctionBody {
    pub statements: Vec<Statement>,
}

impl FunctionBody {
    pub fn new(statements: Vec<Statement>) -> Self {
        Self { statements }
    }

    /// A flat body of `count` expression statements.
    pub fn with_statement_count(count: usize) -> Self {
        Self {
            statements: (0..count)
                .map(|i| Statement::expr(format!("step{}()", i)))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

/// A function declaration as seen by the inlining engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncDeclaration {
    pub name: String,
    /// Unit that owns this declaration.
    pub unit: UnitId,
    pub body: Option<FunctionBody>,
    pub inlining: InlineIntent,
    pub kind: DeclKind,
    /// Lexically enclosing function, if this one is nested.
    pub nesting_parent: Option<DeclId>,
    /// Template instance rather than a plain declaration.
    pub instantiated: bool,
    /// Carries the weak-linkage attribute.
    pub weak: bool,
    /// Body is raw machine code. Only known once the body is resolved.
    pub naked: bool,
    stage: ResolutionStage,
}

impl FuncDeclaration {
    pub fn new(name: impl Into<String>, unit: UnitId) -> Self {
        Self {
            name: name.into(),
            unit,
            body: None,
            inlining: InlineIntent::Default,
            kind: DeclKind::Function,
            nesting_parent: None,
            instantiated: false,
            weak: false,
            naked: false,
            stage: ResolutionStage::Unresolved,
        }
    }

    pub fn with_body(mut self, body: FunctionBody) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_inlining(mut self, inlining: InlineIntent) -> Self {
        self.inlining = inlining;
        self
    }

    pub fn with_kind(mut self, kind: DeclKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn nested_in(mut self, parent: DeclId) -> Self {
        self.nesting_parent = Some(parent);
        self
    }

    pub fn instantiated(mut self) -> Self {
        self.instantiated = true;
        self
    }

    pub fn weak(mut self) -> Self {
        self.weak = true;
        self
    }

    pub fn with_stage(mut self, stage: ResolutionStage) -> Self {
        self.stage = stage;
        self
    }

    pub fn stage(&self) -> ResolutionStage {
        self.stage
    }

    /// Move the declaration forward to `stage`. Requests to move backwards
    /// are ignored.
    pub fn advance_stage(&mut self, stage: ResolutionStage) {
        if stage > self.stage {
            self.stage = stage;
        }
    }

    pub fn is_nested(&self) -> bool {
        self.nesting_parent.is_some()
    }

    pub fn is_unit_test(&self) -> bool {
        self.kind == DeclKind::UnitTest
    }

    pub fn is_alias(&self) -> bool {
        self.kind == DeclKind::Alias
    }

    pub fn is_invariant(&self) -> bool {
        self.kind == DeclKind::Invariant
    }
}
