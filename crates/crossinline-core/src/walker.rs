//! Early-stopping depth-first walker over function bodies
//!
//! Statements are visited in pre-order, source order. Expressions,
//! initializers and nested declarations are handed to the visitor as leaves;
//! the walker never descends into them. Any callback may return
//! [`ControlFlow::Break`], after which nothing else is visited.
//!
//! The walk uses an explicit stack, so deeply nested bodies cannot overflow
//! the call stack.

use std::ops::ControlFlow;

use crate::ast::{Expression, FunctionBody, Initializer, Statement};

/// Callbacks invoked by [`TreeWalker`]. Only statements must be handled;
/// the other node kinds default to no-ops.
pub trait StoppableVisitor {
    fn visit_statement(&mut self, stmt: &Statement) -> ControlFlow<()>;

    fn visit_expression(&mut self, _expr: &Expression) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    /// Nested function declaration, identified by name
    fn visit_declaration(&mut self, _name: &str) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    fn visit_initializer(&mut self, _init: &Initializer) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

#[derive(Debug, Clone, Copy)]
enum Node<'a> {
    Statement(&'a Statement),
    Expression(&'a Expression),
    Declaration(&'a str),
    Initializer(&'a Initializer),
}

/// Walks statement trees, feeding every node to a [`StoppableVisitor`].
pub struct TreeWalker<'a> {
    stack: Vec<Node<'a>>,
    scratch: Vec<Node<'a>>,
}

impl<'a> TreeWalker<'a> {
    pub fn new() -> Self {
        Self {
            stack: Vec::new(),
            scratch: Vec::new(),
        }
    }

    /// Walk every top-level statement of `body` in order.
    pub fn walk_body<V>(&mut self, body: &'a FunctionBody, visitor: &mut V) -> ControlFlow<()>
    where
        V: StoppableVisitor + ?Sized,
    {
        self.stack.clear();
        self.stack
            .extend(body.statements.iter().rev().map(Node::Statement));
        self.drain(visitor)
    }

    /// Walk a single statement and everything below it.
    pub fn walk_statement<V>(&mut self, stmt: &'a Statement, visitor: &mut V) -> ControlFlow<()>
    where
        V: StoppableVisitor + ?Sized,
    {
        self.stack.clear();
        self.stack.push(Node::Statement(stmt));
        self.drain(visitor)
    }

    fn drain<V>(&mut self, visitor: &mut V) -> ControlFlow<()>
    where
        V: StoppableVisitor + ?Sized,
    {
        while let Some(node) = self.stack.pop() {
            match node {
                Node::Statement(stmt) => {
                    visitor.visit_statement(stmt)?;
                    self.push_children(stmt);
                }
                Node::Expression(expr) => visitor.visit_expression(expr)?,
                Node::Declaration(name) => visitor.visit_declaration(name)?,
                Node::Initializer(init) => visitor.visit_initializer(init)?,
            }
        }
        ControlFlow::Continue(())
    }

    /// Queue the children of `stmt` so they pop off the stack in source order.
    fn push_children(&mut self, stmt: &'a Statement) {
        let children = &mut self.scratch;
        children.clear();

        match stmt {
            Statement::Expression { expr } => children.push(Node::Expression(expr)),
            Statement::Variable { init, .. } => {
                children.extend(init.as_ref().map(Node::Initializer));
            }
            Statement::Function { name } => children.push(Node::Declaration(name)),
            Statement::Return { value } => {
                children.extend(value.as_ref().map(Node::Expression));
            }
            Statement::Block { statements } => {
                children.extend(statements.iter().map(Node::Statement));
            }
            Statement::If {
                condition,
                then_branch,
                else_branch,
            } => {
                children.push(Node::Expression(condition));
                children.push(Node::Statement(then_branch));
                children.extend(else_branch.as_deref().map(Node::Statement));
            }
            Statement::While { condition, body } => {
                children.push(Node::Expression(condition));
                children.push(Node::Statement(body));
            }
            Statement::For {
                init,
                condition,
                step,
                body,
            } => {
                children.extend(init.as_deref().map(Node::Statement));
                children.extend(condition.as_ref().map(Node::Expression));
                children.extend(step.as_ref().map(Node::Expression));
                children.push(Node::Statement(body));
            }
            Statement::Switch { scrutinee, cases } => {
                children.push(Node::Expression(scrutinee));
                children.extend(cases.iter().map(Node::Statement));
            }
            Statement::Case { value, statements } => {
                children.extend(value.as_ref().map(Node::Expression));
                children.extend(statements.iter().map(Node::Statement));
            }
            Statement::Break | Statement::Continue | Statement::Asm { .. } => {}
        }

        self.stack.extend(children.drain(..).rev());
    }
}

impl Default for TreeWalker<'_> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Records a label for every node, stopping after `limit` statements.
    struct Recorder {
        seen: Vec<String>,
        statements: usize,
        limit: usize,
    }

    impl Recorder {
        fn new(limit: usize) -> Self {
            Self {
                seen: Vec::new(),
                statements: 0,
                limit,
            }
        }
    }

    impl StoppableVisitor for Recorder {
        fn visit_statement(&mut self, stmt: &Statement) -> ControlFlow<()> {
            let label = match stmt {
                Statement::Expression { expr } => format!("stmt:{}", expr.0),
                Statement::Block { .. } => "stmt:block".to_string(),
                Statement::If { .. } => "stmt:if".to_string(),
                Statement::While { .. } => "stmt:while".to_string(),
                Statement::Return { .. } => "stmt:return".to_string(),
                Statement::Variable { name, .. } => format!("stmt:var {}", name),
                Statement::Function { .. } => "stmt:fn".to_string(),
                other => format!("stmt:{:?}", other),
            };
            self.seen.push(label);
            self.statements += 1;
            if self.statements >= self.limit {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        }

        fn visit_expression(&mut self, expr: &Expression) -> ControlFlow<()> {
            self.seen.push(format!("expr:{}", expr.0));
            ControlFlow::Continue(())
        }

        fn visit_declaration(&mut self, name: &str) -> ControlFlow<()> {
            self.seen.push(format!("decl:{}", name));
            ControlFlow::Continue(())
        }

        fn visit_initializer(&mut self, init: &Initializer) -> ControlFlow<()> {
            self.seen.push(format!("init:{}", init.0 .0));
            ControlFlow::Continue(())
        }
    }

    fn sample_body() -> FunctionBody {
        FunctionBody::new(vec![
            Statement::Variable {
                name: "x".to_string(),
                init: Some(Initializer::new("1")),
            },
            Statement::if_then(
                "x > 0",
                Statement::block(vec![Statement::expr("a()"), Statement::expr("b()")]),
            ),
            Statement::Function {
                name: "helper".to_string(),
            },
            Statement::ret(Some("x")),
        ])
    }

    #[test]
    fn test_preorder_source_order() {
        let body = sample_body();
        let mut recorder = Recorder::new(usize::MAX);
        let flow = TreeWalker::new().walk_body(&body, &mut recorder);

        assert_eq!(flow, ControlFlow::Continue(()));
        assert_eq!(
            recorder.seen,
            vec![
                "stmt:var x",
                "init:1",
                "stmt:if",
                "expr:x > 0",
                "stmt:block",
                "stmt:a()",
                "expr:a()",
                "stmt:b()",
                "expr:b()",
                "stmt:fn",
                "decl:helper",
                "stmt:return",
                "expr:x",
            ]
        );
    }

    #[test]
    fn test_stop_skips_children_and_siblings() {
        let body = sample_body();
        // Stops on the block: neither its children nor the statements after
        // the enclosing `if` are visited.
        let mut recorder = Recorder::new(3);
        let flow = TreeWalker::new().walk_body(&body, &mut recorder);

        assert_eq!(flow, ControlFlow::Break(()));
        assert_eq!(
            recorder.seen,
            vec!["stmt:var x", "init:1", "stmt:if", "expr:x > 0", "stmt:block"]
        );
    }

    #[test]
    fn test_walk_single_statement() {
        let stmt = Statement::while_loop("running", Statement::expr("tick()"));
        let mut recorder = Recorder::new(usize::MAX);
        let _ = TreeWalker::new().walk_statement(&stmt, &mut recorder);
        assert_eq!(
            recorder.seen,
            vec!["stmt:while", "expr:running", "stmt:tick()", "expr:tick()"]
        );
    }

    #[test]
    fn test_walker_is_reusable_after_stop() {
        let body = sample_body();
        let mut walker = TreeWalker::new();

        let mut first = Recorder::new(1);
        let _ = walker.walk_body(&body, &mut first);
        assert_eq!(first.seen, vec!["stmt:var x"]);

        let mut second = Recorder::new(usize::MAX);
        let _ = walker.walk_body(&body, &mut second);
        assert_eq!(second.statements, 7);
    }

    #[test]
    fn test_deep_nesting_does_not_recurse() {
        let mut stmt = Statement::expr("leaf()");
        for _ in 0..100_000 {
            stmt = Statement::block(vec![stmt]);
        }
        let mut recorder = Recorder::new(usize::MAX);
        let _ = TreeWalker::new().walk_statement(&stmt, &mut recorder);
        assert_eq!(recorder.statements, 100_001);
        // Dropping a 100k-deep Box chain recurses; leak it instead.
        std::mem::forget(stmt);
    }
}
