use std::collections::HashMap;

use petrinet_common::NetError;

use crate::tokenizer::{tokenize, Operator, TokenKind};

/// A parsed receptivity expression. Immutable once built; shared
/// subexpressions are rare in practice and need no sharing discipline
/// (`spec.md` §9).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Var(String),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
}

/// Maps variable names to their current boolean value for evaluation.
#[derive(Debug, Clone, Default)]
pub struct Context {
    values: HashMap<String, bool>,
}

impl Context {
    pub fn new() -> Self {
        Context::default()
    }

    pub fn assign(&mut self, name: impl Into<String>, value: bool) {
        self.values.insert(name.into(), value);
    }

    pub fn lookup(&self, name: &str) -> Result<bool, NetError> {
        self.values
            .get(name)
            .copied()
            .ok_or_else(|| NetError::UnknownVariable(name.to_string()))
    }
}

impl FromIterator<(String, bool)> for Context {
    fn from_iter<I: IntoIterator<Item = (String, bool)>>(iter: I) -> Self {
        Context {
            values: iter.into_iter().collect(),
        }
    }
}

impl Expr {
    /// Evaluate against a context; fails with `UnknownVariable` the moment an
    /// undefined variable is looked up (`spec.md` §4.3).
    pub fn evaluate(&self, ctx: &Context) -> Result<bool, NetError> {
        match self {
            Expr::Var(name) => ctx.lookup(name),
            Expr::And(l, r) => Ok(l.evaluate(ctx)? && r.evaluate(ctx)?),
            Expr::Or(l, r) => Ok(l.evaluate(ctx)? || r.evaluate(ctx)?),
        }
    }
}

/// Parse a whitespace-separated postfix boolean expression (`spec.md` §4.3).
///
/// An empty expression parses to the constant `true`, encoded as
/// `Expr::Var("true")` evaluated specially by [`Expr::evaluate`]... no —
/// the empty caption is handled by the caller (`spec.md` §6 says empty
/// caption means "constant true"); this function returns `BadExpression`
/// for genuinely empty input so callers can distinguish "no caption" from
/// "malformed caption" before calling this.
pub fn parse_postfix(input: &str) -> Result<Expr, NetError> {
    let tokens = tokenize(input);
    if tokens.is_empty() {
        return Err(NetError::BadExpression(
            "empty postfix expression".to_string(),
        ));
    }

    let mut stack: Vec<Expr> = Vec::new();
    for token in &tokens {
        match token.kind() {
            TokenKind::Operator(op) => {
                if stack.len() < 2 {
                    return Err(NetError::BadExpression(format!(
                        "operator '{}' at position {} has too few operands",
                        token.text, token.position
                    )));
                }
                // Pop order mirrors the reference postfix evaluator: the
                // most recently pushed operand is `rhs`, the one before it
                // `lhs`, so `a b OP` renders and evaluates as `a OP b`.
                let rhs = stack.pop().unwrap();
                let lhs = stack.pop().unwrap();
                stack.push(match op {
                    Operator::And => Expr::And(Box::new(lhs), Box::new(rhs)),
                    Operator::Or => Expr::Or(Box::new(lhs), Box::new(rhs)),
                });
            }
            TokenKind::Variable => stack.push(Expr::Var(token.text.clone())),
        }
    }

    if stack.len() != 1 {
        return Err(NetError::BadExpression(format!(
            "{} operand(s) left on the stack after parsing",
            stack.len()
        )));
    }
    Ok(stack.pop().unwrap())
}

/// Parse a GRAFCET transition caption (`spec.md` §6): an empty caption is
/// the constant receptivity `true`, anything else is postfix boolean.
pub fn parse_caption(caption: &str) -> Result<Expr, NetError> {
    if caption.trim().is_empty() {
        return Ok(Expr::Var(TRUE_LITERAL.to_string()));
    }
    parse_postfix(caption)
}

/// Sentinel variable name standing for the constant `true`; a [`Context`]
/// used to evaluate a caption parsed via [`parse_caption`] should always
/// bind it (`Context::new()` followed by `ctx.assign(TRUE_LITERAL, true)`),
/// which [`crate::GrafcetContext`] does automatically.
pub const TRUE_LITERAL: &str = "true";
