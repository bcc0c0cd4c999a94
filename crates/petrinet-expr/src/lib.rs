//! The postfix boolean receptivity language used by GRAFCET transitions
//! (`spec.md` §4.3).
//!
//! A caption is tokenized, parsed into an immutable [`ast::Expr`] tree, and
//! evaluated against a [`ast::Context`] of named booleans. [`render`] turns
//! the same tree back into infix text for the Grafcet-C++ and CODESYS
//! exporters.

pub mod ast;
pub mod render;
pub mod tokenizer;

pub use ast::{parse_caption, parse_postfix, Context, Expr, TRUE_LITERAL};
pub use render::{to_infix, Dialect};

/// A [`Context`] that pre-binds [`TRUE_LITERAL`], the sentinel variable an
/// empty caption parses to. Use this instead of a bare `Context::new()`
/// whenever the expression being evaluated might have come from
/// [`parse_caption`] on a possibly-empty string.
#[derive(Debug, Clone, Default)]
pub struct GrafcetContext(Context);

impl GrafcetContext {
    pub fn new() -> Self {
        let mut ctx = Context::new();
        ctx.assign(TRUE_LITERAL, true);
        GrafcetContext(ctx)
    }

    pub fn assign(&mut self, name: impl Into<String>, value: bool) {
        self.0.assign(name, value);
    }

    pub fn inner(&self) -> &Context {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grafcet_context_resolves_empty_caption() {
        let expr = parse_caption("").unwrap();
        let ctx = GrafcetContext::new();
        assert!(expr.evaluate(ctx.inner()).unwrap());
    }
}
