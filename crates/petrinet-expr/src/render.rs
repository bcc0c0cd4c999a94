use crate::ast::Expr;

/// Target syntax for infix rendering (`spec.md` §4.3, used by the
/// Grafcet-C++ and CODESYS PLCopen exporters in `petrinet-io`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// `&`, `|` — matches the generated C++ receptivity code.
    C,
    /// `AND`, `OR` — matches IEC 61131-3 structured text.
    StructuredText,
}

impl Dialect {
    fn and_op(self) -> &'static str {
        match self {
            Dialect::C => "&",
            Dialect::StructuredText => "AND",
        }
    }

    fn or_op(self) -> &'static str {
        match self {
            Dialect::C => "|",
            Dialect::StructuredText => "OR",
        }
    }
}

/// Render an `Expr` as a fully-parenthesized infix expression.
///
/// Every `And`/`Or` node is wrapped in parentheses regardless of operator
/// precedence, matching the reference `postfixToInfix` translator, whose
/// worked example (`spec.md` §8 scenario 3) is
/// `"Dcy X14 . foo +"` → `"((Dcy & X14) | foo)"`.
pub fn to_infix(expr: &Expr, dialect: Dialect) -> String {
    match expr {
        Expr::Var(name) => name.clone(),
        Expr::And(l, r) => format!(
            "({} {} {})",
            to_infix(l, dialect),
            dialect.and_op(),
            to_infix(r, dialect)
        ),
        Expr::Or(l, r) => format!(
            "({} {} {})",
            to_infix(l, dialect),
            dialect.or_op(),
            to_infix(r, dialect)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::parse_postfix;

    #[test]
    fn renders_worked_example_in_c_dialect() {
        let expr = parse_postfix("Dcy X14 . foo +").unwrap();
        assert_eq!(to_infix(&expr, Dialect::C), "((Dcy & X14) | foo)");
    }

    #[test]
    fn renders_structured_text_dialect() {
        let expr = parse_postfix("Dcy X14 . foo +").unwrap();
        assert_eq!(
            to_infix(&expr, Dialect::StructuredText),
            "((Dcy AND X14) OR foo)"
        );
    }

    #[test]
    fn single_variable_has_no_parens() {
        let expr = parse_postfix("A").unwrap();
        assert_eq!(to_infix(&expr, Dialect::C), "A");
    }
}
