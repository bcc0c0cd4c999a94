/// The two postfix operators understood by the receptivity language
/// (`spec.md` §4.3): `.` is AND, `+` is OR.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    And,
    Or,
}

impl Operator {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "." => Some(Operator::And),
            "+" => Some(Operator::Or),
            _ => None,
        }
    }
}

/// One lexical token of a postfix receptivity expression: either one of the
/// two operators or a variable name. Position is the token's index in the
/// whitespace-split stream, used only to make `BadExpression` messages
/// locatable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub position: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Operator(Operator),
    Variable,
}

impl Token {
    pub fn kind(&self) -> TokenKind {
        match Operator::from_token(&self.text) {
            Some(op) => TokenKind::Operator(op),
            None => TokenKind::Variable,
        }
    }
}

/// Split a postfix expression into whitespace-delimited tokens.
///
/// An empty (or all-whitespace) caption yields no tokens; the parser
/// interprets that as the constant `true` per `spec.md` §6.
pub fn tokenize(input: &str) -> Vec<Token> {
    input
        .split_whitespace()
        .enumerate()
        .map(|(position, text)| Token {
            text: text.to_string(),
            position,
        })
        .collect()
}
