//! Tokens of the FALL grammar.

use serde::Serialize;
use std::fmt;

/// Kinds of tokens produced by the lexer.
///
/// `Error` is an in-band diagnostic: invalid lexemes become tokens carrying
/// their position and a message, never a failure of the scan itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    // Keywords
    Define,
    Rule,
    Axiom,
    Where,
    As,
    Is,
    And,
    Or,
    Implies,
    Can,
    Be,
    Proposition,
    Assert,
    Begin,
    End,
    Proof,
    Step,
    Infer,
    From,
    Via,
    Given,
    Prove,
    Using,
    Query,

    // Punctuation
    LParen,
    RParen,
    LBracket,
    RBracket,
    Arrow,
    Pipe,
    Comma,
    Colon,
    DoubleColon,
    Asterisk,
    Comment,
    /// Statement terminator: `//` or a newline.
    Eol,

    // Literals
    Identifier,
    String,
    Number,

    // Misc
    Eof,
    Error,
}

/// Look up the keyword kind for an upper-cased lexeme.
pub fn keyword(text: &str) -> Option<TokenKind> {
    let kind = match text {
        "DEFINE" => TokenKind::Define,
        "RULE" => TokenKind::Rule,
        "AXIOM" => TokenKind::Axiom,
        "WHERE" => TokenKind::Where,
        "AS" => TokenKind::As,
        "IS" => TokenKind::Is,
        "AND" => TokenKind::And,
        "OR" => TokenKind::Or,
        "IMPLIES" => TokenKind::Implies,
        "CAN" => TokenKind::Can,
        "BE" => TokenKind::Be,
        "PROPOSITION" => TokenKind::Proposition,
        "ASSERT" => TokenKind::Assert,
        "BEGIN" => TokenKind::Begin,
        "END" => TokenKind::End,
        "PROOF" => TokenKind::Proof,
        "STEP" => TokenKind::Step,
        "INFER" => TokenKind::Infer,
        "FROM" => TokenKind::From,
        "VIA" => TokenKind::Via,
        "GIVEN" => TokenKind::Given,
        "PROVE" => TokenKind::Prove,
        "USING" => TokenKind::Using,
        "QUERY" => TokenKind::Query,
        _ => return None,
    };
    Some(kind)
}

/// Literal value attached to STRING, NUMBER, and ERROR tokens.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Literal {
    Str(String),
    Num(f64),
}

/// A single lexeme with its source position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    /// 1-based source line of the first character.
    pub line: u32,
    /// 1-based source column of the first character.
    pub column: u32,
    pub literal: Option<Literal>,
}

impl Token {
    /// The string payload of a STRING token, or the error message of an
    /// ERROR token.
    pub fn text(&self) -> Option<&str> {
        match &self.literal {
            Some(Literal::Str(s)) => Some(s),
            _ => None,
        }
    }

    /// The numeric payload of a NUMBER token.
    pub fn number(&self) -> Option<f64> {
        match &self.literal {
            Some(Literal::Num(n)) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} {:?} {:?}", self.line, self.column, self.kind, self.lexeme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_lookup_is_exact_on_uppercase() {
        assert_eq!(keyword("DEFINE"), Some(TokenKind::Define));
        assert_eq!(keyword("PROOF"), Some(TokenKind::Proof));
        assert_eq!(keyword("define"), None);
        assert_eq!(keyword("socrates"), None);
    }

    #[test]
    fn token_payload_accessors() {
        let token = Token {
            kind: TokenKind::Number,
            lexeme: "42".into(),
            line: 1,
            column: 1,
            literal: Some(Literal::Num(42.0)),
        };
        assert_eq!(token.number(), Some(42.0));
        assert_eq!(token.text(), None);
    }
}
