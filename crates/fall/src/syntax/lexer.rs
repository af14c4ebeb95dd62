//! Lexer for FALL source text.
//!
//! Scanning is total: unterminated strings and unrecognized characters
//! become `TokenKind::Error` tokens carrying their position, so the parser
//! can report diagnostics without the scan ever failing.

use super::token::{keyword, Literal, Token, TokenKind};

pub struct Lexer {
    chars: Vec<char>,
    start: usize,
    current: usize,
    line: u32,
    column: u32,
    start_line: u32,
    start_column: u32,
    tokens: Vec<Token>,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Lexer {
            chars: source.chars().collect(),
            start: 0,
            current: 0,
            line: 1,
            column: 1,
            start_line: 1,
            start_column: 1,
            tokens: Vec::new(),
        }
    }

    /// Scan the whole source into an ordered token sequence ending in EOF.
    pub fn scan(mut self) -> Vec<Token> {
        while !self.at_end(self.current) {
            self.start = self.current;
            self.start_line = self.line;
            self.start_column = self.column;
            self.scan_token();
        }
        self.tokens.push(Token {
            kind: TokenKind::Eof,
            lexeme: String::new(),
            line: self.line,
            column: self.column,
            literal: None,
        });
        self.tokens
    }

    fn scan_token(&mut self) {
        let c = self.advance();

        if let Some(kind) = single_char(c) {
            self.add_token(kind, None);
            return;
        }

        // Two-character tokens win over their single-character prefixes.
        if !self.at_end(self.current) {
            if let Some(kind) = double_char(c, self.peek()) {
                self.advance();
                if kind == TokenKind::Comment {
                    // Comment runs to the end of the line or file.
                    while !self.at_end(self.current) && self.peek() != '\n' {
                        self.advance();
                    }
                }
                self.add_token(kind, None);
                return;
            }
        }

        match c {
            ' ' | '\t' | '\r' => {}
            '\n' => {
                self.add_token(TokenKind::Eol, None);
                self.line += 1;
                self.column = 1;
            }
            ':' => self.add_token(TokenKind::Colon, None),
            '"' => self.string(),
            c if c.is_alphabetic() || c == '_' => self.identifier(),
            c if c.is_ascii_digit() => self.number(),
            other => self.add_token(
                TokenKind::Error,
                Some(Literal::Str(format!("Unexpected character: '{other}'"))),
            ),
        }
    }

    fn string(&mut self) {
        while !self.at_end(self.current) && self.peek() != '"' {
            if self.peek() == '\n' {
                self.line += 1;
                self.column = 0;
            }
            self.advance();
        }

        if self.at_end(self.current) {
            self.add_token(
                TokenKind::Error,
                Some(Literal::Str("Unterminated string".into())),
            );
            return;
        }

        // The closing quote.
        self.advance();

        let value: String = self.chars[self.start + 1..self.current - 1]
            .iter()
            .collect();
        self.add_token(TokenKind::String, Some(Literal::Str(value)));
    }

    fn identifier(&mut self) {
        while !self.at_end(self.current) && is_identifier_char(self.peek()) {
            self.advance();
        }

        let text: String = self.chars[self.start..self.current].iter().collect();
        let kind = keyword(&text.to_uppercase()).unwrap_or(TokenKind::Identifier);
        self.add_token(kind, None);
    }

    fn number(&mut self) {
        while !self.at_end(self.current) && self.peek().is_ascii_digit() {
            self.advance();
        }

        // Fractional part only when a digit follows the dot.
        if !self.at_end(self.current)
            && self.peek() == '.'
            && !self.at_end(self.current + 1)
            && self.peek_next().is_ascii_digit()
        {
            self.advance();
            while !self.at_end(self.current) && self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        let text: String = self.chars[self.start..self.current].iter().collect();
        match text.parse::<f64>() {
            Ok(value) => self.add_token(TokenKind::Number, Some(Literal::Num(value))),
            Err(_) => self.add_token(
                TokenKind::Error,
                Some(Literal::Str(format!("Invalid number: '{text}'"))),
            ),
        }
    }

    fn add_token(&mut self, kind: TokenKind, literal: Option<Literal>) {
        let lexeme: String = self.chars[self.start..self.current].iter().collect();
        self.tokens.push(Token {
            kind,
            lexeme,
            line: self.start_line,
            column: self.start_column,
            literal,
        });
    }

    fn at_end(&self, pos: usize) -> bool {
        pos >= self.chars.len()
    }

    fn peek(&self) -> char {
        self.chars[self.current]
    }

    fn peek_next(&self) -> char {
        self.chars[self.current + 1]
    }

    fn advance(&mut self) -> char {
        let c = self.chars[self.current];
        self.current += 1;
        self.column += 1;
        c
    }
}

fn single_char(c: char) -> Option<TokenKind> {
    let kind = match c {
        '(' => TokenKind::LParen,
        ')' => TokenKind::RParen,
        '[' => TokenKind::LBracket,
        ']' => TokenKind::RBracket,
        ',' => TokenKind::Comma,
        '*' => TokenKind::Asterisk,
        '|' => TokenKind::Pipe,
        _ => return None,
    };
    Some(kind)
}

fn double_char(first: char, second: char) -> Option<TokenKind> {
    let kind = match (first, second) {
        ('-', '>') => TokenKind::Arrow,
        (':', ':') => TokenKind::DoubleColon,
        ('/', '/') => TokenKind::Eol,
        ('!', '-') => TokenKind::Comment,
        _ => return None,
    };
    Some(kind)
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source).scan().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn scans_a_definition_statement() {
        assert_eq!(
            kinds("DEFINE PROPOSITION p AS \"it rains\" //"),
            vec![
                TokenKind::Define,
                TokenKind::Proposition,
                TokenKind::Identifier,
                TokenKind::As,
                TokenKind::String,
                TokenKind::Eol,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn keywords_are_case_insensitive_identifiers_preserve_case() {
        let tokens = Lexer::new("define Socrates").scan();
        assert_eq!(tokens[0].kind, TokenKind::Define);
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].lexeme, "Socrates");
    }

    #[test]
    fn two_character_tokens_win_over_single() {
        assert_eq!(
            kinds("-> :: : , *"),
            vec![
                TokenKind::Arrow,
                TokenKind::DoubleColon,
                TokenKind::Colon,
                TokenKind::Comma,
                TokenKind::Asterisk,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn comment_runs_to_end_of_line() {
        let tokens = Lexer::new("!- anything goes here\np").scan();
        assert_eq!(tokens[0].kind, TokenKind::Comment);
        assert_eq!(tokens[0].lexeme, "!- anything goes here");
        assert_eq!(tokens[1].kind, TokenKind::Eol);
        assert_eq!(tokens[2].kind, TokenKind::Identifier);
    }

    #[test]
    fn unexpected_character_becomes_error_token() {
        let tokens = Lexer::new("p @ q").scan();
        assert_eq!(tokens[1].kind, TokenKind::Error);
        assert_eq!(tokens[1].text(), Some("Unexpected character: '@'"));
        // Scanning continues after the bad character.
        assert_eq!(tokens[2].kind, TokenKind::Identifier);
    }

    #[test]
    fn unterminated_string_becomes_error_token() {
        let tokens = Lexer::new("\"no closing quote").scan();
        assert_eq!(tokens[0].kind, TokenKind::Error);
        assert_eq!(tokens[0].text(), Some("Unterminated string"));
        assert_eq!(tokens[1].kind, TokenKind::Eof);
    }

    #[test]
    fn string_literal_strips_quotes() {
        let tokens = Lexer::new("\"Socrates is a man\"").scan();
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].text(), Some("Socrates is a man"));
    }

    #[test]
    fn numbers_with_optional_fraction() {
        let tokens = Lexer::new("3 2.5 7.").scan();
        assert_eq!(tokens[0].number(), Some(3.0));
        assert_eq!(tokens[1].number(), Some(2.5));
        // "7." is a number followed by a stray dot.
        assert_eq!(tokens[2].number(), Some(7.0));
        assert_eq!(tokens[3].kind, TokenKind::Error);
    }

    #[test]
    fn positions_are_one_based() {
        let tokens = Lexer::new("p\n  q").scan();
        assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
        assert_eq!(tokens[1].kind, TokenKind::Eol);
        assert_eq!((tokens[2].line, tokens[2].column), (2, 3));
    }

    #[test]
    fn statement_terminator_and_newline_both_emit_eol() {
        assert_eq!(
            kinds("p //\nq"),
            vec![
                TokenKind::Identifier,
                TokenKind::Eol,
                TokenKind::Eol,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
    }
}
