//! Recursive-descent parser for FALL programs.
//!
//! One malformed statement is never fatal: the statement loop records a
//! diagnostic and resynchronizes at the next statement boundary, so a
//! program with a bad statement between two good ones still yields both
//! good ones.

use std::fmt;

use tracing::warn;

use super::ast::{
    Assertion, AxiomDefinition, Condition, Program, Proof, ProofStep,
    PropositionDefinition, Query, RuleDefinition, Statement, StepAction,
};
use super::token::{Token, TokenKind};
use indexmap::IndexMap;

/// A grammar mismatch: what was expected and what was found, with position.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub found: TokenKind,
    pub line: u32,
    pub column: u32,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}, found {:?}",
            self.line, self.column, self.message, self.found
        )
    }
}

impl std::error::Error for ParseError {}

pub struct Parser<'a> {
    tokens: &'a [Token],
    current: usize,
    errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Parser {
            tokens,
            current: 0,
            errors: Vec::new(),
        }
    }

    /// Parse the token stream into a program, dropping malformed statements.
    pub fn parse(&mut self) -> Program {
        let mut statements = Vec::new();

        while !self.at_end() {
            match self.declaration() {
                Ok(Some(statement)) => statements.push(statement),
                Ok(None) => {}
                Err(error) => {
                    warn!(%error, "discarding malformed statement");
                    self.errors.push(error);
                    self.synchronize();
                }
            }
        }

        Program { statements }
    }

    /// Diagnostics collected while parsing, one per discarded statement.
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    fn declaration(&mut self) -> Result<Option<Statement>, ParseError> {
        while self.check(TokenKind::Eol) || self.check(TokenKind::Comment) {
            self.advance();
        }
        if self.at_end() {
            return Ok(None);
        }

        if self.matches(TokenKind::Define) {
            return self.definition().map(Some);
        }
        if self.matches(TokenKind::Assert) {
            return self.assertion().map(Some);
        }
        if self.matches(TokenKind::Begin) {
            self.consume(TokenKind::Proof, "Expected PROOF after BEGIN")?;
            return self.proof().map(Some);
        }
        if self.matches(TokenKind::Query) {
            return self.query().map(Some);
        }

        Err(self.error("Expected declaration"))
    }

    fn definition(&mut self) -> Result<Statement, ParseError> {
        if self.matches(TokenKind::Rule) {
            return self.rule_definition().map(Statement::Rule);
        }
        if self.matches(TokenKind::Axiom) {
            return self.axiom_definition().map(Statement::Axiom);
        }
        if self.matches(TokenKind::Proposition) {
            return self.proposition_definition().map(Statement::Proposition);
        }

        Err(self.error("Expected RULE, AXIOM, or PROPOSITION"))
    }

    fn rule_definition(&mut self) -> Result<RuleDefinition, ParseError> {
        let name = self
            .consume(TokenKind::Identifier, "Expected rule name")?
            .lexeme
            .clone();
        let conditions = self.conditions()?;
        Ok(RuleDefinition { name, conditions })
    }

    fn axiom_definition(&mut self) -> Result<AxiomDefinition, ParseError> {
        let name = self
            .consume(TokenKind::Identifier, "Expected axiom name")?
            .lexeme
            .clone();
        self.consume(TokenKind::Where, "Expected WHERE after axiom name")?;

        // A single condition running to the end of the line, with TRUE/FALSE
        // normalized to the bridge's literal spelling.
        let expression = normalize_truth_words(&self.expression_text(&[]));
        let conditions = vec![Condition { expression }];

        self.consume(TokenKind::Eol, "Expected end of line after conditions")?;
        Ok(AxiomDefinition { name, conditions })
    }

    fn proposition_definition(&mut self) -> Result<PropositionDefinition, ParseError> {
        let name = self
            .consume(TokenKind::Identifier, "Expected proposition name")?
            .lexeme
            .clone();
        self.consume(TokenKind::As, "Expected AS after proposition name")?;
        let text = self
            .consume(TokenKind::String, "Expected string for proposition text")?
            .text()
            .unwrap_or_default()
            .to_string();
        let structure = self.structure()?;
        Ok(PropositionDefinition {
            name,
            text,
            structure,
        })
    }

    fn conditions(&mut self) -> Result<Vec<Condition>, ParseError> {
        let mut conditions = Vec::new();
        self.consume(TokenKind::Where, "Expected WHERE after name")?;

        conditions.push(Condition {
            expression: self.expression_text(&[TokenKind::And]),
        });
        while self.matches(TokenKind::And) {
            conditions.push(Condition {
                expression: self.expression_text(&[TokenKind::And]),
            });
        }

        self.consume(TokenKind::Eol, "Expected end of line after conditions")?;
        Ok(conditions)
    }

    fn structure(&mut self) -> Result<IndexMap<String, String>, ParseError> {
        let mut structure = IndexMap::new();
        self.consume(TokenKind::Where, "Expected WHERE after text")?;

        loop {
            let key = self
                .consume(TokenKind::String, "Expected string key")?
                .text()
                .unwrap_or_default()
                .to_string();
            self.consume(TokenKind::Is, "Expected IS after key")?;
            let value = self.expression_text(&[TokenKind::And]);
            structure.insert(key, value);

            if !self.matches(TokenKind::And) {
                break;
            }
        }

        self.consume(TokenKind::Eol, "Expected end of line after structure")?;
        Ok(structure)
    }

    fn assertion(&mut self) -> Result<Statement, ParseError> {
        let expression = self.expression_text(&[]);
        self.consume(TokenKind::Eol, "Expected end of line after assertion")?;
        Ok(Statement::Assertion(Assertion { expression }))
    }

    fn proof(&mut self) -> Result<Statement, ParseError> {
        self.skip_eols();

        let mut given = Vec::new();
        while self.matches(TokenKind::Given) {
            given.push(
                self.consume(
                    TokenKind::Identifier,
                    "Expected proposition identifier after GIVEN",
                )?
                .lexeme
                .clone(),
            );
            self.skip_eols();
        }

        self.consume(TokenKind::Prove, "Expected PROVE in proof")?;
        let prove = self
            .consume(TokenKind::Identifier, "Expected proposition identifier")?
            .lexeme
            .clone();
        self.skip_eols();

        self.consume(TokenKind::Using, "Expected USING after PROVE")?;
        let mut using = Vec::new();
        using.push(
            self.consume(TokenKind::Identifier, "Expected identifier after USING")?
                .lexeme
                .clone(),
        );
        while self.matches(TokenKind::Comma) {
            using.push(
                self.consume(TokenKind::Identifier, "Expected identifier after comma")?
                    .lexeme
                    .clone(),
            );
        }
        self.skip_eols();

        let mut steps = Vec::new();
        while self.matches(TokenKind::Step) {
            steps.push(self.proof_step()?);
            self.skip_eols();
        }

        self.consume(TokenKind::End, "Expected END")?;
        self.consume(TokenKind::Proof, "Expected PROOF after END")?;
        self.skip_eols();

        Ok(Statement::Proof(Proof {
            given,
            prove,
            using,
            steps,
        }))
    }

    fn proof_step(&mut self) -> Result<ProofStep, ParseError> {
        let number = self
            .consume(TokenKind::Number, "Expected step number")?
            .number()
            .unwrap_or_default() as u32;
        self.consume(TokenKind::Colon, "Expected colon after step number")?;

        let mut sources = Vec::new();
        let mut via = None;

        let action = if self.matches(TokenKind::Assert) {
            StepAction::Assert(self.expression_text(&[]))
        } else if self.matches(TokenKind::Infer) {
            let name = self
                .consume(
                    TokenKind::Identifier,
                    "Expected proposition identifier after INFER",
                )?
                .lexeme
                .clone();

            if self.matches(TokenKind::From) {
                self.consume(TokenKind::LBracket, "Expected [ after FROM")?;
                sources.push(
                    self.consume(TokenKind::Identifier, "Expected identifier")?
                        .lexeme
                        .clone(),
                );
                while self.matches(TokenKind::Comma) {
                    sources.push(
                        self.consume(
                            TokenKind::Identifier,
                            "Expected identifier after comma",
                        )?
                        .lexeme
                        .clone(),
                    );
                }
                self.consume(TokenKind::RBracket, "Expected ] after sources")?;
            }

            if self.matches(TokenKind::Via) {
                via = Some(
                    self.consume(TokenKind::Identifier, "Expected axiom name after VIA")?
                        .lexeme
                        .clone(),
                );
            }

            StepAction::Infer(name)
        } else {
            return Err(self.error("Expected ASSERT or INFER in step"));
        };

        Ok(ProofStep {
            number,
            action,
            sources,
            via,
        })
    }

    fn query(&mut self) -> Result<Statement, ParseError> {
        let proposition = self
            .consume(TokenKind::Identifier, "Expected proposition identifier")?
            .lexeme
            .clone();
        self.consume(TokenKind::Eol, "Expected end of line after query")?;
        Ok(Statement::Query(Query { proposition }))
    }

    /// Capture raw lexemes joined by spaces until EOL, EOF, or one of the
    /// given stop kinds. Comments are skipped, not captured.
    fn expression_text(&mut self, stop: &[TokenKind]) -> String {
        let mut lexemes: Vec<String> = Vec::new();
        while !self.check(TokenKind::Eol)
            && !self.at_end()
            && !stop.contains(&self.peek().kind)
        {
            let token = self.advance();
            if token.kind != TokenKind::Comment {
                lexemes.push(token.lexeme.clone());
            }
        }
        lexemes.join(" ")
    }

    /// Discard tokens until the next statement boundary.
    fn synchronize(&mut self) {
        self.advance();

        while !self.at_end() {
            if self.previous().kind == TokenKind::Eol {
                return;
            }
            if matches!(
                self.peek().kind,
                TokenKind::Define | TokenKind::Assert | TokenKind::Begin | TokenKind::Query
            ) {
                return;
            }
            self.advance();
        }
    }

    fn skip_eols(&mut self) {
        while self.check(TokenKind::Eol) {
            self.advance();
        }
    }

    fn at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current - 1]
    }

    fn advance(&mut self) -> &Token {
        if !self.at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn check(&self, kind: TokenKind) -> bool {
        !self.at_end() && self.peek().kind == kind
    }

    fn matches(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            return true;
        }
        false
    }

    fn consume(&mut self, kind: TokenKind, message: &str) -> Result<&Token, ParseError> {
        if self.check(kind) {
            return Ok(self.advance());
        }
        Err(self.error(message))
    }

    fn error(&self, message: &str) -> ParseError {
        let token = self.peek();
        ParseError {
            message: message.to_string(),
            found: token.kind,
            line: token.line,
            column: token.column,
        }
    }
}

/// Normalize the words TRUE/FALSE (any case) to the spelling the logic
/// bridge recognizes as truth literals.
fn normalize_truth_words(expression: &str) -> String {
    expression
        .split_whitespace()
        .map(|word| {
            if word.eq_ignore_ascii_case("TRUE") {
                "true"
            } else if word.eq_ignore_ascii_case("FALSE") {
                "false"
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
