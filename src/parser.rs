use crate::ast::{Program, Statement, Token};
use crate::error::{BoiError, Span};
use crate::lexer::Lexer;
use std::rc::Rc;
use tracing::trace;

pub struct Parser {
    lexer: Lexer,
}

#[derive(Clone, Copy)]
enum BlockKind {
    Conditional,
    Loop,
    FunctionDefinition,
}

impl Parser {
    pub fn new(lexer: Lexer) -> Self {
        Self { lexer }
    }

    pub fn from_source(source: impl Into<Vec<u8>>) -> Self {
        Self::new(Lexer::new(source))
    }

    /// Parses the whole input without executing it.
    ///
    /// A `BOI` at top level closes nothing and is skipped, as it is at run time.
    pub fn parse(&mut self) -> Result<Program, BoiError> {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            if let Some(statement) = self.parse_statement()? {
                statements.push(statement);
            }
        }

        Ok(Program { statements })
    }

    /// True when only whitespace and comments remain.
    pub fn is_at_end(&mut self) -> bool {
        self.lexer.skip_trivia()
    }

    /// Reads one statement. `None` means the block terminator `BOI` was read.
    pub fn parse_statement(&mut self) -> Result<Option<Statement>, BoiError> {
        if self.lexer.skip_trivia() {
            return Err(BoiError::unexpected_end_of_input(self.lexer.position()));
        }

        let start = self.lexer.position();
        let keyword = self.lexer.peek_word().to_vec();

        let statement = match keyword.as_slice() {
            b"boi!" => {
                self.lexer.advance_by(keyword.len());
                let tokens = self.statement_tokens()?;
                Statement::Call {
                    tokens,
                    span: self.span_from(start),
                }
            }
            b"boi," => self.shorthand(&keyword, "say", start)?,
            b"boi:" => self.shorthand(&keyword, "set", start)?,
            b"one" | b"ONE" => self.shorthand(&keyword, "declare", start)?,
            b"boi?" => self.block_statement(&keyword, BlockKind::Conditional, start)?,
            b"bloop" => self.block_statement(&keyword, BlockKind::Loop, start)?,
            b"oh" | b"OH" => self.block_statement(&keyword, BlockKind::FunctionDefinition, start)?,
            b"BOI" => {
                self.lexer.advance_by(keyword.len());
                return Ok(None);
            }
            _ => {
                let text = if keyword.is_empty() {
                    self.lexer.peek_text()
                } else {
                    String::from_utf8_lossy(&keyword).into_owned()
                };
                let span = Span::new(start, start + text.len().max(1));
                return Err(BoiError::unrecognized_keyword(&text, span));
            }
        };

        trace!(start = statement.span().start, end = statement.span().end, "parsed statement");
        Ok(Some(statement))
    }

    fn shorthand(&mut self, keyword: &[u8], callee: &str, start: usize) -> Result<Statement, BoiError> {
        self.lexer.advance_by(keyword.len());
        let tokens = self.statement_tokens()?;
        Ok(Statement::call_to(callee, tokens, self.span_from(start)))
    }

    fn block_statement(&mut self, keyword: &[u8], kind: BlockKind, start: usize) -> Result<Statement, BoiError> {
        self.lexer.advance_by(keyword.len());
        let tokens = self.statement_tokens()?;
        let body = self.block(start)?;
        let span = self.span_from(start);

        Ok(match kind {
            BlockKind::Conditional => Statement::Conditional { tokens, body, span },
            BlockKind::Loop => Statement::Loop { tokens, body, span },
            BlockKind::FunctionDefinition => Statement::FunctionDefinition {
                tokens,
                body: Rc::from(body),
                span,
            },
        })
    }

    /// Collects statements until the matching `BOI`.
    fn block(&mut self, start: usize) -> Result<Vec<Statement>, BoiError> {
        let mut statements = Vec::new();
        loop {
            if self.lexer.skip_trivia() {
                return Err(BoiError::unexpected_end_of_file(self.span_from(start)));
            }
            match self.parse_statement()? {
                Some(statement) => statements.push(statement),
                None => return Ok(statements),
            }
        }
    }

    fn statement_tokens(&mut self) -> Result<Vec<Token>, BoiError> {
        if self.lexer.skip_trivia() {
            return Err(BoiError::unexpected_end_of_input(self.lexer.position()));
        }
        self.lexer.read_tokens()
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.lexer.position())
    }
}
