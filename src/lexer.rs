use crate::ast::{Token, VarSource};
use crate::error::{BoiError, Span};

const LOCAL_PREFIX: &[u8] = b"boi:";
const RETURN_PREFIX: &[u8] = b"ret:";

/// Pull-based scanner over the raw source bytes.
///
/// Nothing is tokenized ahead of time: the parser asks for statement keywords
/// and token lists as it needs them.
pub struct Lexer {
    source: Vec<u8>,
    current: usize,
}

impl Lexer {
    pub fn new(source: impl Into<Vec<u8>>) -> Self {
        Self {
            source: source.into(),
            current: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.current
    }

    pub fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    /// Skips whitespace and `--` line comments. Returns `true` when the input
    /// is exhausted, which between statements just means "no more statements".
    pub fn skip_trivia(&mut self) -> bool {
        loop {
            while self.peek().is_some_and(is_whitespace) {
                self.current += 1;
            }

            if self.rest().starts_with(b"--") {
                while let Some(c) = self.peek() {
                    self.current += 1;
                    if c == b'\n' {
                        break;
                    }
                }
                continue;
            }

            return self.is_at_end();
        }
    }

    /// The syntax word at the cursor: `[A-Za-z]+` with an optional trailing
    /// `!`, `,`, `:` or `?`, one of `[`, `]`, `;`, or `--`. Empty if none.
    pub fn peek_word(&self) -> &[u8] {
        let rest = self.rest();
        match rest.first() {
            Some(b'[' | b']' | b';') => &rest[..1],
            Some(b'-') if rest.get(1) == Some(&b'-') => &rest[..2],
            Some(c) if c.is_ascii_alphabetic() => {
                let mut len = rest.iter().take_while(|c| c.is_ascii_alphabetic()).count();
                if matches!(rest.get(len), Some(b'!' | b',' | b':' | b'?')) {
                    len += 1;
                }
                &rest[..len]
            }
            _ => &[],
        }
    }

    /// Text from the cursor up to the next whitespace, for diagnostics.
    pub fn peek_text(&self) -> String {
        let rest = self.rest();
        let len = rest.iter().take_while(|c| !is_whitespace(**c)).count();
        String::from_utf8_lossy(&rest[..len]).into_owned()
    }

    pub fn advance_by(&mut self, count: usize) {
        self.current = (self.current + count).min(self.source.len());
    }

    pub fn next_token(&mut self) -> Result<Token, BoiError> {
        if self.skip_trivia() {
            return Err(BoiError::unexpected_end_of_input(self.current));
        }

        let terminator_len = match self.peek_word() {
            word @ (b"boi" | b"BOI" | b"]" | b";") => Some(word.len()),
            _ => None,
        };
        if let Some(len) = terminator_len {
            self.current += len;
            return Ok(Token::Terminator);
        }

        if let Some(source) = self.variable_prefix() {
            self.current += LOCAL_PREFIX.len();
            let name = self.bare_literal();
            return Ok(Token::Variable {
                name: String::from_utf8_lossy(&name).into_owned(),
                source,
            });
        }

        match self.source[self.current] {
            b'[' | b'!' => {
                self.current += 1;
                Ok(Token::NestedCall(self.read_tokens()?))
            }
            b'"' => self.quoted_literal().map(Token::Literal),
            _ => Ok(Token::Literal(self.bare_literal())),
        }
    }

    /// Reads tokens up to and including the next terminator, which is dropped.
    pub fn read_tokens(&mut self) -> Result<Vec<Token>, BoiError> {
        let mut tokens = Vec::new();
        loop {
            match self.next_token()? {
                Token::Terminator => return Ok(tokens),
                token => tokens.push(token),
            }
        }
    }

    fn variable_prefix(&self) -> Option<VarSource> {
        let rest = self.rest();
        let named = rest
            .get(LOCAL_PREFIX.len())
            .is_some_and(u8::is_ascii_alphabetic);
        if !named {
            None
        } else if rest.starts_with(LOCAL_PREFIX) {
            Some(VarSource::Local)
        } else if rest.starts_with(RETURN_PREFIX) {
            Some(VarSource::LastReturn)
        } else {
            None
        }
    }

    fn quoted_literal(&mut self) -> Result<Vec<u8>, BoiError> {
        let start = self.current;
        self.current += 1;

        let mut value = Vec::new();
        loop {
            match self.peek() {
                None => {
                    return Err(BoiError::unexpected_end_of_input(self.current)
                        .with_span(Span::new(start, self.current))
                        .with_help("close the literal with '\"'"));
                }
                Some(b'\\') => {
                    self.current += 1;
                    match self.peek() {
                        Some(c) => value.push(c),
                        None => continue,
                    }
                }
                Some(b'"') => {
                    self.current += 1;
                    return Ok(value);
                }
                Some(c) => value.push(c),
            }
            self.current += 1;
        }
    }

    /// Ends at whitespace (consumed) or at `]` / `;` (left for the terminator).
    fn bare_literal(&mut self) -> Vec<u8> {
        let mut value = Vec::new();
        while let Some(c) = self.peek() {
            match c {
                b'\\' => {
                    self.current += 1;
                    if let Some(escaped) = self.peek() {
                        value.push(escaped);
                        self.current += 1;
                    }
                }
                b']' | b';' => break,
                c if is_whitespace(c) => {
                    self.current += 1;
                    break;
                }
                c => {
                    value.push(c);
                    self.current += 1;
                }
            }
        }
        value
    }

    fn peek(&self) -> Option<u8> {
        self.source.get(self.current).copied()
    }

    fn rest(&self) -> &[u8] {
        &self.source[self.current.min(self.source.len())..]
    }
}

fn is_whitespace(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\n' | b'\r')
}
