use crate::error::Span;
use std::rc::Rc;

/// Where a variable reference is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarSource {
    /// `boi:name`, looked up through the current scope chain.
    Local,
    /// `ret:name`, looked up in the scope that most recently returned.
    LastReturn,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Literal(Vec<u8>),
    Variable {
        name: String,
        source: VarSource,
    },
    /// `[callee args...]`; the first child names the callee.
    NestedCall(Vec<Token>),
    Terminator,
}

impl Token {
    pub fn literal(text: &str) -> Self {
        Token::Literal(text.as_bytes().to_vec())
    }
}

#[derive(Debug, Clone)]
pub struct Program {
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone)]
pub enum Statement {
    Call {
        tokens: Vec<Token>,
        span: Span,
    },
    Conditional {
        tokens: Vec<Token>,
        body: Vec<Statement>,
        span: Span,
    },
    Loop {
        tokens: Vec<Token>,
        body: Vec<Statement>,
        span: Span,
    },
    /// `tokens[0]` names the function; any further tokens are ignored.
    FunctionDefinition {
        tokens: Vec<Token>,
        body: Rc<[Statement]>,
        span: Span,
    },
}

impl Statement {
    /// Builds a call to a fixed builtin, as the shorthand keywords do.
    pub fn call_to(callee: &str, tokens: Vec<Token>, span: Span) -> Self {
        let mut all = Vec::with_capacity(tokens.len() + 1);
        all.push(Token::literal(callee));
        all.extend(tokens);
        Statement::Call { tokens: all, span }
    }

    pub fn span(&self) -> &Span {
        match self {
            Statement::Call { span, .. } => span,
            Statement::Conditional { span, .. } => span,
            Statement::Loop { span, .. } => span,
            Statement::FunctionDefinition { span, .. } => span,
        }
    }
}
