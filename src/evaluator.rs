use crate::ast::{Statement, Token, VarSource};
use crate::error::BoiError;
use crate::parser::Parser;
use crate::scope::{CallContext, Function, NativeFn, Scope, ScopeChain, ScopeId};
use crate::value::{is_truthy, Var};
use std::io::{self, Write};
use std::rc::Rc;
use tracing::debug;

/// Name of the variable a call leaves its result in.
pub const EXIT: &str = "exit";

const STACK_RED_ZONE: usize = 128 * 1024;
const STACK_GROW_SIZE: usize = 4 * 1024 * 1024;

/// Tree-walking interpreter with an explicit scope stack.
pub struct Interpreter {
    scopes: ScopeChain,
    output: Box<dyn Write>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_scope(Scope::root())
    }

    /// Continues from a root scope left behind by an earlier run.
    pub fn with_scope(root: Scope) -> Self {
        Self {
            scopes: ScopeChain::new(root),
            output: Box::new(io::stdout()),
        }
    }

    pub fn with_output(mut self, output: Box<dyn Write>) -> Self {
        self.output = output;
        self
    }

    pub fn root(&self) -> &Scope {
        self.scopes.scope(ScopeId::ROOT)
    }

    pub fn into_scope(self) -> Scope {
        self.scopes.into_root()
    }

    pub fn register_native<F>(&mut self, name: &str, function: F)
    where
        F: Fn(&mut CallContext<'_>, &[Var]) -> Result<Var, BoiError> + 'static,
    {
        let function: NativeFn = Rc::new(function);
        self.scopes
            .define_function(ScopeId::ROOT, name, Function::Native(function));
    }

    /// Parses and executes `source` one top-level statement at a time.
    pub fn run(&mut self, source: &[u8]) -> Result<(), BoiError> {
        let mut parser = Parser::from_source(source);
        while !parser.is_at_end() {
            if let Some(statement) = parser.parse_statement()? {
                self.execute_statement(&statement)?;
            }
        }
        self.output.flush().map_err(BoiError::io)
    }

    /// Calls `name` through the usual convention and returns its exit value.
    pub fn call(&mut self, name: &str, args: Vec<Var>) -> Result<Var, BoiError> {
        self.invoke(name, args)?;
        Ok(self.returned_exit().cloned().unwrap_or_default())
    }

    pub fn execute_statement(&mut self, stmt: &Statement) -> Result<(), BoiError> {
        self.execute(stmt).map_err(|error| error.or_span(stmt.span()))
    }

    fn execute(&mut self, stmt: &Statement) -> Result<(), BoiError> {
        match stmt {
            Statement::Call { tokens, .. } => self.call_tokens(tokens, "boi!"),
            Statement::Conditional { tokens, body, .. } => {
                self.call_tokens(tokens, "boi?")?;
                if is_truthy(self.returned_exit()) {
                    self.execute_block(body)?;
                }
                Ok(())
            }
            Statement::Loop { tokens, body, .. } => {
                loop {
                    // The head is re-evaluated each time round since the body
                    // may have rebound what it reads.
                    self.call_tokens(tokens, "bloop")?;
                    if !is_truthy(self.returned_exit()) {
                        return Ok(());
                    }
                    self.execute_block(body)?;
                }
            }
            Statement::FunctionDefinition { tokens, body, .. } => {
                let name = match tokens.first() {
                    Some(token) => self.value_of(token)?.unwrap_or_default().to_text(),
                    None => String::new(),
                };
                debug!(function = %name, statements = body.len(), "define function");
                let current = self.scopes.current();
                self.scopes
                    .define_function(current, &name, Function::User(Rc::clone(body)));
                Ok(())
            }
        }
    }

    fn execute_block(&mut self, body: &[Statement]) -> Result<(), BoiError> {
        self.with_child_scope(|interpreter| {
            for stmt in body {
                interpreter.execute_statement(stmt)?;
            }
            Ok(())
        })
    }

    /// Evaluates every token; the first value names the callee.
    fn call_tokens(&mut self, tokens: &[Token], keyword: &str) -> Result<(), BoiError> {
        if tokens.is_empty() {
            return Err(BoiError::arity(format!(
                "{} must have at least one token",
                keyword
            )));
        }

        let mut values = Vec::with_capacity(tokens.len());
        for token in tokens {
            values.push(self.value_of(token)?.unwrap_or_default());
        }
        let args = values.split_off(1);
        self.invoke(&values[0].to_text(), args)
    }

    /// Resolves a token to a value; `None` for unbound variables.
    pub fn value_of(&mut self, token: &Token) -> Result<Option<Var>, BoiError> {
        let current = self.scopes.current();
        match token {
            Token::Literal(bytes) => Ok(Some(Var::from(bytes.as_slice()))),
            Token::Variable {
                name,
                source: VarSource::Local,
            } => Ok(self.scopes.get(current, name).cloned()),
            Token::Variable {
                name,
                source: VarSource::LastReturn,
            } => Ok(self.scopes.get_returned(current, name).cloned()),
            Token::NestedCall(children) => {
                let Some((callee, rest)) = children.split_first() else {
                    return Err(BoiError::arity("nested call must name a function".to_string()));
                };
                let mut args = Vec::with_capacity(rest.len());
                for child in rest {
                    args.push(self.value_of(child)?.unwrap_or_default());
                }
                // The callee is named by its written text, never evaluated:
                // `[boi:cat a b]` calls `cat`.
                let name = match callee {
                    Token::Literal(bytes) => String::from_utf8_lossy(bytes).into_owned(),
                    Token::Variable { name, .. } => name.clone(),
                    Token::NestedCall(_) | Token::Terminator => String::new(),
                };
                self.invoke(&name, args)?;
                Ok(Some(self.returned_exit().cloned().unwrap_or_default()))
            }
            Token::Terminator => Ok(None),
        }
    }

    /// Looks `name` up from the current scope, then runs it in a fresh child
    /// scope whose `exit` receives the result.
    fn invoke(&mut self, name: &str, args: Vec<Var>) -> Result<(), BoiError> {
        let current = self.scopes.current();
        let function = self
            .scopes
            .function(current, name)
            .ok_or_else(|| BoiError::undefined_function(name))?;

        debug!(function = name, args = args.len(), depth = self.scopes.depth(), "call");

        // User functions recurse through here, so grow the stack on demand.
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
            self.with_child_scope(|interpreter| {
                let exit = match function {
                    Function::Native(native) => {
                        let mut context = CallContext {
                            scopes: &mut interpreter.scopes,
                            output: interpreter.output.as_mut(),
                        };
                        native(&mut context, &args)?
                    }
                    Function::User(body) => interpreter.run_user_function(&body, args)?,
                };
                let scope = interpreter.scopes.current();
                interpreter.scopes.define(scope, EXIT, exit);
                Ok(())
            })
        })
    }

    fn run_user_function(&mut self, body: &[Statement], args: Vec<Var>) -> Result<Var, BoiError> {
        let scope = self.scopes.current();
        for (index, value) in args.into_iter().enumerate() {
            self.scopes.define(scope, &format!("arg.{}", index), value);
        }

        for stmt in body {
            self.execute_statement(stmt)?;
        }

        Ok(self
            .scopes
            .scope(scope)
            .variable(EXIT)
            .cloned()
            .unwrap_or_default())
    }

    /// Pushes a child scope around `body` and pops it on every exit path.
    fn with_child_scope<T>(
        &mut self,
        body: impl FnOnce(&mut Self) -> Result<T, BoiError>,
    ) -> Result<T, BoiError> {
        self.scopes.push_child();
        let result = body(self);
        let popped = self.scopes.pop_child();
        let value = result?;
        popped?;
        Ok(value)
    }

    /// The `exit` left by the scope that last returned into the current one.
    fn returned_exit(&self) -> Option<&Var> {
        self.scopes
            .scope(self.scopes.current())
            .last_return()?
            .variable(EXIT)
    }
}
