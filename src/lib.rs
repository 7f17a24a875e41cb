// Boi Language Interpreter Library
//
// A small dynamically scoped scripting language: a pull-based lexer, a
// keyword-driven parser, and a tree-walking interpreter whose values are raw
// byte strings.

// Public modules
pub mod ast;
pub mod builtins;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod repl;
pub mod runner;
pub mod scope;
pub mod value;

// Re-export commonly used items
pub use ast::{Program, Statement, Token, VarSource};
pub use error::{BoiError, ErrorKind, Span};
pub use evaluator::{Interpreter, EXIT};
pub use lexer::Lexer;
pub use parser::Parser;
pub use scope::{CallContext, Function, Scope, ScopeChain, ScopeId};
pub use value::Var;

// Re-export main functions
pub use repl::start as start_repl;
pub use runner::{run, run_script};
