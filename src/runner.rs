use crate::error::BoiError;
use crate::evaluator::Interpreter;
use crate::scope::Scope;
use tracing::debug;

/// Executes `source` from `initial_scope`, or from a fresh root scope, and
/// hands back the root scope so a later run can pick up where this one left.
pub fn run(source: &[u8], initial_scope: Option<Scope>) -> Result<Scope, BoiError> {
    let mut interpreter = match initial_scope {
        Some(scope) => Interpreter::with_scope(scope),
        None => Interpreter::new(),
    };
    interpreter.run(source)?;
    Ok(interpreter.into_scope())
}

/// Runs a whole script, reporting the first error as a diagnostic.
/// Returns whether the script ran to completion.
pub fn run_script(source: &[u8], filename: Option<&str>) -> bool {
    debug!(file = filename.unwrap_or("<stdin>"), bytes = source.len(), "running script");
    match run(source, None) {
        Ok(_) => true,
        Err(error) => {
            error.report(&String::from_utf8_lossy(source), filename);
            false
        }
    }
}
