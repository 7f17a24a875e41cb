use crate::ast::Statement;
use crate::error::BoiError;
use crate::value::Var;
use std::collections::HashMap;
use std::fmt;
use std::io::Write;
use std::rc::Rc;
use tracing::trace;

/// Host callback behind a builtin. It runs with its own child scope already
/// pushed and returns the value that becomes that scope's `exit`.
pub type NativeFn = Rc<dyn Fn(&mut CallContext<'_>, &[Var]) -> Result<Var, BoiError>>;

#[derive(Clone)]
pub enum Function {
    Native(NativeFn),
    User(Rc<[Statement]>),
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Function::Native(_) => write!(f, "<native>"),
            Function::User(body) => write!(f, "<user: {} statements>", body.len()),
        }
    }
}

/// One frame of bindings.
///
/// A scope owns the child that most recently returned into it, so that
/// `ret:` lookups keep working after the child's frame has been popped.
#[derive(Debug, Default)]
pub struct Scope {
    functions: HashMap<String, Function>,
    variables: HashMap<String, Var>,
    last_return: Option<Box<Scope>>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// A root scope carrying the builtin library.
    pub fn root() -> Self {
        let mut scope = Self::new();
        crate::builtins::register(&mut scope);
        scope
    }

    pub fn variable(&self, name: &str) -> Option<&Var> {
        self.variables.get(name)
    }

    pub fn define(&mut self, name: &str, value: Var) {
        self.variables.insert(name.to_string(), value);
    }

    pub fn define_function(&mut self, name: &str, function: Function) {
        self.functions.insert(name.to_string(), function);
    }

    pub fn last_return(&self) -> Option<&Scope> {
        self.last_return.as_deref()
    }
}

// Deep recursion leaves a last-return chain as long as the call depth;
// unlink it in a loop so dropping it does not recurse.
impl Drop for Scope {
    fn drop(&mut self) {
        let mut next = self.last_return.take();
        while let Some(mut scope) = next {
            next = scope.last_return.take();
        }
    }
}

/// Handle to a live frame, counted from the root (which is always `0`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeId(usize);

impl ScopeId {
    pub const ROOT: ScopeId = ScopeId(0);
}

/// The stack of live scopes. Each frame's parent is the frame below it.
#[derive(Debug)]
pub struct ScopeChain {
    frames: Vec<Scope>,
}

impl ScopeChain {
    pub fn new(root: Scope) -> Self {
        Self { frames: vec![root] }
    }

    pub fn current(&self) -> ScopeId {
        ScopeId(self.frames.len() - 1)
    }

    pub fn parent(&self, id: ScopeId) -> Option<ScopeId> {
        id.0.checked_sub(1).map(ScopeId)
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.frames[id.0]
    }

    pub fn scope_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.frames[id.0]
    }

    /// Looks `name` up in `id`, then in each enclosing scope.
    pub fn get(&self, id: ScopeId, name: &str) -> Option<&Var> {
        self.frames[..=id.0]
            .iter()
            .rev()
            .find_map(|scope| scope.variables.get(name))
    }

    /// Looks `name` up in the scope that last returned into `id`. A miss
    /// there continues through `id`'s own chain, the returned scope's parent.
    pub fn get_returned(&self, id: ScopeId, name: &str) -> Option<&Var> {
        let returned = self.frames[id.0].last_return.as_deref()?;
        returned
            .variables
            .get(name)
            .or_else(|| self.get(id, name))
    }

    /// Rebinds the nearest existing `name` at or above `id`; if there is
    /// none, creates it in `id` itself rather than in the root.
    pub fn set(&mut self, id: ScopeId, name: &str, value: Var) {
        let target = self.frames[..=id.0]
            .iter()
            .rposition(|scope| scope.variables.contains_key(name))
            .unwrap_or(id.0);
        self.frames[target].define(name, value);
    }

    /// Binds `name` in `id` only, never searching upward.
    pub fn define(&mut self, id: ScopeId, name: &str, value: Var) {
        self.frames[id.0].define(name, value);
    }

    pub fn function(&self, id: ScopeId, name: &str) -> Option<Function> {
        self.frames[..=id.0]
            .iter()
            .rev()
            .find_map(|scope| scope.functions.get(name))
            .cloned()
    }

    pub fn define_function(&mut self, id: ScopeId, name: &str, function: Function) {
        self.frames[id.0].define_function(name, function);
    }

    pub fn push_child(&mut self) -> ScopeId {
        self.frames.push(Scope::new());
        trace!(depth = self.frames.len(), "push scope");
        self.current()
    }

    /// Pops the current scope and records it as its parent's last return.
    pub fn pop_child(&mut self) -> Result<(), BoiError> {
        if self.frames.len() < 2 {
            return Err(BoiError::returned_to_nil_context());
        }
        let Some(popped) = self.frames.pop() else {
            return Err(BoiError::returned_to_nil_context());
        };
        trace!(depth = self.frames.len(), "pop scope");
        let parent = self.frames.len() - 1;
        self.frames[parent].last_return = Some(Box::new(popped));
        Ok(())
    }

    /// Hands back the root scope once every child has been popped.
    pub fn into_root(mut self) -> Scope {
        self.frames.truncate(1);
        self.frames.swap_remove(0)
    }
}

/// What a builtin sees while it runs: the scope chain with its own child
/// scope on top, and the output channel `say` writes to.
pub struct CallContext<'a> {
    pub scopes: &'a mut ScopeChain,
    pub output: &'a mut dyn Write,
}

impl CallContext<'_> {
    /// The builtin's own child scope.
    pub fn scope(&self) -> ScopeId {
        self.scopes.current()
    }

    /// The scope that made the call.
    pub fn caller(&self) -> Result<ScopeId, BoiError> {
        self.scopes
            .parent(self.scope())
            .ok_or_else(BoiError::returned_to_nil_context)
    }
}
