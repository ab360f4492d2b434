//! Function registry for the formula evaluator
//!
//! Maps upper-cased function names to their implementations. The registry is
//! immutable once handed to an engine; extending the language means building
//! a new registry, never touching the parser.

use crate::context::FunctionContext;
use crate::error::EvalResult;
use crate::functions;
use crm_formula_types::FormulaValue;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Function implementation.
///
/// Receives every argument already evaluated, in call order. Arguments the
/// caller omitted are not present in the slice; use [`arg`] to read them as
/// `Undefined`.
pub type FormulaFn =
    Arc<dyn Fn(&[FormulaValue], &FunctionContext<'_>) -> EvalResult<FormulaValue> + Send + Sync>;

static UNDEFINED: FormulaValue = FormulaValue::Undefined;

/// Argument at `index`, or `Undefined` when the call supplied fewer arguments
pub fn arg(args: &[FormulaValue], index: usize) -> &FormulaValue {
    args.get(index).unwrap_or(&UNDEFINED)
}

/// Name-to-implementation table used for `FUNCTION` tokens
#[derive(Clone, Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, FormulaFn>,
}

impl FunctionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in function library
    pub fn standard() -> Self {
        let mut registry = Self::new();
        functions::register_standard(&mut registry);
        registry
    }

    /// Start building a registry from the built-in library
    pub fn builder() -> FunctionRegistryBuilder {
        FunctionRegistryBuilder {
            registry: Self::standard(),
        }
    }

    /// Register a function, replacing any existing one with the same name.
    ///
    /// Names are stored upper-cased because the lexer upper-cases every
    /// function token.
    pub fn register<F>(&mut self, name: impl AsRef<str>, implementation: F)
    where
        F: Fn(&[FormulaValue], &FunctionContext<'_>) -> EvalResult<FormulaValue>
            + Send
            + Sync
            + 'static,
    {
        self.functions
            .insert(name.as_ref().to_ascii_uppercase(), Arc::new(implementation));
    }

    /// Remove a function
    pub fn unregister(&mut self, name: &str) -> Option<FormulaFn> {
        self.functions.remove(&name.to_ascii_uppercase())
    }

    /// Look up a function by its upper-cased name
    pub fn get(&self, name: &str) -> Option<&FormulaFn> {
        self.functions.get(name)
    }

    /// Check if a function is registered
    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered functions
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("functions", &self.names())
            .finish()
    }
}

/// Builder for registries that extend or restrict the built-in library
pub struct FunctionRegistryBuilder {
    registry: FunctionRegistry,
}

impl FunctionRegistryBuilder {
    /// Add or replace a function
    pub fn function<F>(mut self, name: impl AsRef<str>, implementation: F) -> Self
    where
        F: Fn(&[FormulaValue], &FunctionContext<'_>) -> EvalResult<FormulaValue>
            + Send
            + Sync
            + 'static,
    {
        self.registry.register(name, implementation);
        self
    }

    /// Remove a built-in function
    pub fn without(mut self, name: &str) -> Self {
        self.registry.unregister(name);
        self
    }

    /// Finish building
    pub fn build(self) -> FunctionRegistry {
        self.registry
    }
}
