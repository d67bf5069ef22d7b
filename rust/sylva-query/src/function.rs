//! The query-function trait and its call-surface types.

use std::sync::Arc;

use sylva_common::{Result, error::Error};
use sylva_store::DocumentStore;

use crate::sequence::NodeSequence;

/// A runtime-facing operation: a stable name, a declared signature, and an
/// execute entry point.
///
/// Implementations are registered into the [`crate::registry`] capability
/// table and looked up by name; the query-language runtime owns argument
/// decoding up to the [`ArgValue`] level and consumes the returned
/// sequence.
///
/// # Thread Safety
///
/// Functions are shared across execution contexts via `Arc`, hence the
/// `Send + Sync + 'static` bound. The sequences they return are
/// single-consumer and carry no such requirement.
pub trait QueryFunction: Send + Sync + 'static {
    /// The unique, stable registry name, e.g. `"sylva:scan-path-index"`.
    fn name(&self) -> &str;

    /// The declared parameter list.
    fn signature(&self) -> &Signature;

    /// Validates `args` and produces the operation's lazy result sequence.
    ///
    /// Validation failures surface here, synchronously, before any
    /// sequence is handed back; failures discovered during iteration
    /// surface at the offending pull of the returned sequence.
    fn execute(&self, ctx: &QueryContext, args: &[ArgValue]) -> Result<NodeSequence>;
}

/// The kinds of argument values a function parameter can accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Str,
    Int,
}

/// One declared parameter.
#[derive(Debug, Clone, Copy)]
pub struct Param {
    pub name: &'static str,
    pub kind: ParamKind,
    pub required: bool,
}

/// A function's declared parameter list. Required parameters precede
/// optional ones.
#[derive(Debug, Clone, Copy)]
pub struct Signature {
    pub params: &'static [Param],
}

impl Signature {
    /// Verifies the argument count against the declaration.
    pub fn check_arity(&self, args: &[ArgValue]) -> Result<()> {
        let required = self.params.iter().filter(|param| param.required).count();
        if args.len() < required || args.len() > self.params.len() {
            return Err(Error::invalid_arg(
                "arguments",
                format!(
                    "expected {required}..={} arguments, found {}",
                    self.params.len(),
                    args.len()
                ),
            ));
        }
        Ok(())
    }
}

/// A decoded argument value, as handed over by the query runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Str(String),
    Int(i64),
    Null,
}

impl ArgValue {
    pub fn kind_name(&self) -> &'static str {
        match self {
            ArgValue::Str(_) => "string",
            ArgValue::Int(_) => "integer",
            ArgValue::Null => "null",
        }
    }
}

/// Per-execution context: the capabilities a function may consume.
pub struct QueryContext {
    store: Arc<dyn DocumentStore>,
}

impl QueryContext {
    pub fn new(store: Arc<dyn DocumentStore>) -> QueryContext {
        QueryContext { store }
    }

    /// The collection/document registry backing this execution.
    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIG: Signature = Signature {
        params: &[
            Param {
                name: "a",
                kind: ParamKind::Str,
                required: true,
            },
            Param {
                name: "b",
                kind: ParamKind::Int,
                required: false,
            },
        ],
    };

    #[test]
    fn arity_bounds_are_enforced() {
        assert!(SIG.check_arity(&[]).is_err());
        assert!(SIG.check_arity(&[ArgValue::Str("x".into())]).is_ok());
        assert!(
            SIG.check_arity(&[ArgValue::Str("x".into()), ArgValue::Int(1)])
                .is_ok()
        );
        assert!(
            SIG.check_arity(&[
                ArgValue::Str("x".into()),
                ArgValue::Int(1),
                ArgValue::Null
            ])
            .is_err()
        );
    }
}
