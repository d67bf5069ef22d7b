//! Global registry for query functions: the capability table the
//! query-language runtime resolves operation names against.
//!
//! Functions are registered at startup (see [`crate::register_builtins`])
//! and retrieved by name at call time. The registry uses a `RwLock` so
//! lookups proceed concurrently while registration is exclusive.

use std::sync::{Arc, RwLock};

use sylva_common::{Result, error::Error};

use crate::function::QueryFunction;

/// Registers a query function under its own [`QueryFunction::name`].
///
/// Registering a second function with the same name replaces the first;
/// last registration wins.
pub fn add(function: impl Into<Arc<dyn QueryFunction>>) {
    let function = function.into();
    let name = function.name().to_string();
    REGISTRY.write().unwrap().insert(name, function);
}

/// Retrieves a query function from the registry by name.
///
/// # Errors
///
/// Returns an `Error::invalid_arg` if no function with the specified name
/// is registered.
pub fn get(name: impl AsRef<str>) -> Result<Arc<dyn QueryFunction>> {
    let name = name.as_ref();
    let function = REGISTRY.read().unwrap().get(name).cloned();
    function.ok_or_else(|| {
        Error::invalid_arg(
            "function name",
            format!("Query function '{name}' not found"),
        )
    })
}

/// Global function registry, keyed by stable function name.
///
/// The map uses `ahash` with a fixed state so the static can be
/// constructed in a `const` context; it starts empty and is populated at
/// runtime.
static REGISTRY: RwLock<ahash::HashMap<String, Arc<dyn QueryFunction>>> =
    RwLock::new(ahash::HashMap::with_hasher(ahash::RandomState::with_seeds(
        180433572, 6656221457, 3441002458, 551180043,
    )));
