//! # objective-integration-tests: Shared Test Helpers
//!
//! The tests live under `tests/`. This library only carries the helpers
//! they share: tracing setup and compact views of failure trees.

use std::collections::BTreeMap;

use tracing_subscriber::EnvFilter;

use objective_core::{Invalid, Value};

/// Installs a test subscriber once per process. `RUST_LOG` selects the
/// level; the default is `warn`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_test_writer()
        .try_init();
}

/// Converts a JSON literal into a [`Value`].
pub fn value(json: serde_json::Value) -> Value {
    Value::from(json)
}

/// Flattens a failure tree into `"a/b/0/c" → message`.
pub fn errors(invalid: &Invalid) -> BTreeMap<String, String> {
    invalid
        .error_dict()
        .into_iter()
        .map(|(path, message)| {
            let path: Vec<String> = path.iter().map(ToString::to_string).collect();
            (path.join("/"), message)
        })
        .collect()
}

/// Builds the expected form of [`errors`] from string pairs.
pub fn expected(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(path, message)| (path.to_string(), message.to_string()))
        .collect()
}
