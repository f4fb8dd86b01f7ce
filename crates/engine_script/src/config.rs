//! Script sandbox configuration.

use std::time::Duration;

/// Limits applied to every script run.
#[derive(Debug, Clone)]
pub struct ScriptConfig {
    /// Maximum number of engine operations per run (0 = unlimited).
    pub max_operations: u64,
    /// Wall-clock budget per run. `None` disables the check.
    pub time_budget: Option<Duration>,
    /// Maximum length of any string a script builds.
    pub max_string_size: usize,
    /// Maximum number of elements in any array a script builds.
    pub max_array_size: usize,
    /// Maximum number of properties in any object map a script builds.
    pub max_map_size: usize,
    /// Maximum expression nesting depth.
    pub max_expr_depth: usize,
    /// Maximum function call depth.
    pub max_call_levels: usize,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            max_operations: 100_000,
            time_budget: Some(Duration::from_millis(4)),
            max_string_size: 4 * 1024,
            max_array_size: 1024,
            max_map_size: 256,
            max_expr_depth: 64,
            max_call_levels: 32,
        }
    }
}

impl ScriptConfig {
    /// Override the per-run operation budget.
    #[must_use]
    pub fn with_max_operations(mut self, max_operations: u64) -> Self {
        self.max_operations = max_operations;
        self
    }

    /// Override the per-run wall-clock budget.
    #[must_use]
    pub fn with_time_budget(mut self, budget: Option<Duration>) -> Self {
        self.time_budget = budget;
        self
    }
}
