//! Script error types.

use std::time::Duration;

/// Errors produced while compiling or running an entity script.
///
/// None of these are fatal to a tick: the scripting system logs them against
/// the offending entity and moves on.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScriptError {
    /// The source failed to parse.
    #[error("failed to compile script: {0}")]
    Compile(String),

    /// The script raised an error while running.
    #[error("script raised an error: {0}")]
    Runtime(String),

    /// The script ran more operations than allowed.
    #[error("script exceeded its operation budget of {0}")]
    OperationBudget(u64),

    /// The script ran longer than allowed.
    #[error("script exceeded its time budget of {0:?}")]
    TimeBudget(Duration),
}
