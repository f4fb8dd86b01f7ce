//! Simulation configuration.

use engine_script::ScriptConfig;

/// Configuration for the scheduler and its systems.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Speed (units/second) the input system assigns per pressed direction.
    pub player_speed: f32,
    /// Largest wall-clock gap [`FrameClock`](crate::FrameClock) reports as
    /// one frame, in seconds. Keeps a resumed or stalled window from
    /// producing a huge catch-up step.
    pub max_frame_delta: f64,
    /// Limits for entity scripts.
    pub script: ScriptConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            player_speed: 5.0,
            max_frame_delta: 0.25,
            script: ScriptConfig::default(),
        }
    }
}

impl SimulationConfig {
    #[must_use]
    pub fn with_player_speed(mut self, speed: f32) -> Self {
        self.player_speed = speed;
        self
    }

    #[must_use]
    pub fn with_max_frame_delta(mut self, seconds: f64) -> Self {
        self.max_frame_delta = seconds;
        self
    }

    #[must_use]
    pub fn with_script_config(mut self, script: ScriptConfig) -> Self {
        self.script = script;
        self
    }
}
