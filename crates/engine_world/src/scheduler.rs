//! The world tick.
//!
//! Each [`Scheduler::tick`] runs the built-in systems in a fixed order:
//!
//! 1. Input: player key state overwrites player velocities.
//! 2. Movement: velocities are integrated into positions.
//! 3. Scripting: every attached script runs once.
//!
//! Input runs before movement so a key press moves the player in the same
//! tick. Scripting runs last so scripts see, and can override, the tick's
//! integrated positions.

use std::time::Instant;

use engine_component::Entity;
use engine_script::{ScriptEngine, ScriptError};
use tracing::{debug, info};

use crate::config::SimulationConfig;
use crate::input::InputState;
use crate::systems;
use crate::world::World;

/// What happened during one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// The tick counter after this tick.
    pub tick_id: u64,
    /// The delta the systems actually saw.
    pub delta: f64,
    /// Scripts that failed this tick. The tick still completed.
    pub script_faults: Vec<(Entity, ScriptError)>,
}

/// Runs the systems against a [`World`].
///
/// Holds the script engine (and its compile cache) across ticks, so
/// stopping and resuming play only means ceasing and restarting `tick`
/// calls. Nothing in the world is reset.
#[derive(Debug)]
pub struct Scheduler {
    config: SimulationConfig,
    scripts: ScriptEngine,
    tick_id: u64,
}

impl Scheduler {
    #[must_use]
    pub fn new(config: SimulationConfig) -> Self {
        let scripts = ScriptEngine::new(config.script.clone());
        Self {
            config,
            scripts,
            tick_id: 0,
        }
    }

    /// Number of ticks run so far.
    #[must_use]
    pub fn tick_id(&self) -> u64 {
        self.tick_id
    }

    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Check a script source compiles, without running it.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::Compile`] if the source does not parse.
    pub fn check_script(&mut self, source: &str) -> Result<(), ScriptError> {
        self.scripts.check(source)
    }

    /// Advance the world by `delta` seconds.
    ///
    /// Any finite, non-negative delta is used as given, however large. A
    /// negative or non-finite delta is treated as zero, so it can never
    /// reach stored positions.
    pub fn tick(&mut self, world: &mut World, input: &InputState, delta: f64) -> TickReport {
        let delta = sanitize_delta(delta);
        self.tick_id += 1;

        debug!(tick_id = self.tick_id, delta, "tick start");

        systems::input::run(world, input, self.config.player_speed);
        debug!(tick_id = self.tick_id, system = "input", "system done");

        systems::movement::run(world, delta);
        debug!(tick_id = self.tick_id, system = "movement", "system done");

        let script_faults = systems::scripting::run(world, &mut self.scripts, delta);
        debug!(
            tick_id = self.tick_id,
            system = "scripting",
            faults = script_faults.len(),
            "system done"
        );

        TickReport {
            tick_id: self.tick_id,
            delta,
            script_faults,
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}

/// Largest delta handed to systems; anything above would overflow to
/// infinity once narrowed to `f32`.
const MAX_TICK_DELTA: f64 = f32::MAX as f64;

fn sanitize_delta(delta: f64) -> f64 {
    if delta.is_finite() && delta > 0.0 {
        delta.min(MAX_TICK_DELTA)
    } else {
        0.0
    }
}

/// Whether the host is currently ticking the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayState {
    #[default]
    Stopped,
    Playing,
}

/// Turns wall-clock frame timestamps into tick deltas.
///
/// The first frame after construction or [`reset`](Self::reset) yields `0.0`;
/// later frames yield the time since the previous one, capped at
/// `max_delta`.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<Instant>,
    max_delta: f64,
}

impl FrameClock {
    #[must_use]
    pub fn new(max_delta: f64) -> Self {
        Self {
            last: None,
            max_delta: sanitize_delta(max_delta),
        }
    }

    /// Record a frame at `now` and return its delta in seconds.
    pub fn advance(&mut self, now: Instant) -> f64 {
        let delta = match self.last {
            Some(last) => now.saturating_duration_since(last).as_secs_f64(),
            None => 0.0,
        };
        self.last = Some(now);
        delta.min(self.max_delta)
    }

    /// Forget the previous frame, e.g. when play stops.
    pub fn reset(&mut self) {
        if self.last.take().is_some() {
            info!("frame clock reset");
        }
    }
}
