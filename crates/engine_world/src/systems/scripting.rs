//! Scripting system: run each entity's script once per tick.

use std::mem;

use engine_component::Entity;
use engine_script::{ScriptEngine, ScriptError, TransformsHandle};
use tracing::{trace, warn};

use crate::world::World;

/// Run every attached script, in entity id order.
///
/// The transform store is lent to the scripts through a
/// [`TransformsHandle`] for the duration of the pass and moved back
/// afterwards. Entities without a transform are skipped. A failing script
/// is logged and reported in the returned list; the remaining entities
/// still run.
pub fn run(world: &mut World, engine: &mut ScriptEngine, delta: f64) -> Vec<(Entity, ScriptError)> {
    let mut faults = Vec::new();
    if world.scripts.is_empty() {
        return faults;
    }

    let transforms = TransformsHandle::new(mem::take(&mut world.transforms));

    for (entity, script) in world.scripts.entries() {
        if !transforms.has(entity) {
            trace!(%entity, "script skipped, no transform");
            continue;
        }
        if let Err(err) = engine.run(&script.source, entity, delta, &transforms) {
            warn!(%entity, error = %err, "script failed");
            faults.push((entity, err));
        }
    }

    world.transforms = transforms.take();

    if engine.cached_scripts() > world.scripts.len() {
        engine.retain_sources(world.scripts.entries().map(|(_, s)| s.source.as_str()));
    }

    faults
}
