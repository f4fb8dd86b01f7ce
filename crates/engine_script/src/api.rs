//! The script-facing API: value types and the transform store handle.
//!
//! Scripts see exactly three bindings (`entity_id`, `delta`, `transforms`).
//! Everything registered here is reachable only through those bindings or
//! through pure value constructors (`vec3`, `transform`).

use std::cell::RefCell;
use std::rc::Rc;

use engine_component::{ComponentStore, Entity};
use engine_math::{Transform, Vec3};
use rhai::{Array, Dynamic, Engine, FLOAT, INT};

/// Shared handle to the transform store, lent to scripts for one tick.
///
/// Scripts can read any entity's transform and overwrite any *existing*
/// transform. They cannot create entries: the handle has no access to the
/// entity registry, so it cannot tell issued ids from made-up ones.
#[derive(Debug, Clone, Default)]
pub struct TransformsHandle(Rc<RefCell<ComponentStore<Transform>>>);

impl TransformsHandle {
    /// Wrap a store so it can be shared with scripts.
    #[must_use]
    pub fn new(store: ComponentStore<Transform>) -> Self {
        Self(Rc::new(RefCell::new(store)))
    }

    /// Take the store back out of the handle, leaving it empty.
    #[must_use]
    pub fn take(&self) -> ComponentStore<Transform> {
        self.0.take()
    }

    /// Read a transform.
    #[must_use]
    pub fn get(&self, entity: Entity) -> Option<Transform> {
        self.0.borrow().get(entity).copied()
    }

    /// Overwrite an existing transform. Returns `false` if `entity` has none
    /// or `transform` is not finite.
    pub fn set(&self, entity: Entity, transform: Transform) -> bool {
        self.update(entity, |slot| *slot = transform)
    }

    /// Apply `f` to a copy of an existing transform and store the result if
    /// it is finite. Returns `false` if `entity` has none or the result was
    /// discarded.
    pub fn update(&self, entity: Entity, f: impl FnOnce(&mut Transform)) -> bool {
        let mut store = self.0.borrow_mut();
        let Some(slot) = store.get_mut(entity) else {
            return false;
        };
        let mut next = *slot;
        f(&mut next);
        if !next.is_finite() {
            return false;
        }
        *slot = next;
        true
    }

    #[must_use]
    pub fn has(&self, entity: Entity) -> bool {
        self.0.borrow().has(entity)
    }

    #[must_use]
    pub fn ids(&self) -> Vec<Entity> {
        self.0.borrow().keys().collect()
    }
}

fn entity_of(id: INT) -> Option<Entity> {
    u64::try_from(id).ok().map(Entity::from_raw)
}

fn format_vec3(v: &Vec3) -> String {
    format!("({}, {}, {})", v.x, v.y, v.z)
}

fn register_vec3(engine: &mut Engine) {
    engine.register_type_with_name::<Vec3>("Vec3");
    engine.register_fn("vec3", |x: FLOAT, y: FLOAT, z: FLOAT| {
        Vec3::new(x as f32, y as f32, z as f32)
    });
    engine.register_fn("vec3", |x: INT, y: INT, z: INT| {
        Vec3::new(x as f32, y as f32, z as f32)
    });

    engine.register_get_set("x", |v: &mut Vec3| v.x as FLOAT, |v: &mut Vec3, x: FLOAT| {
        v.x = x as f32;
    });
    engine.register_get_set("y", |v: &mut Vec3| v.y as FLOAT, |v: &mut Vec3, y: FLOAT| {
        v.y = y as f32;
    });
    engine.register_get_set("z", |v: &mut Vec3| v.z as FLOAT, |v: &mut Vec3, z: FLOAT| {
        v.z = z as f32;
    });
    // Integer overloads so `p.x = 1` works as well as `p.x = 1.0`.
    engine.register_set("x", |v: &mut Vec3, x: INT| v.x = x as f32);
    engine.register_set("y", |v: &mut Vec3, y: INT| v.y = y as f32);
    engine.register_set("z", |v: &mut Vec3, z: INT| v.z = z as f32);

    engine.register_fn("+", |a: Vec3, b: Vec3| a + b);
    engine.register_fn("-", |a: Vec3, b: Vec3| a - b);
    engine.register_fn("*", |a: Vec3, s: FLOAT| a * s as f32);
    engine.register_fn("*", |s: FLOAT, a: Vec3| a * s as f32);
    engine.register_fn("==", |a: Vec3, b: Vec3| a == b);
    engine.register_fn("length", |v: &mut Vec3| v.length() as FLOAT);
    engine.register_fn("to_string", |v: &mut Vec3| format_vec3(v));
    engine.register_fn("to_debug", |v: &mut Vec3| format_vec3(v));
}

fn register_transform(engine: &mut Engine) {
    engine.register_type_with_name::<Transform>("Transform");
    engine.register_fn("transform", || Transform::IDENTITY);
    engine.register_get_set(
        "position",
        |t: &mut Transform| t.position,
        |t: &mut Transform, v: Vec3| t.position = v,
    );
    engine.register_get_set(
        "rotation",
        |t: &mut Transform| t.rotation,
        |t: &mut Transform, v: Vec3| t.rotation = v,
    );
    engine.register_get_set(
        "scale",
        |t: &mut Transform| t.scale,
        |t: &mut Transform, v: Vec3| t.scale = v,
    );
    engine.register_fn("to_string", |t: &mut Transform| {
        format!(
            "Transform(position: {}, rotation: {}, scale: {})",
            format_vec3(&t.position),
            format_vec3(&t.rotation),
            format_vec3(&t.scale)
        )
    });
}

fn register_transforms_handle(engine: &mut Engine) {
    engine.register_type_with_name::<TransformsHandle>("Transforms");

    // Unit when the entity has no transform.
    engine.register_fn("get", |h: &mut TransformsHandle, id: INT| -> Dynamic {
        entity_of(id)
            .and_then(|e| h.get(e))
            .map_or(Dynamic::UNIT, Dynamic::from)
    });
    engine.register_fn("set", |h: &mut TransformsHandle, id: INT, t: Transform| -> bool {
        entity_of(id).is_some_and(|e| h.set(e, t))
    });
    engine.register_fn("has", |h: &mut TransformsHandle, id: INT| -> bool {
        entity_of(id).is_some_and(|e| h.has(e))
    });
    engine.register_fn("ids", |h: &mut TransformsHandle| -> Array {
        h.ids()
            .into_iter()
            .map(|e| Dynamic::from(e.id() as INT))
            .collect()
    });
    engine.register_fn(
        "translate",
        |h: &mut TransformsHandle, id: INT, x: FLOAT, y: FLOAT, z: FLOAT| -> bool {
            let offset = Vec3::new(x as f32, y as f32, z as f32);
            entity_of(id).is_some_and(|e| h.update(e, |t| t.position += offset))
        },
    );
    engine.register_fn(
        "set_position",
        |h: &mut TransformsHandle, id: INT, x: FLOAT, y: FLOAT, z: FLOAT| -> bool {
            let position = Vec3::new(x as f32, y as f32, z as f32);
            entity_of(id).is_some_and(|e| h.update(e, |t| t.position = position))
        },
    );
}

/// Register every script-visible type and function on `engine`.
pub fn register_api(engine: &mut Engine) {
    register_vec3(engine);
    register_transform(engine);
    register_transforms_handle(engine);
}
