//! The sandboxed script engine.
//!
//! Each run gets a fresh scope holding exactly three bindings:
//!
//! | binding      | type         | meaning                              |
//! |--------------|--------------|--------------------------------------|
//! | `entity_id`  | integer      | the entity the script is attached to |
//! | `delta`      | float        | elapsed seconds for this tick        |
//! | `transforms` | `Transforms` | handle to the shared transform store |
//!
//! Module imports resolve to nothing, `eval` is disabled, and `print`/`debug`
//! go to `tracing` instead of stdout. Every run is bounded by an operation
//! count and a wall-clock budget.

use std::cell::Cell;
use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::rc::Rc;
use std::time::Instant;

use engine_component::Entity;
use rhai::module_resolvers::DummyModuleResolver;
use rhai::{AST, Dynamic, Engine, EvalAltResult, FLOAT, INT, Scope};
use tracing::{debug, info};

use crate::api::{TransformsHandle, register_api};
use crate::config::ScriptConfig;
use crate::error::ScriptError;

/// How often (in operations) the wall-clock deadline is checked.
const DEADLINE_CHECK_INTERVAL: u64 = 128;

/// Per-run state shared with engine callbacks.
#[derive(Debug, Default)]
struct RunState {
    deadline: Cell<Option<Instant>>,
    entity: Cell<Option<Entity>>,
}

/// Compiles and runs entity scripts inside a restricted Rhai engine.
pub struct ScriptEngine {
    engine: Engine,
    config: ScriptConfig,
    cache: HashMap<u64, AST>,
    state: Rc<RunState>,
}

impl std::fmt::Debug for ScriptEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptEngine")
            .field("config", &self.config)
            .field("cached_scripts", &self.cache.len())
            .finish_non_exhaustive()
    }
}

impl ScriptEngine {
    /// Build an engine with the given limits.
    #[must_use]
    pub fn new(config: ScriptConfig) -> Self {
        let mut engine = Engine::new();
        let state = Rc::new(RunState::default());

        engine.set_module_resolver(DummyModuleResolver::new());
        engine.disable_symbol("eval");
        engine.set_max_operations(config.max_operations);
        engine.set_max_string_size(config.max_string_size);
        engine.set_max_array_size(config.max_array_size);
        engine.set_max_map_size(config.max_map_size);
        engine.set_max_expr_depths(config.max_expr_depth, config.max_expr_depth);
        engine.set_max_call_levels(config.max_call_levels);

        let progress_state = Rc::clone(&state);
        engine.on_progress(move |ops| {
            if ops % DEADLINE_CHECK_INTERVAL != 0 {
                return None;
            }
            match progress_state.deadline.get() {
                Some(deadline) if Instant::now() >= deadline => Some(Dynamic::UNIT),
                _ => None,
            }
        });

        let print_state = Rc::clone(&state);
        engine.on_print(move |text| {
            let entity = print_state.entity.get().map(Entity::id);
            info!(target: "engine_script", entity, "{text}");
        });
        let debug_state = Rc::clone(&state);
        engine.on_debug(move |text, _source, pos| {
            let entity = debug_state.entity.get().map(Entity::id);
            debug!(target: "engine_script", entity, %pos, "{text}");
        });

        register_api(&mut engine);

        Self {
            engine,
            config,
            cache: HashMap::new(),
            state,
        }
    }

    /// Returns the active limits.
    #[must_use]
    pub fn config(&self) -> &ScriptConfig {
        &self.config
    }

    /// Number of compiled scripts currently cached.
    #[must_use]
    pub fn cached_scripts(&self) -> usize {
        self.cache.len()
    }

    /// Compile `source` without running it, populating the cache.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::Compile`] if the source does not parse.
    pub fn check(&mut self, source: &str) -> Result<(), ScriptError> {
        self.compile_cached(source).map(|_| ())
    }

    /// Run `source` once on behalf of `entity`.
    ///
    /// # Errors
    ///
    /// Returns a [`ScriptError`] if the script fails to compile, raises, or
    /// exceeds its budget. Changes the script made to `transforms` before
    /// failing are kept.
    pub fn run(
        &mut self,
        source: &str,
        entity: Entity,
        delta: f64,
        transforms: &TransformsHandle,
    ) -> Result<(), ScriptError> {
        let digest = self.compile_cached(source)?;
        let ast = self
            .cache
            .get(&digest)
            .ok_or_else(|| ScriptError::Compile("compiled script missing from cache".into()))?;

        let mut scope = Scope::new();
        scope.push_constant("entity_id", entity.id() as INT);
        scope.push_constant("delta", delta as FLOAT);
        scope.push("transforms", transforms.clone());

        self.state.entity.set(Some(entity));
        self.state
            .deadline
            .set(self.config.time_budget.map(|budget| Instant::now() + budget));

        let result = self.engine.run_ast_with_scope(&mut scope, ast);

        self.state.entity.set(None);
        self.state.deadline.set(None);

        result.map_err(|err| self.classify(*err))
    }

    /// Drop cached compilations whose source is not in `live_sources`.
    pub fn retain_sources<'a>(&mut self, live_sources: impl IntoIterator<Item = &'a str>) {
        let live: Vec<u64> = live_sources.into_iter().map(hash_source).collect();
        self.cache.retain(|hash, _| live.contains(hash));
    }

    /// Returns the cache key for `source`, compiling it on first sight.
    fn compile_cached(&mut self, source: &str) -> Result<u64, ScriptError> {
        let digest = hash_source(source);
        if !self.cache.contains_key(&digest) {
            let ast = self
                .engine
                .compile(source)
                .map_err(|err| ScriptError::Compile(err.to_string()))?;
            self.cache.insert(digest, ast);
        }
        Ok(digest)
    }

    fn classify(&self, err: EvalAltResult) -> ScriptError {
        match err {
            EvalAltResult::ErrorTooManyOperations(_) => {
                ScriptError::OperationBudget(self.config.max_operations)
            }
            EvalAltResult::ErrorTerminated(_, _) => match self.config.time_budget {
                Some(budget) => ScriptError::TimeBudget(budget),
                None => ScriptError::Runtime("script terminated".into()),
            },
            other => ScriptError::Runtime(other.to_string()),
        }
    }
}

impl Default for ScriptEngine {
    fn default() -> Self {
        Self::new(ScriptConfig::default())
    }
}

fn hash_source(source: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    source.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use engine_component::ComponentStore;
    use engine_math::{Transform, Vec3};

    use super::*;

    fn e(id: u64) -> Entity {
        Entity::from_raw(id)
    }

    fn store_with(ids: &[u64]) -> TransformsHandle {
        let mut store = ComponentStore::new();
        for &id in ids {
            store.set(e(id), Transform::IDENTITY);
        }
        TransformsHandle::new(store)
    }

    #[test]
    fn test_bindings_are_visible() {
        let mut engine = ScriptEngine::default();
        let transforms = store_with(&[3]);
        engine
            .run(
                "transforms.set_position(entity_id, delta, 0.0, 0.0);",
                e(3),
                0.5,
                &transforms,
            )
            .unwrap();
        assert_eq!(transforms.get(e(3)).unwrap().position, Vec3::new(0.5, 0.0, 0.0));
    }

    #[test]
    fn test_get_modify_set_round_trip() {
        let mut engine = ScriptEngine::default();
        let transforms = store_with(&[1]);
        let source = r#"
            let t = transforms.get(entity_id);
            t.position.y += 2.0;
            t.scale = vec3(2, 2, 2);
            transforms.set(entity_id, t);
        "#;
        engine.run(source, e(1), 0.016, &transforms).unwrap();
        let t = transforms.get(e(1)).unwrap();
        assert_eq!(t.position, Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(t.scale, Vec3::splat(2.0));
    }

    #[test]
    fn test_script_can_write_other_entities() {
        let mut engine = ScriptEngine::default();
        let transforms = store_with(&[1, 2]);
        engine
            .run("transforms.translate(2, 1.0, 0.0, 0.0);", e(1), 0.0, &transforms)
            .unwrap();
        assert_eq!(transforms.get(e(2)).unwrap().position, Vec3::X);
    }

    #[test]
    fn test_missing_transform_reads_as_unit() {
        let mut engine = ScriptEngine::default();
        let transforms = store_with(&[]);
        engine
            .run(
                "if type_of(transforms.get(99)) != \"()\" { throw \"unexpected\"; }",
                e(1),
                0.0,
                &transforms,
            )
            .unwrap();
    }

    #[test]
    fn test_runtime_error_is_reported() {
        let mut engine = ScriptEngine::default();
        let transforms = store_with(&[1]);
        let err = engine
            .run("throw \"boom\";", e(1), 0.0, &transforms)
            .unwrap_err();
        assert!(matches!(err, ScriptError::Runtime(ref msg) if msg.contains("boom")));
    }

    #[test]
    fn test_compile_error_is_reported() {
        let mut engine = ScriptEngine::default();
        let transforms = store_with(&[1]);
        let err = engine.run("let = ;", e(1), 0.0, &transforms).unwrap_err();
        assert!(matches!(err, ScriptError::Compile(_)));
        assert_eq!(engine.cached_scripts(), 0);
    }

    #[test]
    fn test_operation_budget() {
        let config = ScriptConfig::default()
            .with_max_operations(1_000)
            .with_time_budget(None);
        let mut engine = ScriptEngine::new(config);
        let transforms = store_with(&[]);
        let err = engine
            .run("let n = 0; loop { n += 1; }", e(1), 0.0, &transforms)
            .unwrap_err();
        assert_eq!(err, ScriptError::OperationBudget(1_000));
    }

    #[test]
    fn test_time_budget() {
        let config = ScriptConfig::default()
            .with_max_operations(0)
            .with_time_budget(Some(Duration::from_millis(5)));
        let mut engine = ScriptEngine::new(config);
        let transforms = store_with(&[]);
        let err = engine
            .run("let n = 0; loop { n += 1; }", e(1), 0.0, &transforms)
            .unwrap_err();
        assert_eq!(err, ScriptError::TimeBudget(Duration::from_millis(5)));
    }

    #[test]
    fn test_imports_are_blocked() {
        let mut engine = ScriptEngine::default();
        let transforms = store_with(&[]);
        let err = engine
            .run("import \"/etc/passwd\" as secrets;", e(1), 0.0, &transforms)
            .unwrap_err();
        assert!(matches!(err, ScriptError::Runtime(_)));
    }

    #[test]
    fn test_eval_is_disabled() {
        let mut engine = ScriptEngine::default();
        let transforms = store_with(&[]);
        let result = engine.run("eval(\"40 + 2\");", e(1), 0.0, &transforms);
        assert!(result.is_err());
    }

    #[test]
    fn test_scope_does_not_leak_between_runs() {
        let mut engine = ScriptEngine::default();
        let transforms = store_with(&[]);
        engine.run("let secret = 42;", e(1), 0.0, &transforms).unwrap();
        let err = engine.run("secret", e(2), 0.0, &transforms).unwrap_err();
        assert!(matches!(err, ScriptError::Runtime(_)));
    }

    #[test]
    fn test_compile_cache_and_retain() {
        let mut engine = ScriptEngine::default();
        engine.check("let a = 1;").unwrap();
        engine.check("let a = 1;").unwrap();
        engine.check("let b = 2;").unwrap();
        assert_eq!(engine.cached_scripts(), 2);
        engine.retain_sources(["let b = 2;"]);
        assert_eq!(engine.cached_scripts(), 1);
    }
}
