//! World error types.

use engine_component::Entity;

/// Errors raised by [`World`](crate::World) mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorldError {
    /// The id was never issued by this world's registry.
    #[error("{0} was never issued by the entity registry")]
    UnknownEntity(Entity),

    /// The requested parent edge would close a cycle (including self-parenting).
    #[error("parenting {child} under {parent} would create a cycle")]
    ParentCycle { child: Entity, parent: Entity },

    /// The id is above [`Entity::MAX_ID`] and cannot be tracked.
    #[error("{0} is above the largest allowed entity id")]
    IdOutOfRange(Entity),

    /// A value carrying NaN or infinity was written to a numeric component.
    #[error("{component} on {entity} must be finite")]
    NonFinite { entity: Entity, component: &'static str },
}
