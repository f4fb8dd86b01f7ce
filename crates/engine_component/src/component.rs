//! Core [`Component`] trait.
//!
//! Every kind of data attached to an entity implements [`Component`]. The
//! trait only carries identity metadata; storage lives in
//! [`ComponentStore`](crate::store::ComponentStore).

/// The core component trait.
///
/// # Examples
///
/// ```rust
/// use engine_component::Component;
///
/// #[derive(Debug, Clone)]
/// struct Health {
///     current: f32,
///     max: f32,
/// }
///
/// impl Component for Health {
///     fn type_name() -> &'static str { "Health" }
/// }
/// ```
pub trait Component: 'static {
    /// A human-readable name for this component type, used in diagnostics.
    fn type_name() -> &'static str;
}
