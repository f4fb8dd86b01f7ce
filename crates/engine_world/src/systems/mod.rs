//! The built-in systems, run by the [`Scheduler`](crate::Scheduler) in this
//! order: [`input`], [`movement`], [`scripting`].

pub mod input;
pub mod movement;
pub mod scripting;
