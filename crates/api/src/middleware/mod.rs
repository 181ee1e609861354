//! Request middleware.

pub mod actor;

pub use actor::{ACTOR_HEADER, ActorUser, actor_middleware};
