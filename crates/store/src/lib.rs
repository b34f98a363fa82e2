//! The reactive state tree and its dispatch engine.
//!
//! Every mutation in the game flows through [`Store::dispatch`]: an action
//! passes an ordered interceptor chain, optionally reaches the reducer, and
//! change-detecting subscriptions push derived values outward.
//!
//! # Invariants
//! - Exactly one live [`State`] per running session, owned by its [`Store`].
//! - Dispatch is synchronous and depth-first re-entrant: a nested dispatch
//!   issued from inside an interceptor fully completes before the outer
//!   chain resumes.
//! - Subscription callbacks fire once per distinct extracted value.

pub mod action;
pub mod anim;
pub mod state;
pub mod store;

pub use action::Action;
pub use anim::{Animation, smooth_blend};
pub use state::{State, ViewModal, ViewingCamera, WorldModel};
pub use store::{
    Interceptor, PropSink, PropValue, Selector, Store, SubscriptionId, map_to_props, reduce,
};
