//! GuildGuard Policy - trust classification and punishment cooldowns
//!
//! Two small pieces of state drive every punishment decision:
//!
//! - [`TrustRegistry`] - per-community sets of explicitly trusted principals
//!   plus the derived-trust predicate (administrative capability), mutable
//!   only by the designated owner
//! - [`CooldownTracker`] - per-(community, principal) suppression of repeated
//!   punishment inside a fixed window
//!
//! Both are owned, lock-guarded state; nothing here talks to the platform.

pub mod cooldown;
pub mod store;
pub mod trust;

pub use cooldown::CooldownTracker;
pub use store::TrustStore;
pub use trust::TrustRegistry;
