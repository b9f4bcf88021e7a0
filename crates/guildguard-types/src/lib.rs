//! GuildGuard Types - Canonical domain types for the moderation engine
//!
//! This crate contains all foundational types for GuildGuard with zero
//! dependencies on other guildguard crates. It defines:
//!
//! - Identity types (PrincipalId, CommunityId, ChannelId, etc.)
//! - Principal and live membership records
//! - Change-events delivered by the platform and the audit-trail entry types
//!   used to attribute them
//! - The central error enum shared by every layer
//!
//! # Policy Constants
//!
//! The two fixed policy durations live here so that every crate agrees on
//! them:
//!
//! - [`COOLDOWN_WINDOW_SECS`] - suppression window after a punishment
//! - [`CONTENT_TIMEOUT_SECS`] - timeout applied to link spammers

pub mod audit;
pub mod error;
pub mod event;
pub mod identity;
pub mod member;

pub use audit::*;
pub use error::*;
pub use event::*;
pub use identity::*;
pub use member::*;

/// Seconds after a punishment during which the same principal is not
/// punished again. Absorbs duplicate audit-log deliveries and cascades of
/// events attributed to one executor.
pub const COOLDOWN_WINDOW_SECS: i64 = 15;

/// Timeout duration, in seconds, applied to authors of unsolicited links.
pub const CONTENT_TIMEOUT_SECS: i64 = 600;

/// Name of the channel the log sink falls back to when no binding is set.
pub const DEFAULT_LOG_CHANNEL: &str = "security-logs";
