//! Identity types for GuildGuard
//!
//! All identity types are strongly typed wrappers around the platform's
//! stable numeric (snowflake-style) ids to prevent accidental mixing of
//! different ID kinds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Macro to generate ID types with common implementations
macro_rules! define_id_type {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Wrap a raw platform id
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            /// Get the raw id value
            pub const fn get(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map(Self)
            }
        }
    };
}

define_id_type!(PrincipalId, "Stable identifier of a platform account");
define_id_type!(CommunityId, "Identifier of an isolated multi-member community (guild)");
define_id_type!(ChannelId, "Identifier of a channel within a community");
define_id_type!(RoleId, "Identifier of a role within a community");
define_id_type!(MessageId, "Identifier of a posted message");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_raw_decimal() {
        let id = PrincipalId::new(1363029073328078848);
        assert_eq!(id.to_string(), "1363029073328078848");
    }

    #[test]
    fn test_parse_round_trip() {
        let id = CommunityId::new(42);
        let parsed: CommunityId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let parsed: PrincipalId = " 77 ".parse().unwrap();
        assert_eq!(parsed, PrincipalId::new(77));
    }

    #[test]
    fn test_ids_do_not_mix() {
        // Same raw value, distinct types; equality only within a type.
        let principal = PrincipalId::new(7);
        let other = PrincipalId::from(7u64);
        assert_eq!(principal, other);
    }
}
