//! Strong type definitions for Potluck.
//!
//! All identifiers are newtypes so a `GroupId` can never be passed where a
//! `RecipeId` is expected. Ids are UUIDv4 strings; share tokens are hex
//! encoded random bytes.

use std::fmt;

use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an existing identifier.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Generate a fresh random identifier.
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Borrow the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(
    /// Identifies a user. Issued by the account layer, opaque to Potluck.
    UserId
);
string_id!(
    /// Identifies a group (a membership scope).
    GroupId
);
string_id!(
    /// Identifies a recipe aggregate.
    RecipeId
);
string_id!(
    /// Identifies an ingredient line within a recipe.
    IngredientId
);
string_id!(
    /// Identifies a step within a recipe.
    StepId
);
string_id!(
    /// Identifies a share link record (not the token).
    ShareId
);
string_id!(
    /// Identifies a comment.
    CommentId
);

/// Default number of random bytes in a share token (128 bits).
pub const DEFAULT_TOKEN_BYTES: usize = 16;

/// An opaque bearer token granting anonymous access to one shared recipe.
///
/// Generated from the OS CSPRNG and hex encoded. The `Debug` impl only
/// prints a short prefix so tokens do not end up in logs verbatim.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShareToken(String);

impl ShareToken {
    /// Wrap a token presented by a caller.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Generate a fresh token from `bytes` random bytes.
    pub fn generate(bytes: usize) -> Self {
        let mut buf = vec![0u8; bytes.max(1)];
        OsRng.fill_bytes(&mut buf);
        Self(hex::encode(buf))
    }

    /// Borrow the token text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ShareToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix: String = self.0.chars().take(6).collect();
        write!(f, "ShareToken({}..)", prefix)
    }
}

impl fmt::Display for ShareToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ShareToken {
    fn from(token: &str) -> Self {
        Self(token.to_owned())
    }
}
