//! Public share links.
//!
//! A share link grants anonymous read access to exactly one recipe,
//! limited by an optional expiry and an optional view budget. There is at
//! most one link per recipe; changing the policy edits that link in place.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{RecipeId, ShareId, ShareToken, UserId};

/// Who a link is meant for. Presentational only: consumption does not
/// distinguish between the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AccessType {
    Public,
    InviteOnly,
}

impl AccessType {
    /// The stored text form.
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessType::Public => "public",
            AccessType::InviteOnly => "inviteOnly",
        }
    }
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(AccessType::Public),
            "inviteOnly" => Ok(AccessType::InviteOnly),
            other => Err(CoreError::UnknownAccessType(other.to_string())),
        }
    }
}

/// Limits attached to a share link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShareConditions {
    /// The link stops working at this instant (Unix milliseconds).
    pub expires_at: Option<i64>,

    /// Maximum number of successful views.
    pub max_views: Option<u32>,
}

/// Outcome of evaluating a link's conditions at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShareAvailability {
    Available,
    Expired,
    Exhausted,
}

impl ShareConditions {
    /// Create conditions with an expiration time.
    pub fn expires_at(timestamp: i64) -> Self {
        Self {
            expires_at: Some(timestamp),
            max_views: None,
        }
    }

    /// Create conditions with a view budget.
    pub fn max_views(count: u32) -> Self {
        Self {
            expires_at: None,
            max_views: Some(count),
        }
    }

    /// Evaluate the conditions given the current time and view count.
    ///
    /// Expiry wins over exhaustion. A link expires at `expires_at` itself,
    /// not one tick later; the store's guarded increment uses the same
    /// predicate.
    pub fn evaluate(&self, now: i64, views: u32) -> ShareAvailability {
        if let Some(expires) = self.expires_at {
            if expires <= now {
                return ShareAvailability::Expired;
            }
        }

        if let Some(max) = self.max_views {
            if views >= max {
                return ShareAvailability::Exhausted;
            }
        }

        ShareAvailability::Available
    }
}

/// A stored share link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareLink {
    pub id: ShareId,
    pub recipe_id: RecipeId,
    pub token: ShareToken,
    pub access_type: AccessType,
    pub max_views: Option<u32>,
    /// Successful consumptions so far. Never decreases, never exceeds
    /// `max_views` when that is set.
    pub current_views: u32,
    pub expires_at: Option<i64>,
    pub created_by: UserId,
    pub created_at: i64,
}

impl ShareLink {
    /// The link's limits.
    pub fn conditions(&self) -> ShareConditions {
        ShareConditions {
            expires_at: self.expires_at,
            max_views: self.max_views,
        }
    }

    /// Whether a consumption at `now` would succeed.
    pub fn availability(&self, now: i64) -> ShareAvailability {
        self.conditions().evaluate(now, self.current_views)
    }

    /// Views left before exhaustion, or `None` when unlimited.
    pub fn remaining_views(&self) -> Option<u32> {
        self.max_views
            .map(|max| max.saturating_sub(self.current_views))
    }
}

/// Create-or-update input for a recipe's share policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsertShareInput {
    pub recipe_id: RecipeId,
    pub access_type: AccessType,
    pub max_views: Option<u32>,
    pub expires_at: Option<i64>,
}

impl UpsertShareInput {
    /// A public link with no limits.
    pub fn public(recipe_id: RecipeId) -> Self {
        Self {
            recipe_id,
            access_type: AccessType::Public,
            max_views: None,
            expires_at: None,
        }
    }

    /// Apply limits.
    pub fn with_conditions(mut self, conditions: ShareConditions) -> Self {
        self.max_views = conditions.max_views;
        self.expires_at = conditions.expires_at;
        self
    }
}
