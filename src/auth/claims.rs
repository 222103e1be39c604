/*
 * Responsibility
 * - Claims payload embedded in and recovered from signed tokens
 * - Role enumeration (integer-coded on the wire) and the membership check
 *   every access-control decision goes through
 */
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("unknown role value: {0}")]
pub struct InvalidRole(pub u8);

/// Closed role set. Tokens carry roles as integers, so the discriminants are
/// part of the wire format and must not be reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Role {
    Admin = 0,
    User = 1,
}

impl From<Role> for u8 {
    fn from(role: Role) -> Self {
        role as u8
    }
}

impl TryFrom<u8> for Role {
    type Error = InvalidRole;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Role::Admin),
            1 => Ok(Role::User),
            other => Err(InvalidRole(other)),
        }
    }
}

/// Authenticated identity payload.
///
/// A `Claims` value is trustworthy only when produced by
/// [`Auth::validate_token`](crate::auth::Auth::validate_token): signature
/// checked against the key the token's kid names, expiry checked against the
/// clock at validation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub roles: Vec<Role>,
}

impl Claims {
    /// Build claims issued now and expiring after `ttl`.
    pub fn new(
        sub: impl Into<String>,
        iss: impl Into<String>,
        ttl: TimeDelta,
        roles: Vec<Role>,
    ) -> Self {
        let now = Utc::now();
        Self::issued_at(sub, iss, now, now + ttl, roles)
    }

    /// Build claims with explicit issue and expiry instants.
    pub fn issued_at(
        sub: impl Into<String>,
        iss: impl Into<String>,
        issued: DateTime<Utc>,
        expires: DateTime<Utc>,
        roles: Vec<Role>,
    ) -> Self {
        Self {
            iss: iss.into(),
            sub: sub.into(),
            iat: issued.timestamp(),
            exp: expires.timestamp(),
            roles,
        }
    }

    /// True when the claims' roles intersect `roles`. Any single matching
    /// role grants access; callers wanting all-of semantics must check each
    /// role themselves.
    pub fn authorized(&self, roles: &[Role]) -> bool {
        self.roles.iter().any(|have| roles.contains(have))
    }
}
