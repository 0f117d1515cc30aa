use uuid::Uuid;

use crate::types::CampgroundError;

/// Why a mutating request was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// The requester carries no authenticated identity
    NotLoggedIn,
    /// The target resource does not exist
    NotFound,
    /// The requester is neither the resource's author nor an admin
    NotOwner,
}

/// Outcome of the ownership check for a mutating request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// The mutation may proceed
    Allow,
    /// The mutation must not happen; the reason is surfaced to the user
    Deny(DenyReason),
}

/// Decides whether `actor` may mutate a resource owned by `resource_author`.
///
/// Pure and synchronous: the caller loads the resource's author reference
/// first and performs no mutation on a deny. The policy is allow iff the
/// actor is an admin or is the resource's author.
pub fn authorize_mutation(
    actor: Option<Uuid>,
    is_admin: bool,
    resource_author: Option<Uuid>,
) -> AccessDecision {
    let actor = match actor {
        Some(actor) => actor,
        None => return AccessDecision::Deny(DenyReason::NotLoggedIn),
    };

    let author = match resource_author {
        Some(author) => author,
        None => return AccessDecision::Deny(DenyReason::NotFound),
    };

    if is_admin || actor == author {
        AccessDecision::Allow
    } else {
        AccessDecision::Deny(DenyReason::NotOwner)
    }
}

impl AccessDecision {
    /// Converts a decision into a handler-level result, mapping each deny
    /// reason to the matching user-facing error.
    pub fn into_result(self) -> Result<(), CampgroundError> {
        match self {
            AccessDecision::Allow => Ok(()),
            AccessDecision::Deny(DenyReason::NotLoggedIn) => Err(CampgroundError::NotLoggedIn),
            AccessDecision::Deny(DenyReason::NotFound) => Err(CampgroundError::NotFound),
            AccessDecision::Deny(DenyReason::NotOwner) => Err(CampgroundError::NotOwner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uid(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }

    #[test]
    fn test_unauthenticated_is_denied() {
        assert_eq!(
            authorize_mutation(None, false, Some(uid(1))),
            AccessDecision::Deny(DenyReason::NotLoggedIn)
        );
        // Even a claimed admin flag does not help without an identity
        assert_eq!(
            authorize_mutation(None, true, Some(uid(1))),
            AccessDecision::Deny(DenyReason::NotLoggedIn)
        );
    }

    #[test]
    fn test_missing_resource_is_denied() {
        assert_eq!(
            authorize_mutation(Some(uid(1)), false, None),
            AccessDecision::Deny(DenyReason::NotFound)
        );
        assert_eq!(
            authorize_mutation(Some(uid(1)), true, None),
            AccessDecision::Deny(DenyReason::NotFound)
        );
    }

    #[test]
    fn test_owner_is_allowed() {
        assert_eq!(
            authorize_mutation(Some(uid(7)), false, Some(uid(7))),
            AccessDecision::Allow
        );
    }

    #[test]
    fn test_admin_is_allowed_on_foreign_resource() {
        assert_eq!(
            authorize_mutation(Some(uid(2)), true, Some(uid(7))),
            AccessDecision::Allow
        );
    }

    #[test]
    fn test_non_owner_is_denied() {
        assert_eq!(
            authorize_mutation(Some(uid(2)), false, Some(uid(7))),
            AccessDecision::Deny(DenyReason::NotOwner)
        );
    }
}
