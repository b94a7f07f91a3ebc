//! Role-based access decisions for admin-managed collections.
//!
//! Every admin route asks [`authorize`] instead of comparing role strings
//! itself, so the whole access table lives here.

use crate::models::user::Role;
use crate::utils::error::{AppError, AppResult};
use strum_macros::Display;
use uuid::Uuid;

/// The authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: Uuid,
    pub role: Role,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Collection {
    Users,
    Tours,
    Accommodations,
    Media,
    Prices,
    Categories,
    Bookings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Action {
    Read,
    Create,
    Update,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

/// Who may do what. `None` means an anonymous caller.
pub fn authorize(principal: Option<&Principal>, collection: Collection, action: Action) -> Decision {
    let role = principal.map(|p| p.role);
    let allowed = match (collection, action) {
        (Collection::Users, _) => role == Some(Role::Admin),

        (Collection::Bookings, Action::Create) => true,
        (Collection::Bookings, _) => role == Some(Role::Admin),

        // content collections
        (_, Action::Read) => true,
        (_, Action::Create) | (_, Action::Update) => {
            matches!(role, Some(Role::Admin) | Some(Role::Editor))
        }
        (_, Action::Delete) => role == Some(Role::Admin),
    };

    if allowed {
        Decision::Allow
    } else {
        Decision::Deny
    }
}

/// [`authorize`], turned into an error for route handlers.
pub fn require(principal: Option<&Principal>, collection: Collection, action: Action) -> AppResult<()> {
    match authorize(principal, collection, action) {
        Decision::Allow => Ok(()),
        Decision::Deny if principal.is_none() => {
            Err(AppError::AuthError("Login required".into()))
        }
        Decision::Deny => Err(AppError::Forbidden(format!(
            "not allowed to {} {}",
            action, collection
        ))),
    }
}
