//! Route access control.
//!
//! Decides whether a session may open a page. The evaluator is a pure
//! function of the session and the page's declared requirement; the
//! caller turns a denial into a redirect.

use crate::models::{Role, Session};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Role a route can insist on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequiredRole {
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "recepcao")]
    Reception,
}

/// Static requirement attached to a navigable page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouteRequirement {
    /// Any authenticated session.
    Any,
    Role(RequiredRole),
    Reception(String),
    Receptions(Vec<String>),
}

impl RouteRequirement {
    pub fn reception(id: impl Into<String>) -> Self {
        RouteRequirement::Reception(id.into())
    }

    pub fn receptions<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RouteRequirement::Receptions(ids.into_iter().map(Into::into).collect())
    }
}

/// What the router should do with a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Render,
    RedirectToLogin,
    RedirectToLanding,
}

/// Decide whether `session` may open a page guarded by `requirement`.
///
/// Rules are evaluated top to bottom and the first one that applies wins:
/// 1. no (or inactive) session denies;
/// 2. a required admin role denies non-admins;
/// 3. a required reception role denies everyone but reception staff,
///    admins included;
/// 4. admins are allowed;
/// 5. a single required reception denies any other desk;
/// 6. a reception list denies desks outside it (no desk counts as `""`);
/// 7. otherwise allow.
pub fn can_access(session: Option<&Session>, requirement: &RouteRequirement) -> bool {
    let session = match session {
        Some(s) if s.active => s,
        _ => return false,
    };

    match requirement {
        RouteRequirement::Role(RequiredRole::Admin) if !session.role.is_admin_variant() => {
            return false
        }
        RouteRequirement::Role(RequiredRole::Reception) if session.role != Role::Reception => {
            return false
        }
        _ => {}
    }

    if session.role.is_admin_variant() {
        return true;
    }

    let desk = session.reception_id.as_deref().unwrap_or("");
    match requirement {
        RouteRequirement::Reception(required) => {
            session.reception_id.as_deref() == Some(required.as_str())
        }
        RouteRequirement::Receptions(allowed) => allowed.iter().any(|id| id == desk),
        RouteRequirement::Any | RouteRequirement::Role(_) => true,
    }
}

/// Evaluate a navigation and pick the redirect on denial.
pub fn navigate(session: Option<&Session>, requirement: &RouteRequirement) -> Navigation {
    let signed_in = session.map_or(false, |s| s.active);
    if !signed_in {
        debug!(?requirement, "no active session, redirecting to login");
        return Navigation::RedirectToLogin;
    }

    if can_access(session, requirement) {
        debug!(?requirement, "access granted");
        Navigation::Render
    } else {
        info!(
            user = ?session.map(|s| s.username.as_str()),
            ?requirement,
            "access denied"
        );
        Navigation::RedirectToLanding
    }
}
