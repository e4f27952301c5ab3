//! Route authorization gate
//!
//! Pure decision function mapping a route's requirement and the current
//! session snapshot to exactly one outcome. The gate never performs
//! I/O and never blocks; while the session is still restoring it
//! answers `Loading`, so protected content is not flashed to a visitor
//! whose token has yet to be validated.

use crate::roles::{ADMIN_LEVEL, OWNER_LEVEL, Role};
use crate::session::SessionState;

/// Access requirement attached to a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteRequirement {
    /// Open to everyone, signed in or not
    Public,
    /// Any authenticated member
    Member,
    /// User management clearance
    Admin,
    /// Full system clearance
    Owner,
}

/// Outcome of evaluating a route against a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Session restore has not resolved; render nothing yet
    Loading,
    Allowed,
    /// Unauthenticated on a protected route
    RedirectToLogin,
    /// Authenticated but below the required clearance. Deliberately the
    /// same outcome as for a route that does not exist, so probing URLs
    /// reveals nothing about what lies behind them.
    RedirectToPublic,
}

/// Evaluate a route requirement against the current session.
pub fn evaluate(requirement: RouteRequirement, session: &SessionState) -> GateDecision {
    if requirement == RouteRequirement::Public {
        return GateDecision::Allowed;
    }

    if !session.ready {
        return GateDecision::Loading;
    }

    let Some(identity) = &session.identity else {
        return GateDecision::RedirectToLogin;
    };

    let role = Role::from_level(Some(identity.level));
    if role.capabilities.is_banned {
        return GateDecision::RedirectToPublic;
    }

    let required_level = match requirement {
        RouteRequirement::Public => unreachable!(),
        RouteRequirement::Member => 1,
        RouteRequirement::Admin => ADMIN_LEVEL,
        RouteRequirement::Owner => OWNER_LEVEL,
    };

    if role.level >= required_level {
        GateDecision::Allowed
    } else {
        GateDecision::RedirectToPublic
    }
}
