//! Role model
//!
//! Pure projection of a numeric clearance level onto a role name,
//! a display style token, and a set of capability flags. Nothing here
//! does I/O or holds state; every consumer recomputes from `level`.

use serde::Serialize;

/// Clearance level at which moderation capabilities begin
pub const MODERATOR_LEVEL: u8 = 4;
/// Clearance level at which user management begins
pub const ADMIN_LEVEL: u8 = 5;
/// Clearance level with full system access
pub const OWNER_LEVEL: u8 = 6;

/// Capability flags derived from a clearance level.
///
/// Monotonic: every flag true at level N stays true above N.
/// Level 0 (banned) clears everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    pub is_banned: bool,
    pub is_member: bool,
    pub is_moderator: bool,
    pub is_admin: bool,
    pub is_owner: bool,
    pub can_post_events: bool,
    pub can_moderate: bool,
    pub can_manage_users: bool,
    pub can_access_system: bool,
}

/// Derived role for one clearance level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Role {
    pub level: u8,
    pub capabilities: Capabilities,
}

/// Display style token for a role badge.
///
/// The rendering layer maps these to whatever theme it uses; the core
/// only distinguishes the tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleStyle {
    Banned,
    Member,
    MemberTier,
    Moderator,
    Admin,
    Owner,
}

impl Role {
    /// Derive a role from a clearance level.
    ///
    /// A missing or out-of-range level degrades to Member (level 1);
    /// elevated capabilities are never granted by default or by an
    /// unrecognized level.
    pub fn from_level(level: Option<u8>) -> Self {
        let level = match level {
            Some(level) if level <= OWNER_LEVEL => level,
            _ => 1,
        };
        let banned = level == 0;

        Self {
            level,
            capabilities: Capabilities {
                is_banned: banned,
                is_member: !banned,
                is_moderator: level >= MODERATOR_LEVEL,
                is_admin: level >= ADMIN_LEVEL,
                is_owner: level >= OWNER_LEVEL,
                can_post_events: !banned,
                can_moderate: level >= MODERATOR_LEVEL,
                can_manage_users: level >= ADMIN_LEVEL,
                can_access_system: level >= OWNER_LEVEL,
            },
        }
    }

    /// Professional title for the clearance level
    pub fn name(&self) -> &'static str {
        match self.level {
            0 => "Banned",
            1 => "Member",
            2 => "Member II",
            3 => "Member III",
            4 => "Moderator",
            5 => "Administrator",
            _ => "Owner",
        }
    }

    /// Display style token for the role badge
    pub fn style(&self) -> RoleStyle {
        match self.level {
            0 => RoleStyle::Banned,
            1 => RoleStyle::Member,
            2 | 3 => RoleStyle::MemberTier,
            4 => RoleStyle::Moderator,
            5 => RoleStyle::Admin,
            _ => RoleStyle::Owner,
        }
    }

    /// Next level in the admin role-cycling action: administrators and
    /// above wrap back to Member, everyone else moves up one tier.
    pub fn next_cycle_level(current: u8) -> u8 {
        if current >= ADMIN_LEVEL { 1 } else { current + 1 }
    }
}
