use std::fmt;

use serde::{Deserialize, Serialize};

/// Role controls what a member may do beyond managing their own account.
///
/// `Referent` is the member-management role; `Admin` and `Referent` together
/// form the staff set that manages club content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Referent,
    Admin,
}

impl Role {
    /// Returns true for roles allowed to manage club content
    /// (tournaments, matches, news).
    #[must_use]
    pub const fn is_staff(self) -> bool {
        matches!(self, Role::Referent | Role::Admin)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Referent => "referent",
            Role::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "user" => Some(Role::User),
            "referent" => Some(Role::Referent),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// License class a member holds. Eligibility checks (training slots) key
/// off this; tournament registration only requires the license to be active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LicenseType {
    Competition,
    Recreational,
}

impl LicenseType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            LicenseType::Competition => "competition",
            LicenseType::Recreational => "recreational",
        }
    }

    pub fn parse(s: &str) -> Option<LicenseType> {
        match s {
            "competition" => Some(LicenseType::Competition),
            "recreational" => Some(LicenseType::Recreational),
            _ => None,
        }
    }
}

impl fmt::Display for LicenseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registration lifecycle of a tournament.
///
/// `Full` is set exactly when the participant set reaches capacity;
/// `Closed` is only ever set by a staff edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TournamentStatus {
    #[default]
    Open,
    Full,
    Closed,
}

impl TournamentStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            TournamentStatus::Open => "open",
            TournamentStatus::Full => "full",
            TournamentStatus::Closed => "closed",
        }
    }

    pub fn parse(s: &str) -> Option<TournamentStatus> {
        match s {
            "open" => Some(TournamentStatus::Open),
            "full" => Some(TournamentStatus::Full),
            "closed" => Some(TournamentStatus::Closed),
            _ => None,
        }
    }
}

impl fmt::Display for TournamentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
