use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::{LicenseType, Role, TournamentStatus};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub license_type: LicenseType,
    pub licensed: bool,
    pub role: Role,
    pub points: i64,
    pub participations: i64,
    pub created_at: DateTime<Utc>,
}

impl User {
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Static catalog entry; immutable once seeded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AchievementDef {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub points: i64,
}

/// One recorded award of an achievement to a user.
/// At most one grant exists per (user, achievement) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AchievementGrant {
    pub user_id: String,
    pub achievement_id: String,
    pub granted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tournament {
    pub id: String,
    pub name: String,
    pub description: String,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    pub status: TournamentStatus,
    /// Participant user ids, set semantics: no duplicates, never more
    /// than `capacity` entries.
    pub participants: Vec<String>,
    pub capacity: i64,
    pub paid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_cents: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tournament_id: Option<String>,
    pub home_team: String,
    pub away_team: String,
    pub scheduled_on: NaiveDate,
    pub starts_at: NaiveTime,
    pub venue: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_score: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub away_score: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct News {
    pub id: String,
    pub title: String,
    pub body: String,
    pub author_id: String,
    pub author_name: String,
    pub published_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// A recurring weekly training slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingSlot {
    pub id: String,
    pub day: String,
    pub starts_at: NaiveTime,
    pub ends_at: NaiveTime,
    pub kind: String,
    /// License class required to attend; `None` means open to all members.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_license: Option<LicenseType>,
    pub description: String,
}

/// Transient referent sign-up awaiting code verification.
/// At most one live record per email; consumed on verify or expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingReferent {
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip)]
    pub code: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}
