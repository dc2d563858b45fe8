use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{LicenseType, Role, TournamentStatus, User};

// Auth

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub license_type: LicenseType,
    #[serde(default)]
    pub licensed: bool,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct ReferentSignupRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Deserialize)]
pub struct ReferentVerifyRequest {
    pub email: String,
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// Profile

#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub license_type: Option<LicenseType>,
    #[serde(default)]
    pub licensed: Option<bool>,
    #[serde(default)]
    pub password: Option<String>,
}

impl UpdateProfileRequest {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.license_type.is_none()
            && self.licensed.is_none()
            && self.password.is_none()
    }
}

#[derive(Debug, Serialize)]
pub struct EarnedAchievement {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub points: i64,
    pub granted_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub user: User,
    pub achievements: Vec<EarnedAchievement>,
}

// Tournaments

fn default_capacity() -> i64 {
    16
}

#[derive(Debug, Deserialize)]
pub struct CreateTournamentRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    #[serde(default = "default_capacity")]
    pub capacity: i64,
    #[serde(default)]
    pub paid: bool,
    #[serde(default)]
    pub price_cents: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateTournamentRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub starts_on: Option<NaiveDate>,
    #[serde(default)]
    pub ends_on: Option<NaiveDate>,
    #[serde(default)]
    pub status: Option<TournamentStatus>,
    #[serde(default)]
    pub capacity: Option<i64>,
    #[serde(default)]
    pub paid: Option<bool>,
    #[serde(default)]
    pub price_cents: Option<i64>,
}

impl UpdateTournamentRequest {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.starts_on.is_none()
            && self.ends_on.is_none()
            && self.status.is_none()
            && self.capacity.is_none()
            && self.paid.is_none()
            && self.price_cents.is_none()
    }
}

// Matches

#[derive(Debug, Deserialize)]
pub struct CreateMatchRequest {
    #[serde(default)]
    pub tournament_id: Option<String>,
    pub home_team: String,
    pub away_team: String,
    pub scheduled_on: NaiveDate,
    pub starts_at: NaiveTime,
    pub venue: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateMatchRequest {
    #[serde(default)]
    pub home_team: Option<String>,
    #[serde(default)]
    pub away_team: Option<String>,
    #[serde(default)]
    pub scheduled_on: Option<NaiveDate>,
    #[serde(default)]
    pub starts_at: Option<NaiveTime>,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub home_score: Option<i64>,
    #[serde(default)]
    pub away_score: Option<i64>,
}

impl UpdateMatchRequest {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.home_team.is_none()
            && self.away_team.is_none()
            && self.scheduled_on.is_none()
            && self.starts_at.is_none()
            && self.venue.is_none()
            && self.home_score.is_none()
            && self.away_score.is_none()
    }
}

// News

#[derive(Debug, Deserialize)]
pub struct CreateNewsRequest {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateNewsRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl UpdateNewsRequest {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.body.is_none() && self.image_url.is_none()
    }
}

// Training schedule

#[derive(Debug, Deserialize)]
pub struct CreateTrainingSlotRequest {
    pub day: String,
    pub starts_at: NaiveTime,
    pub ends_at: NaiveTime,
    pub kind: String,
    #[serde(default)]
    pub required_license: Option<LicenseType>,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateTrainingSlotRequest {
    #[serde(default)]
    pub day: Option<String>,
    #[serde(default)]
    pub starts_at: Option<NaiveTime>,
    #[serde(default)]
    pub ends_at: Option<NaiveTime>,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub required_license: Option<LicenseType>,
    #[serde(default)]
    pub description: Option<String>,
}

impl UpdateTrainingSlotRequest {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.day.is_none()
            && self.starts_at.is_none()
            && self.ends_at.is_none()
            && self.kind.is_none()
            && self.required_license.is_none()
            && self.description.is_none()
    }
}

// Member management (referent)

#[derive(Debug, Default, Deserialize)]
pub struct UpdateMemberRequest {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub license_type: Option<LicenseType>,
    #[serde(default)]
    pub licensed: Option<bool>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub points: Option<i64>,
    #[serde(default)]
    pub participations: Option<i64>,
}

impl UpdateMemberRequest {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.license_type.is_none()
            && self.licensed.is_none()
            && self.role.is_none()
            && self.points.is_none()
            && self.participations.is_none()
    }
}

// Health

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub store: &'static str,
}
