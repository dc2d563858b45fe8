mod memory;
mod schema;
pub mod seed;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::error::Result;
use crate::types::*;

/// Store defines the database interface.
///
/// Two implementations exist: [`SqliteStore`] (durable) and [`MemoryStore`]
/// (ephemeral, degraded mode). The backend is selected once at startup and
/// never mixed within a request path.
///
/// Uniqueness of user emails, (user, achievement) grants, and
/// (tournament, participant) pairs is enforced here; violations surface as
/// `Error::AlreadyExists`. List operations apply a stable ordering so
/// handlers stay thin.
pub trait Store: Send + Sync {
    fn initialize(&self) -> Result<()>;

    /// Short backend name for the health payload.
    fn backend(&self) -> &'static str;

    // User operations
    fn create_user(&self, user: &User) -> Result<()>;
    fn get_user(&self, id: &str) -> Result<Option<User>>;
    fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    /// Ordered by creation time.
    fn list_users(&self, limit: i64) -> Result<Vec<User>>;
    fn update_user(&self, user: &User) -> Result<()>;
    /// Cascades to the user's achievement grants and tournament entries.
    fn delete_user(&self, id: &str) -> Result<bool>;
    /// Licensed users ordered by points descending.
    fn top_users_by_points(&self, limit: i64) -> Result<Vec<User>>;
    fn increment_participations(&self, id: &str) -> Result<()>;
    fn add_points(&self, id: &str, points: i64) -> Result<()>;
    fn admin_exists(&self) -> Result<bool>;

    // Achievement catalog
    fn create_achievement(&self, def: &AchievementDef) -> Result<()>;
    fn get_achievement(&self, id: &str) -> Result<Option<AchievementDef>>;
    fn list_achievements(&self) -> Result<Vec<AchievementDef>>;

    // Achievement grants
    fn create_grant(&self, grant: &AchievementGrant) -> Result<()>;
    fn get_grant(&self, user_id: &str, achievement_id: &str) -> Result<Option<AchievementGrant>>;
    fn list_user_grants(&self, user_id: &str) -> Result<Vec<AchievementGrant>>;

    // Tournament operations
    fn create_tournament(&self, tournament: &Tournament) -> Result<()>;
    fn get_tournament(&self, id: &str) -> Result<Option<Tournament>>;
    /// Ordered by start date descending.
    fn list_tournaments(&self, limit: i64) -> Result<Vec<Tournament>>;
    /// Updates scalar fields only; the participant set is managed through
    /// [`Store::add_participant`].
    fn update_tournament(&self, tournament: &Tournament) -> Result<()>;
    fn delete_tournament(&self, id: &str) -> Result<bool>;
    fn add_participant(&self, tournament_id: &str, user_id: &str) -> Result<()>;

    // Match operations
    fn create_match(&self, game: &Match) -> Result<()>;
    fn get_match(&self, id: &str) -> Result<Option<Match>>;
    /// Ordered by scheduled date ascending.
    fn list_matches(&self, limit: i64) -> Result<Vec<Match>>;
    fn update_match(&self, game: &Match) -> Result<()>;
    fn delete_match(&self, id: &str) -> Result<bool>;

    // News operations
    fn create_news(&self, post: &News) -> Result<()>;
    fn get_news(&self, id: &str) -> Result<Option<News>>;
    /// Ordered by publication time descending.
    fn list_news(&self, limit: i64) -> Result<Vec<News>>;
    fn update_news(&self, post: &News) -> Result<()>;
    fn delete_news(&self, id: &str) -> Result<bool>;

    // Training schedule operations
    fn create_training_slot(&self, slot: &TrainingSlot) -> Result<()>;
    fn get_training_slot(&self, id: &str) -> Result<Option<TrainingSlot>>;
    fn list_training_slots(&self) -> Result<Vec<TrainingSlot>>;
    fn update_training_slot(&self, slot: &TrainingSlot) -> Result<()>;
    fn delete_training_slot(&self, id: &str) -> Result<bool>;

    // Pending referent requests
    /// Replaces any prior pending request for the same email.
    fn upsert_pending_referent(&self, pending: &PendingReferent) -> Result<()>;
    fn get_pending_referent(&self, email: &str) -> Result<Option<PendingReferent>>;
    fn delete_pending_referent(&self, email: &str) -> Result<bool>;

    fn close(&self) -> Result<()>;
}
