use std::collections::HashMap;
use std::sync::Mutex;

use super::Store;
use crate::error::{Error, Result};
use crate::types::*;

#[derive(Default)]
struct Tables {
    users: HashMap<String, User>,
    achievements: HashMap<String, AchievementDef>,
    grants: Vec<AchievementGrant>,
    tournaments: HashMap<String, Tournament>,
    matches: HashMap<String, Match>,
    news: HashMap<String, News>,
    training_slots: HashMap<String, TrainingSlot>,
    pending_referents: HashMap<String, PendingReferent>,
}

/// Ephemeral in-process store. Degraded mode: same interface as the
/// durable store, nothing survives a restart. Selected at startup with
/// `--ephemeral`; also the backend the integration tests run against.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Store for MemoryStore {
    fn initialize(&self) -> Result<()> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }

    // User operations

    fn create_user(&self, user: &User) -> Result<()> {
        let mut tables = self.tables();
        if tables.users.contains_key(&user.id)
            || tables.users.values().any(|u| u.email == user.email)
        {
            return Err(Error::AlreadyExists);
        }
        tables.users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    fn get_user(&self, id: &str) -> Result<Option<User>> {
        Ok(self.tables().users.get(id).cloned())
    }

    fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .tables()
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    fn list_users(&self, limit: i64) -> Result<Vec<User>> {
        let tables = self.tables();
        let mut users: Vec<User> = tables.users.values().cloned().collect();
        users.sort_by(|a, b| (a.created_at, &a.id).cmp(&(b.created_at, &b.id)));
        users.truncate(limit.max(0) as usize);
        Ok(users)
    }

    fn update_user(&self, user: &User) -> Result<()> {
        let mut tables = self.tables();
        if !tables.users.contains_key(&user.id) {
            return Err(Error::NotFound);
        }
        tables.users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    fn delete_user(&self, id: &str) -> Result<bool> {
        let mut tables = self.tables();
        let removed = tables.users.remove(id).is_some();
        if removed {
            tables.grants.retain(|g| g.user_id != id);
            for tournament in tables.tournaments.values_mut() {
                tournament.participants.retain(|p| p != id);
            }
        }
        Ok(removed)
    }

    fn top_users_by_points(&self, limit: i64) -> Result<Vec<User>> {
        let tables = self.tables();
        let mut users: Vec<User> = tables
            .users
            .values()
            .filter(|u| u.licensed)
            .cloned()
            .collect();
        users.sort_by(|a, b| {
            (b.points, b.participations, &a.id).cmp(&(a.points, a.participations, &b.id))
        });
        users.truncate(limit.max(0) as usize);
        Ok(users)
    }

    fn increment_participations(&self, id: &str) -> Result<()> {
        let mut tables = self.tables();
        let user = tables.users.get_mut(id).ok_or(Error::NotFound)?;
        user.participations += 1;
        Ok(())
    }

    fn add_points(&self, id: &str, points: i64) -> Result<()> {
        let mut tables = self.tables();
        let user = tables.users.get_mut(id).ok_or(Error::NotFound)?;
        user.points += points;
        Ok(())
    }

    fn admin_exists(&self) -> Result<bool> {
        Ok(self
            .tables()
            .users
            .values()
            .any(|u| u.role == Role::Admin))
    }

    // Achievement catalog

    fn create_achievement(&self, def: &AchievementDef) -> Result<()> {
        let mut tables = self.tables();
        if tables.achievements.contains_key(&def.id) {
            return Err(Error::AlreadyExists);
        }
        tables.achievements.insert(def.id.clone(), def.clone());
        Ok(())
    }

    fn get_achievement(&self, id: &str) -> Result<Option<AchievementDef>> {
        Ok(self.tables().achievements.get(id).cloned())
    }

    fn list_achievements(&self) -> Result<Vec<AchievementDef>> {
        let tables = self.tables();
        let mut defs: Vec<AchievementDef> = tables.achievements.values().cloned().collect();
        defs.sort_by(|a, b| (a.points, &a.id).cmp(&(b.points, &b.id)));
        Ok(defs)
    }

    // Achievement grants

    fn create_grant(&self, grant: &AchievementGrant) -> Result<()> {
        let mut tables = self.tables();
        if tables
            .grants
            .iter()
            .any(|g| g.user_id == grant.user_id && g.achievement_id == grant.achievement_id)
        {
            return Err(Error::AlreadyExists);
        }
        tables.grants.push(grant.clone());
        Ok(())
    }

    fn get_grant(&self, user_id: &str, achievement_id: &str) -> Result<Option<AchievementGrant>> {
        Ok(self
            .tables()
            .grants
            .iter()
            .find(|g| g.user_id == user_id && g.achievement_id == achievement_id)
            .cloned())
    }

    fn list_user_grants(&self, user_id: &str) -> Result<Vec<AchievementGrant>> {
        let tables = self.tables();
        let mut grants: Vec<AchievementGrant> = tables
            .grants
            .iter()
            .filter(|g| g.user_id == user_id)
            .cloned()
            .collect();
        grants.sort_by(|a, b| {
            (a.granted_at, &a.achievement_id).cmp(&(b.granted_at, &b.achievement_id))
        });
        Ok(grants)
    }

    // Tournament operations

    fn create_tournament(&self, tournament: &Tournament) -> Result<()> {
        let mut tables = self.tables();
        if tables.tournaments.contains_key(&tournament.id) {
            return Err(Error::AlreadyExists);
        }
        tables
            .tournaments
            .insert(tournament.id.clone(), tournament.clone());
        Ok(())
    }

    fn get_tournament(&self, id: &str) -> Result<Option<Tournament>> {
        Ok(self.tables().tournaments.get(id).cloned())
    }

    fn list_tournaments(&self, limit: i64) -> Result<Vec<Tournament>> {
        let tables = self.tables();
        let mut tournaments: Vec<Tournament> = tables.tournaments.values().cloned().collect();
        tournaments.sort_by(|a, b| (b.starts_on, &a.id).cmp(&(a.starts_on, &b.id)));
        tournaments.truncate(limit.max(0) as usize);
        Ok(tournaments)
    }

    fn update_tournament(&self, tournament: &Tournament) -> Result<()> {
        let mut tables = self.tables();
        let existing = tables
            .tournaments
            .get_mut(&tournament.id)
            .ok_or(Error::NotFound)?;
        // Scalar fields only; the participant set is owned by add_participant.
        let participants = std::mem::take(&mut existing.participants);
        *existing = tournament.clone();
        existing.participants = participants;
        Ok(())
    }

    fn delete_tournament(&self, id: &str) -> Result<bool> {
        let mut tables = self.tables();
        let removed = tables.tournaments.remove(id).is_some();
        if removed {
            for game in tables.matches.values_mut() {
                if game.tournament_id.as_deref() == Some(id) {
                    game.tournament_id = None;
                }
            }
        }
        Ok(removed)
    }

    fn add_participant(&self, tournament_id: &str, user_id: &str) -> Result<()> {
        let mut tables = self.tables();
        let tournament = tables
            .tournaments
            .get_mut(tournament_id)
            .ok_or(Error::NotFound)?;
        if tournament.participants.iter().any(|p| p == user_id) {
            return Err(Error::AlreadyExists);
        }
        tournament.participants.push(user_id.to_string());
        Ok(())
    }

    // Match operations

    fn create_match(&self, game: &Match) -> Result<()> {
        let mut tables = self.tables();
        if tables.matches.contains_key(&game.id) {
            return Err(Error::AlreadyExists);
        }
        tables.matches.insert(game.id.clone(), game.clone());
        Ok(())
    }

    fn get_match(&self, id: &str) -> Result<Option<Match>> {
        Ok(self.tables().matches.get(id).cloned())
    }

    fn list_matches(&self, limit: i64) -> Result<Vec<Match>> {
        let tables = self.tables();
        let mut matches: Vec<Match> = tables.matches.values().cloned().collect();
        matches.sort_by(|a, b| {
            (a.scheduled_on, a.starts_at, &a.id).cmp(&(b.scheduled_on, b.starts_at, &b.id))
        });
        matches.truncate(limit.max(0) as usize);
        Ok(matches)
    }

    fn update_match(&self, game: &Match) -> Result<()> {
        let mut tables = self.tables();
        if !tables.matches.contains_key(&game.id) {
            return Err(Error::NotFound);
        }
        tables.matches.insert(game.id.clone(), game.clone());
        Ok(())
    }

    fn delete_match(&self, id: &str) -> Result<bool> {
        Ok(self.tables().matches.remove(id).is_some())
    }

    // News operations

    fn create_news(&self, post: &News) -> Result<()> {
        let mut tables = self.tables();
        if tables.news.contains_key(&post.id) {
            return Err(Error::AlreadyExists);
        }
        tables.news.insert(post.id.clone(), post.clone());
        Ok(())
    }

    fn get_news(&self, id: &str) -> Result<Option<News>> {
        Ok(self.tables().news.get(id).cloned())
    }

    fn list_news(&self, limit: i64) -> Result<Vec<News>> {
        let tables = self.tables();
        let mut posts: Vec<News> = tables.news.values().cloned().collect();
        posts.sort_by(|a, b| (b.published_at, &a.id).cmp(&(a.published_at, &b.id)));
        posts.truncate(limit.max(0) as usize);
        Ok(posts)
    }

    fn update_news(&self, post: &News) -> Result<()> {
        let mut tables = self.tables();
        if !tables.news.contains_key(&post.id) {
            return Err(Error::NotFound);
        }
        tables.news.insert(post.id.clone(), post.clone());
        Ok(())
    }

    fn delete_news(&self, id: &str) -> Result<bool> {
        Ok(self.tables().news.remove(id).is_some())
    }

    // Training schedule operations

    fn create_training_slot(&self, slot: &TrainingSlot) -> Result<()> {
        let mut tables = self.tables();
        if tables.training_slots.contains_key(&slot.id) {
            return Err(Error::AlreadyExists);
        }
        tables.training_slots.insert(slot.id.clone(), slot.clone());
        Ok(())
    }

    fn get_training_slot(&self, id: &str) -> Result<Option<TrainingSlot>> {
        Ok(self.tables().training_slots.get(id).cloned())
    }

    fn list_training_slots(&self) -> Result<Vec<TrainingSlot>> {
        let tables = self.tables();
        let mut slots: Vec<TrainingSlot> = tables.training_slots.values().cloned().collect();
        slots.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(slots)
    }

    fn update_training_slot(&self, slot: &TrainingSlot) -> Result<()> {
        let mut tables = self.tables();
        if !tables.training_slots.contains_key(&slot.id) {
            return Err(Error::NotFound);
        }
        tables.training_slots.insert(slot.id.clone(), slot.clone());
        Ok(())
    }

    fn delete_training_slot(&self, id: &str) -> Result<bool> {
        Ok(self.tables().training_slots.remove(id).is_some())
    }

    // Pending referent requests

    fn upsert_pending_referent(&self, pending: &PendingReferent) -> Result<()> {
        self.tables()
            .pending_referents
            .insert(pending.email.clone(), pending.clone());
        Ok(())
    }

    fn get_pending_referent(&self, email: &str) -> Result<Option<PendingReferent>> {
        Ok(self.tables().pending_referents.get(email).cloned())
    }

    fn delete_pending_referent(&self, email: &str) -> Result<bool> {
        Ok(self.tables().pending_referents.remove(email).is_some())
    }

    fn close(&self) -> Result<()> {
        Ok(())
    }
}
