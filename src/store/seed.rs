//! Idempotent seeding of the static catalog: achievement definitions and
//! the weekly training slots. Run from `admin init` and test setup; seeding
//! an already-seeded store inserts nothing.

use chrono::{NaiveTime, Utc};
use uuid::Uuid;

use super::Store;
use crate::auth::Hasher;
use crate::error::Result;
use crate::types::{AchievementDef, LicenseType, Role, TrainingSlot, User};

pub fn achievement_catalog() -> Vec<AchievementDef> {
    vec![
        AchievementDef {
            id: "premier_tournoi".to_string(),
            name: "Premier Tournoi".to_string(),
            description: "S'inscrire à son premier tournoi".to_string(),
            icon: "🎯".to_string(),
            points: 50,
        },
        AchievementDef {
            id: "membre_fidele".to_string(),
            name: "Membre Fidèle".to_string(),
            description: "Participer à 10 événements du club".to_string(),
            icon: "🏐".to_string(),
            points: 100,
        },
        AchievementDef {
            id: "toujours_present".to_string(),
            name: "Toujours Présent".to_string(),
            description: "Participer à 20 événements du club".to_string(),
            icon: "⭐".to_string(),
            points: 250,
        },
        AchievementDef {
            id: "veteran".to_string(),
            name: "Vétéran".to_string(),
            description: "Participer à 50 événements du club".to_string(),
            icon: "👑".to_string(),
            points: 500,
        },
        AchievementDef {
            id: "champion".to_string(),
            name: "Champion du Club".to_string(),
            description: "Gagner 3 tournois".to_string(),
            icon: "🏆".to_string(),
            points: 1000,
        },
    ]
}

fn training_slots() -> Vec<TrainingSlot> {
    let at = |h, m| NaiveTime::from_hms_opt(h, m, 0).expect("invalid slot time");

    let coached = |id: &str, day: &str, start, end| TrainingSlot {
        id: id.to_string(),
        day: day.to_string(),
        starts_at: start,
        ends_at: end,
        kind: "Entraînement".to_string(),
        required_license: Some(LicenseType::Competition),
        description: "Entraînement dirigé pour les licenciés Compétition".to_string(),
    };
    let open_play = |id: &str, day: &str, start, end| TrainingSlot {
        id: id.to_string(),
        day: day.to_string(),
        starts_at: start,
        ends_at: end,
        kind: "Jeu Libre".to_string(),
        required_license: None,
        description: "Jeu libre ouvert à tous les licenciés".to_string(),
    };

    vec![
        coached("lundi-entrainement", "Lundi", at(18, 0), at(20, 0)),
        open_play("lundi-jeu-libre", "Lundi", at(20, 0), at(22, 0)),
        coached("mercredi-entrainement", "Mercredi", at(18, 0), at(20, 0)),
        open_play("mercredi-jeu-libre", "Mercredi", at(20, 0), at(22, 0)),
        open_play("vendredi-jeu-libre", "Vendredi", at(18, 0), at(22, 0)),
    ]
}

/// Seeds achievement definitions and training slots when absent.
pub fn seed_catalog(store: &dyn Store) -> Result<()> {
    if store.list_achievements()?.is_empty() {
        for def in achievement_catalog() {
            store.create_achievement(&def)?;
        }
    }

    if store.list_training_slots()?.is_empty() {
        for slot in training_slots() {
            store.create_training_slot(&slot)?;
        }
    }

    Ok(())
}

/// Creates the first admin account unless one already exists.
/// Returns the new admin's id, or `None` when an admin was already present.
pub fn seed_admin(
    store: &dyn Store,
    hasher: &Hasher,
    email: &str,
    password: &str,
) -> Result<Option<String>> {
    if store.admin_exists()? {
        return Ok(None);
    }

    let user = User {
        id: Uuid::new_v4().to_string(),
        email: email.to_string(),
        password_hash: hasher.hash(password)?,
        first_name: "Admin".to_string(),
        last_name: "Club".to_string(),
        license_type: LicenseType::Competition,
        licensed: true,
        role: Role::Admin,
        points: 0,
        participations: 0,
        created_at: Utc::now(),
    };
    store.create_user(&user)?;
    Ok(Some(user.id))
}
