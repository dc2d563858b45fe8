//! Participation achievements: fixed thresholds checked after every
//! participation-incrementing event.

use chrono::Utc;

use crate::error::{Error, Result};
use crate::store::Store;
use crate::types::{AchievementDef, AchievementGrant};

/// Ascending participation thresholds and the achievements they unlock.
pub const PARTICIPATION_THRESHOLDS: [(i64, &str); 3] = [
    (10, "membre_fidele"),
    (20, "toujours_present"),
    (50, "veteran"),
];

/// Grants every threshold achievement the user has earned but not yet
/// received, adding each definition's point value to the user's total.
///
/// Safe to call after any participation-incrementing action and safe to
/// call repeatedly: the at-most-one-grant invariant (enforced by the
/// store) prevents double-awarding. The check-then-insert pair is not
/// atomic, so two concurrent callers can race; the store rejects the
/// second insert and the loser moves on without awarding points.
///
/// Returns the definitions granted by this invocation.
pub fn award_participation_achievements(
    store: &dyn Store,
    user_id: &str,
) -> Result<Vec<AchievementDef>> {
    let Some(user) = store.get_user(user_id)? else {
        return Ok(Vec::new());
    };

    let mut awarded = Vec::new();
    for (required, achievement_id) in PARTICIPATION_THRESHOLDS {
        if user.participations < required {
            // Thresholds are ascending; nothing further can match.
            break;
        }
        if store.get_grant(user_id, achievement_id)?.is_some() {
            continue;
        }
        let Some(def) = store.get_achievement(achievement_id)? else {
            tracing::warn!("achievement '{achievement_id}' missing from catalog");
            continue;
        };

        let grant = AchievementGrant {
            user_id: user_id.to_string(),
            achievement_id: achievement_id.to_string(),
            granted_at: Utc::now(),
        };
        match store.create_grant(&grant) {
            Ok(()) => {}
            Err(Error::AlreadyExists) => continue,
            Err(e) => return Err(e),
        }
        store.add_points(user_id, def.points)?;

        tracing::info!("granted '{}' to user {}", def.id, user_id);
        awarded.push(def);
    }

    Ok(awarded)
}
