use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

use super::Store;
use super::schema::SCHEMA;
use crate::error::{Error, Result};
use crate::types::*;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn load_participants(&self, conn: &Connection, tournament_id: &str) -> Result<Vec<String>> {
        let mut stmt = conn.prepare(
            "SELECT user_id FROM tournament_participants
             WHERE tournament_id = ?1 ORDER BY registered_at, user_id",
        )?;
        let rows = stmt.query_map(params![tournament_id], |row| row.get(0))?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // Handle SQLite's default datetime format: "YYYY-MM-DD HH:MM:SS"
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            tracing::error!("Invalid datetime in database: '{}' - {}", s, e);
            Utc::now()
        })
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn parse_date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap_or_else(|e| {
        tracing::error!("Invalid date in database: '{}' - {}", s, e);
        Utc::now().date_naive()
    })
}

fn parse_time(s: &str) -> NaiveTime {
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .unwrap_or_else(|e| {
            tracing::error!("Invalid time in database: '{}' - {}", s, e);
            NaiveTime::MIN
        })
}

fn format_time(t: &NaiveTime) -> String {
    t.format("%H:%M:%S").to_string()
}

fn parse_role(s: &str) -> Role {
    Role::parse(s).unwrap_or_else(|| {
        tracing::error!("Invalid role in database: '{}'", s);
        Role::User
    })
}

fn parse_license(s: &str) -> LicenseType {
    LicenseType::parse(s).unwrap_or_else(|| {
        tracing::error!("Invalid license type in database: '{}'", s);
        LicenseType::Recreational
    })
}

fn parse_status(s: &str) -> TournamentStatus {
    TournamentStatus::parse(s).unwrap_or_else(|| {
        tracing::error!("Invalid tournament status in database: '{}'", s);
        TournamentStatus::Closed
    })
}

/// Maps UNIQUE/PRIMARY KEY violations to `AlreadyExists`.
fn map_constraint(e: rusqlite::Error) -> Error {
    match e {
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Error::AlreadyExists
        }
        other => Error::Database(other),
    }
}

fn map_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        password_hash: row.get(2)?,
        first_name: row.get(3)?,
        last_name: row.get(4)?,
        license_type: parse_license(&row.get::<_, String>(5)?),
        licensed: row.get(6)?,
        role: parse_role(&row.get::<_, String>(7)?),
        points: row.get(8)?,
        participations: row.get(9)?,
        created_at: parse_datetime(&row.get::<_, String>(10)?),
    })
}

const USER_COLUMNS: &str = "id, email, password_hash, first_name, last_name, license_type, \
                            licensed, role, points, participations, created_at";

fn map_match(row: &Row<'_>) -> rusqlite::Result<Match> {
    Ok(Match {
        id: row.get(0)?,
        tournament_id: row.get(1)?,
        home_team: row.get(2)?,
        away_team: row.get(3)?,
        scheduled_on: parse_date(&row.get::<_, String>(4)?),
        starts_at: parse_time(&row.get::<_, String>(5)?),
        venue: row.get(6)?,
        home_score: row.get(7)?,
        away_score: row.get(8)?,
    })
}

fn map_news(row: &Row<'_>) -> rusqlite::Result<News> {
    Ok(News {
        id: row.get(0)?,
        title: row.get(1)?,
        body: row.get(2)?,
        author_id: row.get(3)?,
        author_name: row.get(4)?,
        published_at: parse_datetime(&row.get::<_, String>(5)?),
        image_url: row.get(6)?,
    })
}

fn map_training_slot(row: &Row<'_>) -> rusqlite::Result<TrainingSlot> {
    Ok(TrainingSlot {
        id: row.get(0)?,
        day: row.get(1)?,
        starts_at: parse_time(&row.get::<_, String>(2)?),
        ends_at: parse_time(&row.get::<_, String>(3)?),
        kind: row.get(4)?,
        required_license: row
            .get::<_, Option<String>>(5)?
            .map(|s| parse_license(&s)),
        description: row.get(6)?,
    })
}

impl Store for SqliteStore {
    fn initialize(&self) -> Result<()> {
        self.conn().execute_batch(SCHEMA)?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "sqlite"
    }

    // User operations

    fn create_user(&self, user: &User) -> Result<()> {
        self.conn()
            .execute(
                "INSERT INTO users (id, email, password_hash, first_name, last_name, license_type,
                                    licensed, role, points, participations, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    user.id,
                    user.email,
                    user.password_hash,
                    user.first_name,
                    user.last_name,
                    user.license_type.as_str(),
                    user.licensed,
                    user.role.as_str(),
                    user.points,
                    user.participations,
                    format_datetime(&user.created_at),
                ],
            )
            .map_err(map_constraint)?;
        Ok(())
    }

    fn get_user(&self, id: &str) -> Result<Option<User>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            params![id],
            map_user,
        )
        .optional()
        .map_err(Error::from)
    }

    fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
            params![email],
            map_user,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_users(&self, limit: i64) -> Result<Vec<User>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at, id LIMIT ?1"
        ))?;
        let rows = stmt.query_map(params![limit], map_user)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_user(&self, user: &User) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE users SET email = ?1, password_hash = ?2, first_name = ?3, last_name = ?4,
                              license_type = ?5, licensed = ?6, role = ?7, points = ?8,
                              participations = ?9
             WHERE id = ?10",
            params![
                user.email,
                user.password_hash,
                user.first_name,
                user.last_name,
                user.license_type.as_str(),
                user.licensed,
                user.role.as_str(),
                user.points,
                user.participations,
                user.id,
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn delete_user(&self, id: &str) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM users WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    fn top_users_by_points(&self, limit: i64) -> Result<Vec<User>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE licensed = 1
             ORDER BY points DESC, participations DESC, id LIMIT ?1"
        ))?;
        let rows = stmt.query_map(params![limit], map_user)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn increment_participations(&self, id: &str) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE users SET participations = participations + 1 WHERE id = ?1",
            params![id],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn add_points(&self, id: &str, points: i64) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE users SET points = points + ?1 WHERE id = ?2",
            params![points, id],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn admin_exists(&self) -> Result<bool> {
        let conn = self.conn();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM users WHERE role = 'admin'",
            [],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    // Achievement catalog

    fn create_achievement(&self, def: &AchievementDef) -> Result<()> {
        self.conn()
            .execute(
                "INSERT INTO achievements (id, name, description, icon, points)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![def.id, def.name, def.description, def.icon, def.points],
            )
            .map_err(map_constraint)?;
        Ok(())
    }

    fn get_achievement(&self, id: &str) -> Result<Option<AchievementDef>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, name, description, icon, points FROM achievements WHERE id = ?1",
            params![id],
            |row| {
                Ok(AchievementDef {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    description: row.get(2)?,
                    icon: row.get(3)?,
                    points: row.get(4)?,
                })
            },
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_achievements(&self) -> Result<Vec<AchievementDef>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare("SELECT id, name, description, icon, points FROM achievements ORDER BY points")?;
        let rows = stmt.query_map([], |row| {
            Ok(AchievementDef {
                id: row.get(0)?,
                name: row.get(1)?,
                description: row.get(2)?,
                icon: row.get(3)?,
                points: row.get(4)?,
            })
        })?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    // Achievement grants

    fn create_grant(&self, grant: &AchievementGrant) -> Result<()> {
        self.conn()
            .execute(
                "INSERT INTO achievement_grants (user_id, achievement_id, granted_at)
                 VALUES (?1, ?2, ?3)",
                params![
                    grant.user_id,
                    grant.achievement_id,
                    format_datetime(&grant.granted_at),
                ],
            )
            .map_err(map_constraint)?;
        Ok(())
    }

    fn get_grant(&self, user_id: &str, achievement_id: &str) -> Result<Option<AchievementGrant>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT user_id, achievement_id, granted_at FROM achievement_grants
             WHERE user_id = ?1 AND achievement_id = ?2",
            params![user_id, achievement_id],
            |row| {
                Ok(AchievementGrant {
                    user_id: row.get(0)?,
                    achievement_id: row.get(1)?,
                    granted_at: parse_datetime(&row.get::<_, String>(2)?),
                })
            },
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_user_grants(&self, user_id: &str) -> Result<Vec<AchievementGrant>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT user_id, achievement_id, granted_at FROM achievement_grants
             WHERE user_id = ?1 ORDER BY granted_at, achievement_id",
        )?;
        let rows = stmt.query_map(params![user_id], |row| {
            Ok(AchievementGrant {
                user_id: row.get(0)?,
                achievement_id: row.get(1)?,
                granted_at: parse_datetime(&row.get::<_, String>(2)?),
            })
        })?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    // Tournament operations

    fn create_tournament(&self, tournament: &Tournament) -> Result<()> {
        self.conn().execute(
            "INSERT INTO tournaments (id, name, description, starts_on, ends_on, status,
                                      capacity, paid, price_cents)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                tournament.id,
                tournament.name,
                tournament.description,
                tournament.starts_on.to_string(),
                tournament.ends_on.to_string(),
                tournament.status.as_str(),
                tournament.capacity,
                tournament.paid,
                tournament.price_cents,
            ],
        )?;
        Ok(())
    }

    fn get_tournament(&self, id: &str) -> Result<Option<Tournament>> {
        let conn = self.conn();
        let tournament = conn
            .query_row(
                "SELECT id, name, description, starts_on, ends_on, status, capacity, paid, price_cents
                 FROM tournaments WHERE id = ?1",
                params![id],
                |row| {
                    Ok(Tournament {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        description: row.get(2)?,
                        starts_on: parse_date(&row.get::<_, String>(3)?),
                        ends_on: parse_date(&row.get::<_, String>(4)?),
                        status: parse_status(&row.get::<_, String>(5)?),
                        participants: Vec::new(),
                        capacity: row.get(6)?,
                        paid: row.get(7)?,
                        price_cents: row.get(8)?,
                    })
                },
            )
            .optional()?;

        match tournament {
            Some(mut t) => {
                t.participants = self.load_participants(&conn, &t.id)?;
                Ok(Some(t))
            }
            None => Ok(None),
        }
    }

    fn list_tournaments(&self, limit: i64) -> Result<Vec<Tournament>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, name, description, starts_on, ends_on, status, capacity, paid, price_cents
             FROM tournaments ORDER BY starts_on DESC, id LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit], |row| {
            Ok(Tournament {
                id: row.get(0)?,
                name: row.get(1)?,
                description: row.get(2)?,
                starts_on: parse_date(&row.get::<_, String>(3)?),
                ends_on: parse_date(&row.get::<_, String>(4)?),
                status: parse_status(&row.get::<_, String>(5)?),
                participants: Vec::new(),
                capacity: row.get(6)?,
                paid: row.get(7)?,
                price_cents: row.get(8)?,
            })
        })?;

        let mut tournaments = rows
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)?;
        for t in &mut tournaments {
            t.participants = self.load_participants(&conn, &t.id)?;
        }
        Ok(tournaments)
    }

    fn update_tournament(&self, tournament: &Tournament) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE tournaments SET name = ?1, description = ?2, starts_on = ?3, ends_on = ?4,
                                    status = ?5, capacity = ?6, paid = ?7, price_cents = ?8
             WHERE id = ?9",
            params![
                tournament.name,
                tournament.description,
                tournament.starts_on.to_string(),
                tournament.ends_on.to_string(),
                tournament.status.as_str(),
                tournament.capacity,
                tournament.paid,
                tournament.price_cents,
                tournament.id,
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn delete_tournament(&self, id: &str) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM tournaments WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    fn add_participant(&self, tournament_id: &str, user_id: &str) -> Result<()> {
        self.conn()
            .execute(
                "INSERT INTO tournament_participants (tournament_id, user_id, registered_at)
                 VALUES (?1, ?2, ?3)",
                params![tournament_id, user_id, format_datetime(&Utc::now())],
            )
            .map_err(map_constraint)?;
        Ok(())
    }

    // Match operations

    fn create_match(&self, game: &Match) -> Result<()> {
        self.conn().execute(
            "INSERT INTO matches (id, tournament_id, home_team, away_team, scheduled_on,
                                  starts_at, venue, home_score, away_score)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                game.id,
                game.tournament_id,
                game.home_team,
                game.away_team,
                game.scheduled_on.to_string(),
                format_time(&game.starts_at),
                game.venue,
                game.home_score,
                game.away_score,
            ],
        )?;
        Ok(())
    }

    fn get_match(&self, id: &str) -> Result<Option<Match>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, tournament_id, home_team, away_team, scheduled_on, starts_at, venue,
                    home_score, away_score
             FROM matches WHERE id = ?1",
            params![id],
            map_match,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_matches(&self, limit: i64) -> Result<Vec<Match>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, tournament_id, home_team, away_team, scheduled_on, starts_at, venue,
                    home_score, away_score
             FROM matches ORDER BY scheduled_on, starts_at, id LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit], map_match)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_match(&self, game: &Match) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE matches SET tournament_id = ?1, home_team = ?2, away_team = ?3,
                                scheduled_on = ?4, starts_at = ?5, venue = ?6,
                                home_score = ?7, away_score = ?8
             WHERE id = ?9",
            params![
                game.tournament_id,
                game.home_team,
                game.away_team,
                game.scheduled_on.to_string(),
                format_time(&game.starts_at),
                game.venue,
                game.home_score,
                game.away_score,
                game.id,
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn delete_match(&self, id: &str) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM matches WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    // News operations

    fn create_news(&self, post: &News) -> Result<()> {
        self.conn().execute(
            "INSERT INTO news (id, title, body, author_id, author_name, published_at, image_url)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                post.id,
                post.title,
                post.body,
                post.author_id,
                post.author_name,
                format_datetime(&post.published_at),
                post.image_url,
            ],
        )?;
        Ok(())
    }

    fn get_news(&self, id: &str) -> Result<Option<News>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, title, body, author_id, author_name, published_at, image_url
             FROM news WHERE id = ?1",
            params![id],
            map_news,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_news(&self, limit: i64) -> Result<Vec<News>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, title, body, author_id, author_name, published_at, image_url
             FROM news ORDER BY published_at DESC, id LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit], map_news)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_news(&self, post: &News) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE news SET title = ?1, body = ?2, image_url = ?3 WHERE id = ?4",
            params![post.title, post.body, post.image_url, post.id],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn delete_news(&self, id: &str) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM news WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    // Training schedule operations

    fn create_training_slot(&self, slot: &TrainingSlot) -> Result<()> {
        self.conn().execute(
            "INSERT INTO training_slots (id, day, starts_at, ends_at, kind, required_license,
                                         description)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                slot.id,
                slot.day,
                format_time(&slot.starts_at),
                format_time(&slot.ends_at),
                slot.kind,
                slot.required_license.map(|l| l.as_str()),
                slot.description,
            ],
        )?;
        Ok(())
    }

    fn get_training_slot(&self, id: &str) -> Result<Option<TrainingSlot>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, day, starts_at, ends_at, kind, required_license, description
             FROM training_slots WHERE id = ?1",
            params![id],
            map_training_slot,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_training_slots(&self) -> Result<Vec<TrainingSlot>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, day, starts_at, ends_at, kind, required_license, description
             FROM training_slots ORDER BY id",
        )?;
        let rows = stmt.query_map([], map_training_slot)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_training_slot(&self, slot: &TrainingSlot) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE training_slots SET day = ?1, starts_at = ?2, ends_at = ?3, kind = ?4,
                                       required_license = ?5, description = ?6
             WHERE id = ?7",
            params![
                slot.day,
                format_time(&slot.starts_at),
                format_time(&slot.ends_at),
                slot.kind,
                slot.required_license.map(|l| l.as_str()),
                slot.description,
                slot.id,
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn delete_training_slot(&self, id: &str) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM training_slots WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    // Pending referent requests

    fn upsert_pending_referent(&self, pending: &PendingReferent) -> Result<()> {
        self.conn().execute(
            "INSERT OR REPLACE INTO pending_referents
                 (email, password_hash, first_name, last_name, code, created_at, expires_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                pending.email,
                pending.password_hash,
                pending.first_name,
                pending.last_name,
                pending.code,
                format_datetime(&pending.created_at),
                format_datetime(&pending.expires_at),
            ],
        )?;
        Ok(())
    }

    fn get_pending_referent(&self, email: &str) -> Result<Option<PendingReferent>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT email, password_hash, first_name, last_name, code, created_at, expires_at
             FROM pending_referents WHERE email = ?1",
            params![email],
            |row| {
                Ok(PendingReferent {
                    email: row.get(0)?,
                    password_hash: row.get(1)?,
                    first_name: row.get(2)?,
                    last_name: row.get(3)?,
                    code: row.get(4)?,
                    created_at: parse_datetime(&row.get::<_, String>(5)?),
                    expires_at: parse_datetime(&row.get::<_, String>(6)?),
                })
            },
        )
        .optional()
        .map_err(Error::from)
    }

    fn delete_pending_referent(&self, email: &str) -> Result<bool> {
        let rows = self.conn().execute(
            "DELETE FROM pending_referents WHERE email = ?1",
            params![email],
        )?;
        Ok(rows > 0)
    }

    fn close(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> (tempfile::TempDir, SqliteStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::new(dir.path().join("libero.db")).unwrap();
        store.initialize().unwrap();
        (dir, store)
    }

    fn sample_user(id: &str, email: &str) -> User {
        User {
            id: id.to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$test".to_string(),
            first_name: "Ana".to_string(),
            last_name: "Moreau".to_string(),
            license_type: LicenseType::Competition,
            licensed: true,
            role: Role::User,
            points: 0,
            participations: 0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_user_roundtrip() {
        let (_dir, store) = test_store();
        let user = sample_user("u1", "ana@club.test");
        store.create_user(&user).unwrap();

        let loaded = store.get_user("u1").unwrap().unwrap();
        assert_eq!(loaded.email, "ana@club.test");
        assert_eq!(loaded.role, Role::User);
        assert!(loaded.licensed);

        let by_email = store.get_user_by_email("ana@club.test").unwrap().unwrap();
        assert_eq!(by_email.id, "u1");
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let (_dir, store) = test_store();
        store.create_user(&sample_user("u1", "ana@club.test")).unwrap();

        let result = store.create_user(&sample_user("u2", "ana@club.test"));
        assert!(matches!(result, Err(Error::AlreadyExists)));
    }

    #[test]
    fn test_delete_user_cascades_grants() {
        let (_dir, store) = test_store();
        store.create_user(&sample_user("u1", "ana@club.test")).unwrap();
        store
            .create_achievement(&AchievementDef {
                id: "membre_fidele".to_string(),
                name: "Membre Fidèle".to_string(),
                description: "10 participations".to_string(),
                icon: "🏐".to_string(),
                points: 100,
            })
            .unwrap();
        store
            .create_grant(&AchievementGrant {
                user_id: "u1".to_string(),
                achievement_id: "membre_fidele".to_string(),
                granted_at: Utc::now(),
            })
            .unwrap();

        assert!(store.delete_user("u1").unwrap());
        assert!(store.get_grant("u1", "membre_fidele").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_grant_rejected() {
        let (_dir, store) = test_store();
        store.create_user(&sample_user("u1", "ana@club.test")).unwrap();
        store
            .create_achievement(&AchievementDef {
                id: "veteran".to_string(),
                name: "Vétéran".to_string(),
                description: "50 participations".to_string(),
                icon: "👑".to_string(),
                points: 500,
            })
            .unwrap();

        let grant = AchievementGrant {
            user_id: "u1".to_string(),
            achievement_id: "veteran".to_string(),
            granted_at: Utc::now(),
        };
        store.create_grant(&grant).unwrap();
        assert!(matches!(store.create_grant(&grant), Err(Error::AlreadyExists)));
    }

    #[test]
    fn test_participant_set_semantics() {
        let (_dir, store) = test_store();
        store.create_user(&sample_user("u1", "ana@club.test")).unwrap();
        store
            .create_tournament(&Tournament {
                id: "t1".to_string(),
                name: "Tournoi de printemps".to_string(),
                description: "Ouvert aux licenciés".to_string(),
                starts_on: NaiveDate::from_ymd_opt(2026, 4, 4).unwrap(),
                ends_on: NaiveDate::from_ymd_opt(2026, 4, 5).unwrap(),
                status: TournamentStatus::Open,
                participants: Vec::new(),
                capacity: 16,
                paid: false,
                price_cents: None,
            })
            .unwrap();

        store.add_participant("t1", "u1").unwrap();
        assert!(matches!(
            store.add_participant("t1", "u1"),
            Err(Error::AlreadyExists)
        ));

        let t = store.get_tournament("t1").unwrap().unwrap();
        assert_eq!(t.participants, vec!["u1".to_string()]);
    }

    #[test]
    fn test_increment_and_points() {
        let (_dir, store) = test_store();
        store.create_user(&sample_user("u1", "ana@club.test")).unwrap();

        store.increment_participations("u1").unwrap();
        store.add_points("u1", 100).unwrap();

        let user = store.get_user("u1").unwrap().unwrap();
        assert_eq!(user.participations, 1);
        assert_eq!(user.points, 100);

        assert!(matches!(
            store.increment_participations("missing"),
            Err(Error::NotFound)
        ));
    }

    #[test]
    fn test_pending_referent_replaced_per_email() {
        let (_dir, store) = test_store();
        let now = Utc::now();
        let mut pending = PendingReferent {
            email: "ref@club.test".to_string(),
            password_hash: "$argon2id$test".to_string(),
            first_name: "Lou".to_string(),
            last_name: "Garnier".to_string(),
            code: "111111".to_string(),
            created_at: now,
            expires_at: now + chrono::Duration::minutes(30),
        };
        store.upsert_pending_referent(&pending).unwrap();

        pending.code = "222222".to_string();
        store.upsert_pending_referent(&pending).unwrap();

        let loaded = store.get_pending_referent("ref@club.test").unwrap().unwrap();
        assert_eq!(loaded.code, "222222");

        assert!(store.delete_pending_referent("ref@club.test").unwrap());
        assert!(store.get_pending_referent("ref@club.test").unwrap().is_none());
    }
}
