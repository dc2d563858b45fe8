pub const SCHEMA: &str = r#"
-- Members
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    email TEXT NOT NULL UNIQUE,        -- case-normalized at the edge
    password_hash TEXT NOT NULL,       -- argon2id hash with embedded salt
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    license_type TEXT NOT NULL,
    licensed INTEGER NOT NULL DEFAULT 0,
    role TEXT NOT NULL DEFAULT 'user',
    points INTEGER NOT NULL DEFAULT 0,
    participations INTEGER NOT NULL DEFAULT 0,
    created_at TEXT DEFAULT (datetime('now'))
);

-- Achievement catalog, immutable after seeding
CREATE TABLE IF NOT EXISTS achievements (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT NOT NULL,
    icon TEXT NOT NULL,
    points INTEGER NOT NULL
);

-- One row per awarded achievement
CREATE TABLE IF NOT EXISTS achievement_grants (
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    achievement_id TEXT NOT NULL REFERENCES achievements(id) ON DELETE CASCADE,
    granted_at TEXT DEFAULT (datetime('now')),
    PRIMARY KEY (user_id, achievement_id)
);

-- Tournaments
CREATE TABLE IF NOT EXISTS tournaments (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT NOT NULL,
    starts_on TEXT NOT NULL,
    ends_on TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'open',
    capacity INTEGER NOT NULL,
    paid INTEGER NOT NULL DEFAULT 0,
    price_cents INTEGER               -- NULL unless paid
);

-- Participant set; the primary key gives set semantics
CREATE TABLE IF NOT EXISTS tournament_participants (
    tournament_id TEXT NOT NULL REFERENCES tournaments(id) ON DELETE CASCADE,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    registered_at TEXT DEFAULT (datetime('now')),
    PRIMARY KEY (tournament_id, user_id)
);

-- Matches, optionally attached to a tournament
CREATE TABLE IF NOT EXISTS matches (
    id TEXT PRIMARY KEY,
    tournament_id TEXT REFERENCES tournaments(id) ON DELETE SET NULL,
    home_team TEXT NOT NULL,
    away_team TEXT NOT NULL,
    scheduled_on TEXT NOT NULL,
    starts_at TEXT NOT NULL,
    venue TEXT NOT NULL,
    home_score INTEGER,               -- NULL until played
    away_score INTEGER
);

-- News posts
CREATE TABLE IF NOT EXISTS news (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    body TEXT NOT NULL,
    author_id TEXT NOT NULL,
    author_name TEXT NOT NULL,
    published_at TEXT DEFAULT (datetime('now')),
    image_url TEXT
);

-- Weekly training slots
CREATE TABLE IF NOT EXISTS training_slots (
    id TEXT PRIMARY KEY,
    day TEXT NOT NULL,
    starts_at TEXT NOT NULL,
    ends_at TEXT NOT NULL,
    kind TEXT NOT NULL,
    required_license TEXT,            -- NULL = open to all members
    description TEXT NOT NULL
);

-- Referent sign-ups awaiting code verification; one live row per email
CREATE TABLE IF NOT EXISTS pending_referents (
    email TEXT PRIMARY KEY,
    password_hash TEXT NOT NULL,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    code TEXT NOT NULL,
    created_at TEXT DEFAULT (datetime('now')),
    expires_at TEXT NOT NULL
);
"#;
