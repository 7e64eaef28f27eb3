//! SQLite schema definitions
//!
//! Timestamps are RFC 3339 UTC text (`2025-01-01T00:00:00Z`) so that string
//! comparison matches chronological order. Array-valued columns hold JSON
//! array text. Booleans are 0/1 integers.

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Complete schema SQL
pub const SCHEMA: &str = r#"
-- =============================================================================
-- Infrastructure: Schema version tracking
-- =============================================================================
CREATE TABLE IF NOT EXISTS schema_version (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    version INTEGER NOT NULL,
    applied_at INTEGER NOT NULL,
    description TEXT
);

CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    applied_at INTEGER NOT NULL,
    checksum TEXT NOT NULL,
    execution_time_ms INTEGER,
    success INTEGER NOT NULL DEFAULT 1
);

-- =============================================================================
-- 1. Users
-- =============================================================================
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    email TEXT NOT NULL UNIQUE,
    phone TEXT,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    age INTEGER,
    gender TEXT,
    city TEXT,
    bio TEXT,
    occupation TEXT,
    budget_min INTEGER,
    budget_max INTEGER,
    cleanliness TEXT,
    smoking_preference TEXT,
    drinking_preference TEXT,
    pets_preference TEXT,
    sleep_schedule TEXT,
    email_verified INTEGER NOT NULL DEFAULT 0,
    phone_verified INTEGER NOT NULL DEFAULT 0,
    is_active INTEGER NOT NULL DEFAULT 1,
    is_banned INTEGER NOT NULL DEFAULT 0,
    suspended_until TEXT,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_users_active_created ON users(is_active, created_at);
CREATE INDEX IF NOT EXISTS idx_users_city ON users(city);

-- =============================================================================
-- 2. Listings
-- =============================================================================
CREATE TABLE IF NOT EXISTS listings (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    title TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    city TEXT NOT NULL,
    type TEXT NOT NULL CHECK(type IN ('HAVE_ROOM', 'NEED_ROOM')),
    property_type TEXT,
    room_type TEXT,
    furnished_status TEXT,
    gender_preference TEXT,
    smoking_allowed INTEGER NOT NULL DEFAULT 0,
    pets_allowed INTEGER NOT NULL DEFAULT 0,
    rent INTEGER NOT NULL,
    lease_length INTEGER,
    amenities TEXT NOT NULL DEFAULT '[]',
    available_from TEXT,
    view_count INTEGER NOT NULL DEFAULT 0,
    is_active INTEGER NOT NULL DEFAULT 1,
    is_flagged INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_listings_active_created ON listings(is_active, created_at);
CREATE INDEX IF NOT EXISTS idx_listings_user ON listings(user_id);
CREATE INDEX IF NOT EXISTS idx_listings_user_active ON listings(user_id, is_active);
CREATE INDEX IF NOT EXISTS idx_listings_rent ON listings(rent);

-- =============================================================================
-- 3. Teams
-- =============================================================================
CREATE TABLE IF NOT EXISTS teams (
    id TEXT PRIMARY KEY,
    creator_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    description TEXT,
    city TEXT,
    budget_min INTEGER,
    budget_max INTEGER,
    max_members INTEGER NOT NULL DEFAULT 4,
    is_active INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_teams_active_created ON teams(is_active, created_at);
CREATE INDEX IF NOT EXISTS idx_teams_creator ON teams(creator_id);

CREATE TABLE IF NOT EXISTS team_members (
    team_id TEXT NOT NULL REFERENCES teams(id) ON DELETE CASCADE,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    status TEXT NOT NULL DEFAULT 'PENDING' CHECK(status IN ('PENDING', 'ACCEPTED', 'REJECTED')),
    created_at TEXT NOT NULL,
    PRIMARY KEY (team_id, user_id)
);

CREATE INDEX IF NOT EXISTS idx_team_members_user ON team_members(user_id, status);
CREATE INDEX IF NOT EXISTS idx_team_members_team_status ON team_members(team_id, status);

-- =============================================================================
-- 4. Reviews
-- =============================================================================
CREATE TABLE IF NOT EXISTS reviews (
    id TEXT PRIMARY KEY,
    reviewer_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    reviewee_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    rating INTEGER NOT NULL CHECK(rating >= 1 AND rating <= 5),
    comment TEXT,
    is_hidden INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    UNIQUE (reviewer_id, reviewee_id)
);

CREATE INDEX IF NOT EXISTS idx_reviews_reviewee ON reviews(reviewee_id, is_hidden, created_at);
"#;
