//! SQLite schema definition.

/// Complete database schema for the medicine catalog.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Medicines
-- ============================================================================

CREATE TABLE IF NOT EXISTS medicines (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    price REAL,
    is_discontinued INTEGER NOT NULL DEFAULT 0,
    manufacturer_name TEXT,
    type TEXT,
    pack_size_label TEXT,
    short_composition1 TEXT,
    short_composition2 TEXT,
    uses TEXT NOT NULL DEFAULT '[]',              -- JSON array of strings
    side_effects TEXT NOT NULL DEFAULT '[]',      -- JSON array of strings
    substitutes TEXT NOT NULL DEFAULT '[]',       -- JSON array of strings
    chemical_class TEXT,
    habit_forming TEXT,
    therapeutic_class TEXT,
    action_class TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_medicines_name ON medicines(name COLLATE NOCASE);
CREATE INDEX IF NOT EXISTS idx_medicines_discontinued ON medicines(is_discontinued);
"#;
