//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode. UUIDs and calendar dates
//! (`YYYY-MM-DD`) are stored as strings. Enums are stored as strings with
//! ASSERT constraints. Migrations are append-only: never edit an applied
//! one, add a new version instead.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "initial_schema",
        sql: SCHEMA_V1,
    },
    Migration {
        version: 2,
        name: "add_lease_unit_number",
        sql: SCHEMA_V2,
    },
    Migration {
        version: 3,
        name: "add_tenant_property_unit",
        sql: SCHEMA_V3,
    },
    Migration {
        version: 4,
        name: "add_tenant_kind",
        sql: SCHEMA_V4,
    },
];

// -----------------------------------------------------------------------
// v1: initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Staff accounts
-- =======================================================================
DEFINE TABLE user SCHEMAFULL;
DEFINE FIELD email ON TABLE user TYPE string;
DEFINE FIELD password_hash ON TABLE user TYPE string;
DEFINE FIELD role ON TABLE user TYPE string DEFAULT 'member';
DEFINE FIELD created_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_user_email ON TABLE user COLUMNS email UNIQUE;

-- =======================================================================
-- Login sessions
-- =======================================================================
DEFINE TABLE session SCHEMAFULL;
DEFINE FIELD user_id ON TABLE session TYPE string;
DEFINE FIELD token_hash ON TABLE session TYPE string;
DEFINE FIELD csrf_token ON TABLE session TYPE string;
DEFINE FIELD expires_at ON TABLE session TYPE datetime;
DEFINE FIELD created_at ON TABLE session TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_session_token_hash ON TABLE session \
    COLUMNS token_hash UNIQUE;
DEFINE INDEX idx_session_user ON TABLE session COLUMNS user_id;

-- =======================================================================
-- Properties (names are unique by merge, not by index)
-- =======================================================================
DEFINE TABLE property SCHEMAFULL;
DEFINE FIELD name ON TABLE property TYPE string;
DEFINE FIELD address ON TABLE property TYPE string;
DEFINE FIELD note ON TABLE property TYPE option<string>;
DEFINE FIELD created_at ON TABLE property TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE property TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_property_name ON TABLE property COLUMNS name;

-- =======================================================================
-- Tenants
-- =======================================================================
DEFINE TABLE tenant SCHEMAFULL;
DEFINE FIELD name ON TABLE tenant TYPE string;
DEFINE FIELD email ON TABLE tenant TYPE option<string>;
DEFINE FIELD phone ON TABLE tenant TYPE option<string>;
DEFINE FIELD created_at ON TABLE tenant TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE tenant TYPE datetime \
    DEFAULT time::now();

-- =======================================================================
-- Leases
-- =======================================================================
DEFINE TABLE lease SCHEMAFULL;
DEFINE FIELD property_id ON TABLE lease TYPE string;
DEFINE FIELD tenant_id ON TABLE lease TYPE string;
DEFINE FIELD rent ON TABLE lease TYPE int ASSERT $value >= 0;
DEFINE FIELD start_date ON TABLE lease TYPE string;
DEFINE FIELD end_date ON TABLE lease TYPE option<string>;
DEFINE FIELD status ON TABLE lease TYPE string \
    ASSERT $value IN ['active', 'pending', 'terminated'] \
    DEFAULT 'pending';
DEFINE FIELD created_at ON TABLE lease TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE lease TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_lease_property ON TABLE lease COLUMNS property_id;
DEFINE INDEX idx_lease_tenant ON TABLE lease COLUMNS tenant_id;
";

// -----------------------------------------------------------------------
// v2: leases record which unit they cover
// -----------------------------------------------------------------------

const SCHEMA_V2: &str = "\
DEFINE FIELD unit_number ON TABLE lease TYPE option<string>;
DEFINE INDEX idx_lease_property_unit ON TABLE lease \
    COLUMNS property_id, unit_number;
";

// -----------------------------------------------------------------------
// v3: tenants belong to a property unit
// -----------------------------------------------------------------------

const SCHEMA_V3: &str = "\
DEFINE FIELD property_id ON TABLE tenant TYPE option<string>;
DEFINE FIELD unit_number ON TABLE tenant TYPE option<string>;
DEFINE INDEX idx_tenant_property ON TABLE tenant COLUMNS property_id;
";

// -----------------------------------------------------------------------
// v4: explicit vacancy markers, back-filled from the 'vacant' name
// -----------------------------------------------------------------------

const SCHEMA_V4: &str = "\
DEFINE FIELD kind ON TABLE tenant TYPE string \
    ASSERT $value IN ['Occupant', 'VacancyMarker'] \
    DEFAULT 'Occupant';
UPDATE tenant SET kind = 'Occupant' WHERE kind = NONE;
UPDATE tenant SET kind = 'VacancyMarker' \
    WHERE string::lowercase(string::trim(name)) = 'vacant';
";

/// Run all pending migrations against the given SurrealDB instance.
///
/// Creates the `_migration` tracking table if it doesn't exist, then
/// applies any migrations with a version greater than the current one.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    let current = current_version(db).await?;

    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        info!(
            version = migration.version,
            name = migration.name,
            "Applying migration"
        );
        db.query(migration.sql).await?.check().map_err(|e| {
            DbError::Migration(format!(
                "Migration v{} '{}' failed: {}",
                migration.version, migration.name, e,
            ))
        })?;

        db.query(
            "CREATE _migration SET version = $version, \
             name = $name",
        )
        .bind(("version", migration.version))
        .bind(("name", migration.name))
        .await?
        .check()
        .map_err(|e| {
            DbError::Migration(format!(
                "Failed to record migration v{}: {}",
                migration.version, e,
            ))
        })?;
    }

    info!(version = latest_version(), "Schema is up to date");
    Ok(())
}

/// Highest applied migration version, `0` on a fresh database.
pub async fn current_version<C: Connection>(db: &Surreal<C>) -> Result<u32, DbError> {
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    Ok(records.first().map(|m| m.version).unwrap_or(0))
}

fn latest_version() -> u32 {
    MIGRATIONS.last().map(|m| m.version).unwrap_or(0)
}
