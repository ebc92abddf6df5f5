//! SQLite schema definitions and SQL query constants.
//!
//! Pure data, no I/O. `WHERE`, `ORDER BY` and `LIMIT` clauses are appended by
//! the repository.

/// SQL statement to create all tables.
///
/// Deleting a company does not cascade here; the company service removes
/// the devices first.
pub const CREATE_TABLES: &str = r#"
PRAGMA foreign_keys = ON;

-- Companies table
CREATE TABLE IF NOT EXISTS companies (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    picture TEXT
);

-- Devices table
CREATE TABLE IF NOT EXISTS devices (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    category TEXT NOT NULL,
    price REAL NOT NULL,
    in_stock INTEGER NOT NULL,
    company_id INTEGER NOT NULL,
    FOREIGN KEY (company_id) REFERENCES companies(id)
);

-- Users table
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL UNIQUE,
    role TEXT NOT NULL,
    password_hash BLOB NOT NULL,
    password_salt BLOB NOT NULL,
    profile_picture TEXT
);

CREATE INDEX IF NOT EXISTS idx_devices_company_id ON devices(company_id);
"#;

// ============================================================================
// Company queries
// ============================================================================

pub const SELECT_COMPANIES: &str = "SELECT c.id, c.name, c.picture FROM companies c";

pub const COUNT_COMPANIES: &str = "SELECT COUNT(*) FROM companies c";

pub const INSERT_COMPANY: &str = "INSERT INTO companies (name, picture) VALUES (?1, ?2)";

pub const UPDATE_COMPANY: &str = "UPDATE companies SET name = ?1, picture = ?2 WHERE id = ?3";

pub const DELETE_COMPANY: &str = "DELETE FROM companies WHERE id = ?1";

// ============================================================================
// Device queries
// ============================================================================

/// Devices carry their company's name through the join.
pub const SELECT_DEVICES: &str = r#"
SELECT d.id, d.name, d.category, d.price, d.in_stock, d.company_id, c.name
FROM devices d
JOIN companies c ON c.id = d.company_id
"#;

pub const COUNT_DEVICES: &str =
    "SELECT COUNT(*) FROM devices d JOIN companies c ON c.id = d.company_id";

pub const INSERT_DEVICE: &str = r#"
INSERT INTO devices (name, category, price, in_stock, company_id)
VALUES (?1, ?2, ?3, ?4, ?5)
"#;

pub const UPDATE_DEVICE: &str = r#"
UPDATE devices
SET name = ?1, category = ?2, price = ?3, in_stock = ?4, company_id = ?5
WHERE id = ?6
"#;

pub const DELETE_DEVICE: &str = "DELETE FROM devices WHERE id = ?1";

// ============================================================================
// User queries
// ============================================================================

pub const SELECT_USERS: &str = r#"
SELECT u.id, u.username, u.email, u.role, u.password_hash, u.password_salt, u.profile_picture
FROM users u
"#;

pub const COUNT_USERS: &str = "SELECT COUNT(*) FROM users u";

pub const INSERT_USER: &str = r#"
INSERT INTO users (username, email, role, password_hash, password_salt, profile_picture)
VALUES (?1, ?2, ?3, ?4, ?5, ?6)
"#;

pub const UPDATE_USER: &str = r#"
UPDATE users
SET username = ?1, email = ?2, role = ?3, password_hash = ?4, password_salt = ?5,
    profile_picture = ?6
WHERE id = ?7
"#;

pub const DELETE_USER: &str = "DELETE FROM users WHERE id = ?1";
