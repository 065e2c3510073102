use crate::logger;
use crate::models::Stats;
use crate::store::{AccountStore, NewProfile, Profile, SignIn, StoreError, UserId};
use rusqlite::{Connection, Result};
use std::path::{Path, PathBuf};

pub mod account;
pub mod profile;

pub const DEFAULT_BCRYPT_COST: u32 = bcrypt::DEFAULT_COST;

fn get_data_dir() -> PathBuf {
    if cfg!(target_os = "windows") {
        let home = std::env::var("USERPROFILE").unwrap_or_else(|_| "C:\\Users\\User".to_string());
        PathBuf::from(home).join(".local\\share\\libras-quiz")
    } else {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/home/user".to_string());
        PathBuf::from(home).join(".local/share/libras-quiz")
    }
}

pub fn get_db_path() -> PathBuf {
    get_data_dir().join("quiz.db")
}

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

pub(crate) fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS accounts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            email_confirmed INTEGER NOT NULL DEFAULT 0,
            created_at INTEGER NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS profiles (
            email TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            role TEXT NOT NULL DEFAULT 'student',
            correct_count INTEGER NOT NULL DEFAULT 0,
            incorrect_count INTEGER NOT NULL DEFAULT 0,
            solved_count INTEGER NOT NULL DEFAULT 0,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        )",
        [],
    )?;

    Ok(())
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

impl From<bcrypt::BcryptError> for StoreError {
    fn from(err: bcrypt::BcryptError) -> Self {
        StoreError::Backend(err.to_string())
    }
}

/// Accounts and profiles in a local SQLite file.
///
/// With `require_confirmation` off, new accounts are confirmed as soon as
/// they are created. With it on they stay blocked until
/// [`SqliteStore::confirm_email`] runs (the `confirm` command).
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
    require_confirmation: bool,
    bcrypt_cost: u32,
}

impl SqliteStore {
    /// Opens (creating if needed) the database at `path` and migrates it.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).ok();
        }
        let conn = Connection::open(path)?;
        run_migrations(&conn)?;
        logger::log(&format!("Opened database at {}", path.display()));
        Ok(Self::from_connection(conn))
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        run_migrations(&conn)?;
        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn,
            require_confirmation: false,
            bcrypt_cost: DEFAULT_BCRYPT_COST,
        }
    }

    pub fn with_confirmation(mut self, require_confirmation: bool) -> Self {
        self.require_confirmation = require_confirmation;
        self
    }

    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    pub fn confirm_email(&self, email: &str) -> Result<(), StoreError> {
        if account::set_confirmed(&self.conn, email)? {
            logger::log(&format!("Confirmed email for {}", email));
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }
}

impl AccountStore for SqliteStore {
    fn sign_in(&self, email: &str, password: &str) -> Result<SignIn, StoreError> {
        let Some(account) = account::get_account(&self.conn, email)? else {
            return Err(StoreError::InvalidCredentials);
        };
        if !bcrypt::verify(password, &account.password_hash)? {
            return Err(StoreError::InvalidCredentials);
        }
        Ok(SignIn {
            user_id: account.id,
            email_confirmed: account.email_confirmed,
        })
    }

    fn sign_up(&self, email: &str, password: &str) -> Result<UserId, StoreError> {
        if account::account_exists(&self.conn, email)? {
            return Err(StoreError::AccountExists);
        }
        let hash = bcrypt::hash(password, self.bcrypt_cost)?;
        let id = account::create_account(&self.conn, email, &hash, !self.require_confirmation)?;
        logger::log(&format!("Created account {} for {}", id, email));
        Ok(id)
    }

    fn fetch_profile(&self, email: &str) -> Result<Option<Profile>, StoreError> {
        Ok(profile::get_profile(&self.conn, email)?)
    }

    fn create_profile(&self, new: &NewProfile) -> Result<(), StoreError> {
        profile::create_profile(&self.conn, &new.email, &new.name, new.role)?;
        Ok(())
    }

    fn update_stats(&self, email: &str, stats: &Stats) -> Result<(), StoreError> {
        if profile::update_stats(&self.conn, email, stats)? {
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }

    fn requires_confirmation(&self) -> bool {
        self.require_confirmation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn store() -> SqliteStore {
        SqliteStore::open_in_memory().unwrap().with_bcrypt_cost(4)
    }

    fn new_profile(email: &str) -> NewProfile {
        NewProfile {
            email: email.to_string(),
            name: "Ana".to_string(),
            role: Role::Student,
        }
    }

    #[test]
    fn test_migrations_create_tables() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table'")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        assert!(tables.contains(&"accounts".to_string()));
        assert!(tables.contains(&"profiles".to_string()));
    }

    #[test]
    fn test_open_creates_file_in_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("quiz.db");
        let store = SqliteStore::open(&path).unwrap().with_bcrypt_cost(4);
        store.sign_up("ana@escola.br", "1234").unwrap();
        assert!(path.exists());

        drop(store);
        let reopened = SqliteStore::open(&path).unwrap();
        assert!(reopened.sign_in("ana@escola.br", "1234").is_ok());
    }

    #[test]
    fn test_password_is_stored_hashed() {
        let store = store();
        store.sign_up("ana@escola.br", "segredo").unwrap();
        let row = account::get_account(&store.conn, "ana@escola.br")
            .unwrap()
            .unwrap();
        assert_ne!(row.password_hash, "segredo");
        assert!(row.password_hash.starts_with("$2"));
    }

    #[test]
    fn test_sign_in_checks_password() {
        let store = store();
        let id = store.sign_up("ana@escola.br", "1234").unwrap();
        let signed_in = store.sign_in("ana@escola.br", "1234").unwrap();
        assert_eq!(signed_in.user_id, id);
        assert!(signed_in.email_confirmed);

        assert_eq!(
            store.sign_in("ana@escola.br", "4321"),
            Err(StoreError::InvalidCredentials)
        );
        assert_eq!(
            store.sign_in("bia@escola.br", "1234"),
            Err(StoreError::InvalidCredentials)
        );
    }

    #[test]
    fn test_duplicate_sign_up_is_rejected() {
        let store = store();
        store.sign_up("ana@escola.br", "1234").unwrap();
        assert_eq!(
            store.sign_up("ana@escola.br", "5678"),
            Err(StoreError::AccountExists)
        );
    }

    #[test]
    fn test_confirmation_flow() {
        let store = store().with_confirmation(true);
        assert!(store.requires_confirmation());
        store.sign_up("ana@escola.br", "1234").unwrap();
        store.create_profile(&new_profile("ana@escola.br")).unwrap();
        assert!(!store.fetch_profile("ana@escola.br").unwrap().unwrap().email_confirmed);

        store.confirm_email("ana@escola.br").unwrap();
        assert!(store.fetch_profile("ana@escola.br").unwrap().unwrap().email_confirmed);
        assert_eq!(store.confirm_email("bia@escola.br"), Err(StoreError::NotFound));
    }

    #[test]
    fn test_update_stats_requires_profile() {
        let store = store();
        let stats = Stats {
            correct: 1,
            incorrect: 2,
            solved: 3,
        };
        assert_eq!(
            store.update_stats("ana@escola.br", &stats),
            Err(StoreError::NotFound)
        );

        store.create_profile(&new_profile("ana@escola.br")).unwrap();
        store.update_stats("ana@escola.br", &stats).unwrap();
        assert_eq!(
            store.fetch_profile("ana@escola.br").unwrap().unwrap().stats,
            stats
        );
    }
}
