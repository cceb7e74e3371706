//! User Storage
//! Mission: Persist user accounts; the store owns username uniqueness

use crate::auth::models::{NewUser, User};
use parking_lot::Mutex;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use std::time::Duration;
use tracing::info;

/// How long a writer waits on a locked database before giving up
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Store failures
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The username is already taken
    #[error("username already exists")]
    Duplicate,
    #[error("{0}")]
    Backend(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        match &e {
            rusqlite::Error::SqliteFailure(err, _)
                if err.code == ErrorCode::ConstraintViolation
                    && err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                StoreError::Duplicate
            }
            _ => StoreError::Backend(e.to_string()),
        }
    }
}

/// Backing store for user accounts.
///
/// `insert` must reject a username that already exists with
/// [`StoreError::Duplicate`], atomically with the write.
pub trait UserStore: Send + Sync {
    fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError>;

    /// Insert a new user and return the id the store assigned
    fn insert(&self, user: &NewUser) -> Result<i64, StoreError>;
}

/// User storage with SQLite backend
pub struct SqliteUserStore {
    db_path: String,
}

impl SqliteUserStore {
    /// Open the database at `db_path` and make sure the user table exists
    pub fn new(db_path: &str) -> anyhow::Result<Self> {
        let store = Self {
            db_path: db_path.to_string(),
        };
        store.init_db()?;
        info!("User store ready at {}", db_path);
        Ok(store)
    }

    fn init_db(&self) -> anyhow::Result<()> {
        let conn = Connection::open(&self.db_path)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT UNIQUE NOT NULL,
                password TEXT NOT NULL,
                phoneNum TEXT,
                address TEXT
            )",
            [],
        )?;

        Ok(())
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        let conn = Connection::open(&self.db_path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Ok(conn)
    }

    fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
        Ok(User {
            id: row.get(0)?,
            username: row.get(1)?,
            password_hash: row.get(2)?,
            phone_num: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
            address: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        })
    }

    /// Number of stored users
    pub fn count(&self) -> Result<usize, StoreError> {
        let conn = self.connect()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM user", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

impl UserStore for SqliteUserStore {
    fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let conn = self.connect()?;

        let user = conn
            .query_row(
                "SELECT id, username, password, phoneNum, address
                 FROM user WHERE username = ?1",
                params![username],
                Self::row_to_user,
            )
            .optional()?;

        Ok(user)
    }

    fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let conn = self.connect()?;

        let user = conn
            .query_row(
                "SELECT id, username, password, phoneNum, address
                 FROM user WHERE id = ?1",
                params![id],
                Self::row_to_user,
            )
            .optional()?;

        Ok(user)
    }

    fn insert(&self, user: &NewUser) -> Result<i64, StoreError> {
        let conn = self.connect()?;

        conn.execute(
            "INSERT INTO user (username, password, phoneNum, address)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                user.username,
                user.password_hash,
                user.phone_num,
                user.address,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }
}

/// Process-local store, for tests and throwaway runs
#[derive(Default)]
pub struct InMemoryUserStore {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.lock().is_empty()
    }
}

impl UserStore for InMemoryUserStore {
    fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .lock()
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.users.lock().iter().find(|u| u.id == id).cloned())
    }

    fn insert(&self, user: &NewUser) -> Result<i64, StoreError> {
        let mut users = self.users.lock();
        if users.iter().any(|u| u.username == user.username) {
            return Err(StoreError::Duplicate);
        }

        let id = users.last().map(|u| u.id + 1).unwrap_or(1);
        users.push(User {
            id,
            username: user.username.clone(),
            password_hash: user.password_hash.clone(),
            phone_num: user.phone_num.clone(),
            address: user.address.clone(),
        });

        Ok(id)
    }
}
