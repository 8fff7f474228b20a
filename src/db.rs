//! SQLite pool for the history repository.
//!
//! Every pooled connection is tuned on checkout, see [`SqlitePragmas`].

use std::time::Duration;

use diesel::connection::SimpleConnection;
use diesel::r2d2::{self, ConnectionManager, CustomizeConnection, Pool, PoolError, PooledConnection};
use diesel::sqlite::SqliteConnection;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

/// Pragmas run on each connection the pool hands out.
#[derive(Clone, Debug)]
pub struct SqlitePragmas {
    /// How long a statement waits on a locked database before failing.
    pub busy_timeout: Duration,
    pub write_ahead_log: bool,
    pub foreign_keys: bool,
}

impl Default for SqlitePragmas {
    fn default() -> Self {
        Self {
            busy_timeout: Duration::from_secs(30),
            write_ahead_log: true,
            foreign_keys: true,
        }
    }
}

impl SqlitePragmas {
    /// The statements in execution order.
    ///
    /// The busy timeout goes first: switching the journal mode takes a lock
    /// that other connections opening at the same time must wait for.
    fn statements(&self) -> Vec<String> {
        let mut statements = vec![format!(
            "PRAGMA busy_timeout = {}",
            self.busy_timeout.as_millis()
        )];
        if self.write_ahead_log {
            statements.push("PRAGMA journal_mode = WAL".to_string());
            statements.push("PRAGMA synchronous = NORMAL".to_string());
        }
        if self.foreign_keys {
            statements.push("PRAGMA foreign_keys = ON".to_string());
        }
        statements
    }
}

impl CustomizeConnection<SqliteConnection, r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), r2d2::Error> {
        let batch = self.statements().join(";\n") + ";";
        conn.batch_execute(&batch).map_err(r2d2::Error::QueryError)
    }
}

/// Builds the pool for `database_url` with the default pragmas.
pub fn establish_connection_pool(database_url: &str) -> Result<DbPool, PoolError> {
    Pool::builder()
        .connection_customizer(Box::new(SqlitePragmas::default()))
        .build(ConnectionManager::<SqliteConnection>::new(database_url))
}

/// Checks a connection out of the pool, logging failures.
pub fn get_connection(pool: &DbPool) -> Result<DbConnection, PoolError> {
    pool.get()
        .inspect_err(|err| log::error!("Failed to get connection from pool: {err}"))
}
