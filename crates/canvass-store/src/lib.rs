//! # canvass-store
//!
//! Embedded document store for canvass on libSQL.
//!
//! Surveys, their questions, and submitted responses live in three tables.
//! Every aggregate write runs inside one libSQL transaction on a single
//! connection, so a failed write leaves nothing behind. Access to the
//! connection is serialised through an async gate; concurrent
//! reconciliations of the same survey therefore apply one after the other
//! and the last one wins.
//!
//! The store enforces the access rules for the identity it was opened
//! with (see [`access`]). It does not validate bodies beyond the table
//! constraints.

pub mod access;
mod backend;
pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;

use std::sync::Arc;

use canvass_core::identity::AuthIdentity;
use libsql::Builder;
use tokio::sync::{Mutex, MutexGuard};

pub use error::StoreError;

struct Inner {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
    gate: Mutex<()>,
}

/// Handle to the document store, bound to one caller identity.
///
/// Cloning through [`SurveyStore::with_identity`] shares the underlying
/// database, which is how several users see the same data in tests.
#[derive(Clone)]
pub struct SurveyStore {
    inner: Arc<Inner>,
    identity: Option<AuthIdentity>,
}

impl SurveyStore {
    /// Open a local database at `path` (`":memory:"` for tests) and run
    /// migrations.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the database cannot be opened or migrations
    /// fail.
    pub async fn open_local(
        path: &str,
        identity: Option<AuthIdentity>,
    ) -> Result<Self, StoreError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| StoreError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let store = Self {
            inner: Arc::new(Inner {
                db,
                conn,
                gate: Mutex::new(()),
            }),
            identity,
        };
        store.run_migrations().await?;
        tracing::debug!(path, "opened survey store");
        Ok(store)
    }

    /// Same database, different caller.
    #[must_use]
    pub fn with_identity(&self, identity: Option<AuthIdentity>) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            identity,
        }
    }

    #[must_use]
    pub const fn identity(&self) -> Option<&AuthIdentity> {
        self.identity.as_ref()
    }

    /// Direct connection access for queries outside the repos.
    #[must_use]
    pub fn conn(&self) -> &libsql::Connection {
        &self.inner.conn
    }

    /// Exclusive use of the connection for the lifetime of the guard.
    pub(crate) async fn lock(&self) -> MutexGuard<'_, ()> {
        self.inner.gate.lock().await
    }
}

/// Generate a prefixed ID with 64 random bits, e.g. `"srv-a3f8b2c19d04e6f7"`.
///
/// # Errors
///
/// Returns `StoreError` if the query fails or returns no rows.
pub async fn generate_id(conn: &libsql::Connection, prefix: &str) -> Result<String, StoreError> {
    let mut rows = conn
        .query(
            &format!("SELECT '{prefix}-' || lower(hex(randomblob(8)))"),
            (),
        )
        .await?;
    let row = rows.next().await?.ok_or(StoreError::NoResult)?;
    Ok(row.get::<String>(0)?)
}
