use libsql::{Connection, Database};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub type DbConn = Connection;

/// Handle to the preference store. Cheap to clone; every request opens its own
/// connection through [`Store::connect`].
#[derive(Clone)]
pub struct Store {
    database: Arc<Database>,
    path: PathBuf,
}

impl Store {
    pub(crate) fn new(database: Database, path: PathBuf) -> Self {
        Self {
            database: Arc::new(database),
            path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").field("path", &self.path).finish()
    }
}

#[path = "db_bootstrap.rs"]
mod db_bootstrap;
#[path = "db_preference_store.rs"]
mod db_preference_store;

pub use db_bootstrap::{init_schema, init_store, open_store, seed_demo_user};
pub use db_preference_store::{
    find_user_by_username, get_preference_by_user_id, insert_user_with_default_preference,
    save_preference,
};

#[cfg(test)]
#[path = "../tests/infrastructure/db_tests.rs"]
mod tests;
