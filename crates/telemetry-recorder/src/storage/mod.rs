mod sqlite_store;

pub(crate) use sqlite_store::SqliteStore;
