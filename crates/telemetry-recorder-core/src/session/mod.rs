mod memory_store;
mod query;
#[allow(clippy::module_inception)]
mod session;
mod store;

pub use {
    memory_store::MemoryStore,
    query::SessionQuery,
    session::{Session, SessionId, SessionScheme},
    store::SessionStore,
};
