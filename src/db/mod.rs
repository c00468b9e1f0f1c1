#[cfg(test)]
pub mod memory;
pub mod pool;
pub mod postgres;
pub mod store;

pub use pool::{create_pool, run_migrations};
pub use postgres::PgStore;
pub use store::{ContractStore, JobStore};
