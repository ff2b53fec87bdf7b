pub mod migrate;
pub mod pool;
pub mod user_store;
