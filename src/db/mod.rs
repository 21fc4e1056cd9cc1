pub mod codes;
pub mod connection;

pub use connection::{init_db, Database};
