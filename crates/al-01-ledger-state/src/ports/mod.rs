pub mod database;
pub mod reader;

pub use database::{BatchOp, KeyValueStore, WriteBatch};
pub use reader::StateReader;
