//! Utility modules

pub mod ident;
pub mod paths;

pub use ident::{new_uuid, timestamp_ms};
pub use paths::{data_dir, database_path, init_data_dir};
