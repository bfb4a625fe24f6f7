pub mod calls;
pub mod db;
pub mod leads;
pub mod models;
pub mod notification_logs;
pub mod schema;

mod error;

pub use error::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;
