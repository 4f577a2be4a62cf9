//! Infrastructure layer - database connection, migrations and store
//! call deadlines.

mod db;
pub mod migrations;
mod timeout;

pub use db::Database;
pub use migrations::Migrator;
pub use timeout::bounded;
