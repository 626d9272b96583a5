mod kv;
mod popular;
mod schema;
mod types;

pub use schema::Database;
pub use types::DatabaseError;
