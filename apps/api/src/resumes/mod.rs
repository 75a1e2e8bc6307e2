// Resume persistence: the PostgreSQL store and its CRUD routes.

pub mod handlers;
pub mod store;
