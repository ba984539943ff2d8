pub mod active_users;
pub mod classifier;
pub mod paginator;
