pub mod admin_api;
pub mod console;
pub mod progress;
pub mod snapshot;
