pub mod page;
pub mod time_window;
pub mod user_record;
