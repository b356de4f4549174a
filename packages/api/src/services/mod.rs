pub mod listing;
pub mod notify;
