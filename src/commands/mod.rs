pub mod inventory;
pub mod models;
pub mod queries;
pub mod show;
pub mod source;
pub mod status;
