pub mod api;
pub mod contact;
pub mod prefs;
pub mod public;
