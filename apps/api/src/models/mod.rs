pub mod application;
pub mod bank;
pub mod comparison;
pub mod preference;
