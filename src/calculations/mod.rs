pub mod agenda;
pub mod overview;
pub mod streak;
