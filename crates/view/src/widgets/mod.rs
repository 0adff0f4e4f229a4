pub mod card;
pub mod detail;
