pub mod generate;
pub mod health;
pub mod index;
pub mod scenarios;
