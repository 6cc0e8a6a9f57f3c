pub mod format;
pub mod markdown;
