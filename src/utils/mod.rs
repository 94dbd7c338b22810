pub mod filter;
pub mod format;
