pub mod dedup;
pub mod identity;
