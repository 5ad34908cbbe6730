pub mod console;
pub mod csv;
pub mod error;
pub mod json;
pub mod record;
pub mod snapshot;
