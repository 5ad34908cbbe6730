pub mod candidate;
pub mod escape;
pub mod path;
pub mod synthesizer;
