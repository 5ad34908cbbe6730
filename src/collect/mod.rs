pub mod aggregator;
pub mod finder;
pub mod structure;
