pub mod builder;
pub mod category;
pub mod classifier;
pub mod descriptor;
pub mod lineage;
