pub mod coverage;
pub mod plan;
