//! Numeric helpers shared by accumulation and ensembling.

pub mod numeric;
