pub mod aggregator;
pub mod convert;
pub mod data;
