#[cfg(feature = "aggregator")]
pub mod aggregator;

#[cfg(feature = "fleet")]
pub mod fleet;
