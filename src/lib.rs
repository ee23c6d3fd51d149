//! update-router library exports for testing

pub mod api;
pub mod core;
pub mod telemetry;

#[cfg(test)]
pub mod test_support;
