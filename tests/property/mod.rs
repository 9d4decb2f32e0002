//! Property-based tests for reconciliation plans and the visibility projection

mod plans;
mod projection;
mod round_trip;
