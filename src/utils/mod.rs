//! Utility modules providing cross-cutting functionality.
//!
//! Currently this is the parallel execution layer, which lets the driver run its workers on a
//! bounded thread pool or serially when the `parallel` feature is disabled.

pub mod parallel;
