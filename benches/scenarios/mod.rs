//! Real-world scenario benchmarks.
//!
//! These model how a host drives the engine: fixed-size callbacks with a held
//! note and the shared controls in different routing configurations.

mod engine;

pub use engine::bench_engine;
