// Testing utilities shared by unit tests, integration tests and the CLI harness

pub mod signal;

pub use signal::{SignalBuilder, DEFAULT_SAMPLE_INTERVAL};
