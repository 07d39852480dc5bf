//! Application use cases (endpoint-specific services).

mod examples;

pub use examples::{EXAMPLES_PATH, ExampleService};
