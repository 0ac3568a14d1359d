//! Input normalization (stdin JSON, flag values, legacy encodings)

pub mod inputs;

pub use inputs::{merge, parse_assertions, parse_inputs, validate, PartialInputs};
