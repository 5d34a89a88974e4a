//! Helpers for integration tests. Only compiled with the `test_utils` feature.
pub mod prepare_env;
pub mod test_doubles;
