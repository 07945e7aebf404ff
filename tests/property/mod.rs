//! Property-based tests

pub mod staging_proptest;
