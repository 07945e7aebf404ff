//! Integration tests across the staging store, the reconciler and HTTP

pub mod reconciler_test;
pub mod staging_test;
