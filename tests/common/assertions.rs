//! Custom assertion macros and utilities

/// Assert that a result is ok and return the value
///
/// This macro unwraps a Result, providing a better error message
/// if the result is an error.
#[macro_export]
macro_rules! assert_ok {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
    ($result:expr, $message:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("{}: {:?}", $message, e),
        }
    };
}

/// Assert that the ids of a list of entries match, in order
#[macro_export]
macro_rules! assert_ids {
    ($entries:expr, [$($id:expr),* $(,)?]) => {
        let actual: Vec<String> = $entries.iter().map(|entry| entry.id.clone()).collect();
        let expected: Vec<String> = vec![$($id.to_string()),*];
        pretty_assertions::assert_eq!(actual, expected);
    };
}
