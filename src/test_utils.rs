//! Test utilities shared across modules.
//!
//! This module provides common utilities for tests, including
//! synchronization primitives for tests that read or change process-wide state.

use std::sync::Mutex;

/// Mutex to serialize tests that read or modify process environment variables.
///
/// Configuration is assembled from the process environment, so tests that
/// load it through [`crate::config::Config::load_from`] or set variables must
/// hold this lock to avoid observing each other's changes.
///
/// # Example
///
/// ```ignore
/// use crate::test_utils::ENV_MUTEX;
///
/// #[test]
/// fn test_that_reads_env() {
///     let _lock = ENV_MUTEX.lock().unwrap();
///     // ... test code that reads the environment ...
/// }
/// ```
pub static ENV_MUTEX: Mutex<()> = Mutex::new(());

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_mutex_can_be_acquired_multiple_times_sequentially() {
        {
            let _lock = ENV_MUTEX.lock().unwrap();
        }
        {
            let _lock = ENV_MUTEX.lock().unwrap();
        }
    }
}
