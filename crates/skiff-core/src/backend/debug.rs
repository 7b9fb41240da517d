use std::sync::{Mutex, MutexGuard, PoisonError};

use skiff_model::Flag;

/// Per-client debug switch guarded by a mutex.
///
/// The lock is held only for the read or write of the flag itself and never across
/// an `.await`, so toggling debug does not queue behind in-flight backend calls.
#[derive(Debug, Default)]
pub struct DebugFlag {
    enabled: Mutex<bool>,
}

impl DebugFlag {
    pub fn new(initial: Flag) -> Self {
        Self {
            enabled: Mutex::new(initial.is_enabled()),
        }
    }

    /// Set the flag and return the previous value.
    pub fn set(&self, enabled: bool) -> bool {
        std::mem::replace(&mut *self.lock(), enabled)
    }

    pub fn get(&self) -> bool {
        *self.lock()
    }

    // A panic while holding the guard cannot leave a bool half-written.
    fn lock(&self) -> MutexGuard<'_, bool> {
        self.enabled.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
