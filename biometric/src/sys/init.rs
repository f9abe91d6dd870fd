use std::sync::{Mutex, OnceLock, PoisonError};

/// A lazily initialized value that is only published once its initializer
/// succeeds.
///
/// Initializers are serialized, so a caller never observes a value whose
/// setup is still running, and a failed attempt leaves the cell empty for the
/// next caller.
pub(crate) struct InitCell<T> {
    value: OnceLock<T>,
    init: Mutex<()>,
}

impl<T> InitCell<T> {
    pub(crate) const fn new() -> Self {
        Self {
            value: OnceLock::new(),
            init: Mutex::new(()),
        }
    }

    pub(crate) fn get(&self) -> Option<&T> {
        self.value.get()
    }

    pub(crate) fn get_or_try_init<E, F>(&self, init: F) -> Result<&T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        if let Some(value) = self.value.get() {
            return Ok(value);
        }

        let _guard = self.init.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(value) = self.value.get() {
            return Ok(value);
        }

        let value = init()?;
        Ok(self.value.get_or_init(|| value))
    }
}
