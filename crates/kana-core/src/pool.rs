//! Reusable scratch allocations shared between concurrent queries.
//!
//! A [`Lease`] owns its value exclusively until it is dropped, at which point
//! the value is reset and handed back. Returning twice is impossible by
//! construction.

use std::ops::{Deref, DerefMut};
use std::sync::Mutex;

pub struct Pool<T> {
    items: Mutex<Vec<T>>,
    reset: fn(&mut T),
}

impl<T: Default> Pool<T> {
    /// Values kept for reuse; extra returns are dropped.
    const MAX_RETAINED: usize = 16;

    pub fn new(reset: fn(&mut T)) -> Self {
        Self {
            items: Mutex::new(Vec::new()),
            reset,
        }
    }

    pub fn lease(&self) -> Lease<'_, T> {
        let value = self
            .items
            .lock()
            .ok()
            .and_then(|mut items| items.pop())
            .unwrap_or_default();
        Lease {
            pool: self,
            value: Some(value),
        }
    }

    /// Number of idle values waiting for reuse.
    #[cfg(test)]
    pub fn idle(&self) -> usize {
        self.items.lock().map(|items| items.len()).unwrap_or(0)
    }

    fn give_back(&self, mut value: T) {
        (self.reset)(&mut value);
        if let Ok(mut items) = self.items.lock() {
            if items.len() < Self::MAX_RETAINED {
                items.push(value);
            }
        }
    }
}

pub struct Lease<'p, T: Default> {
    pool: &'p Pool<T>,
    value: Option<T>,
}

impl<T: Default> Deref for Lease<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.value.as_ref().expect("lease used after release")
    }
}

impl<T: Default> DerefMut for Lease<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.value.as_mut().expect("lease used after release")
    }
}

impl<T: Default> Drop for Lease<'_, T> {
    fn drop(&mut self) {
        if let Some(value) = self.value.take() {
            self.pool.give_back(value);
        }
    }
}
