//! In-memory stores shared by the application
//!
//! Both stores are plain component instances; the app constructs them once
//! and hands them to whoever needs them.

mod appointments;
mod catalog;

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

pub use appointments::AppointmentsStore;
pub use catalog::{Catalog, CatalogStore, EmbeddedHospital};

// A panicked writer cannot leave these stores half-updated (every write is a
// single assignment or push), so a poisoned lock is still safe to use.
fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|e| e.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|e| e.into_inner())
}
