// Thin wrapper around the sled backend so the rest of the storage layer
// does not name the engine directly

pub use sled::{Db, Tree};

use std::path::Path;

pub fn open(path: impl AsRef<Path>) -> Result<Db, sled::Error> {
    sled::open(path)
}

// In-memory database for tests, dropped with the handle
pub fn temporary() -> Result<Db, sled::Error> {
    sled::Config::new().temporary(true).open()
}
