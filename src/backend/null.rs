//! Null Backend
//!
//! Accepts every write and never returns anything. `get_set` over it always
//! runs the producer.

use super::Backend;
use crate::error::Result;

#[derive(Debug, Clone, Copy, Default)]
pub struct NullBackend;

impl Backend for NullBackend {
    fn name(&self) -> &'static str {
        "null"
    }

    fn fetch(&mut self, _key: &str) -> Result<Option<Vec<u8>>> {
        Ok(None)
    }

    fn store(&mut self, _key: &str, _bytes: Vec<u8>, _expires_at: u64) -> Result<bool> {
        Ok(true)
    }

    fn remove(&mut self, _key: &str) -> Result<()> {
        Ok(())
    }

    fn counter(&mut self, _key: &str) -> Result<Option<u64>> {
        Ok(None)
    }

    fn increment(&mut self, _key: &str) -> Result<u64> {
        Ok(1)
    }
}
