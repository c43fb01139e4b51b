//! Runtime abstraction for clock, sleep and file operations.
//!
//! The fetcher never reads the clock or sleeps directly; it goes through
//! [`Runtime`] so pacing and backoff can be driven by a mock in tests.
//!
//! # Structure
//!
//! - `clock` - monotonic time and async sleeping
//! - `fs` - file system operations (read, write)

mod clock;
mod fs;

use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;
use std::time::{Duration, Instant};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Runtime: Send + Sync {
    // Clock
    fn now(&self) -> Instant;
    async fn sleep(&self, duration: Duration);

    // File System
    fn read_to_string(&self, path: &Path) -> Result<String>;
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RealRuntime;

#[async_trait]
impl Runtime for RealRuntime {
    fn now(&self) -> Instant {
        self.now_impl()
    }

    async fn sleep(&self, duration: Duration) {
        self.sleep_impl(duration).await
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.read_to_string_impl(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        self.write_impl(path, contents)
    }
}
