//! Time abstraction traits for platform-agnostic timing operations.
//!
//! This module provides the `TimeSource` and `AsyncDelay` traits that
//! abstract over different time providers (Embassy, mock, etc.) so the GNSS
//! session can be tested on the host without an embedded time driver.

use core::sync::atomic::{AtomicU64, Ordering};

/// Platform-agnostic monotonic time source.
///
/// - `EmbassyTime` for embedded targets using Embassy
/// - `MockTime` for host testing with controllable time
pub trait TimeSource {
    /// Returns current time in milliseconds since system start.
    fn now_ms(&self) -> u64;

    /// Returns current time in microseconds since system start.
    fn now_us(&self) -> u64;

    /// Returns elapsed time in microseconds since a reference point.
    ///
    /// Uses saturating subtraction to handle potential overflow.
    fn elapsed_since(&self, reference_us: u64) -> u64 {
        self.now_us().saturating_sub(reference_us)
    }
}

/// Cooperative delay.
///
/// Implementations must yield to the executor rather than spin, so other
/// tasks (including the decoder's) keep running while a caller waits.
#[allow(async_fn_in_trait)]
pub trait AsyncDelay {
    /// Suspend the calling task for at least `ms` milliseconds.
    async fn delay_ms(&self, ms: u32);
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }

    fn now_us(&self) -> u64 {
        (**self).now_us()
    }
}

impl<T: AsyncDelay + ?Sized> AsyncDelay for &T {
    async fn delay_ms(&self, ms: u32) {
        (**self).delay_ms(ms).await
    }
}

// ============================================================================
// Embassy Implementation
// ============================================================================

/// Embassy-backed clock using the global time driver.
#[cfg(feature = "embassy")]
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyTime;

#[cfg(feature = "embassy")]
impl TimeSource for EmbassyTime {
    fn now_ms(&self) -> u64 {
        embassy_time::Instant::now().as_millis()
    }

    fn now_us(&self) -> u64 {
        embassy_time::Instant::now().as_micros()
    }
}

#[cfg(feature = "embassy")]
impl AsyncDelay for EmbassyTime {
    async fn delay_ms(&self, ms: u32) {
        embassy_time::Timer::after(embassy_time::Duration::from_millis(ms as u64)).await;
    }
}

// ============================================================================
// Mock Implementation
// ============================================================================

/// Mock time source for testing with controllable time advancement.
///
/// `delay_ms` returns immediately after advancing the clock, so timeout
/// logic runs deterministically and instantly under test.
///
/// # Example
///
/// ```ignore
/// use pico_gnss::core::traits::{MockTime, TimeSource};
///
/// let time = MockTime::new();
/// time.advance(1000); // Advance 1ms
/// assert_eq!(time.now_us(), 1000);
/// assert_eq!(time.now_ms(), 1);
/// ```
#[cfg(any(test, feature = "mock"))]
#[derive(Debug, Default)]
pub struct MockTime {
    current_us: AtomicU64,
    delays: AtomicU64,
}

#[cfg(any(test, feature = "mock"))]
impl MockTime {
    /// Creates a new `MockTime` starting at time 0.
    pub fn new() -> Self {
        Self::with_initial(0)
    }

    /// Creates a new `MockTime` starting at the specified time.
    pub fn with_initial(us: u64) -> Self {
        Self {
            current_us: AtomicU64::new(us),
            delays: AtomicU64::new(0),
        }
    }

    /// Sets the current time to an absolute value.
    pub fn set(&self, us: u64) {
        self.current_us.store(us, Ordering::SeqCst);
    }

    /// Advances the current time by the specified amount.
    pub fn advance(&self, us: u64) {
        self.current_us.fetch_add(us, Ordering::SeqCst);
    }

    /// Number of `delay_ms` calls so far.
    pub fn delay_count(&self) -> u64 {
        self.delays.load(Ordering::SeqCst)
    }
}

#[cfg(any(test, feature = "mock"))]
impl TimeSource for MockTime {
    fn now_ms(&self) -> u64 {
        self.now_us() / 1000
    }

    fn now_us(&self) -> u64 {
        self.current_us.load(Ordering::SeqCst)
    }
}

#[cfg(any(test, feature = "mock"))]
impl AsyncDelay for MockTime {
    async fn delay_ms(&self, ms: u32) {
        self.delays.fetch_add(1, Ordering::SeqCst);
        self.advance(ms as u64 * 1000);
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_time_initial_value() {
        let time = MockTime::new();
        assert_eq!(time.now_us(), 0);
        assert_eq!(time.now_ms(), 0);
    }

    #[test]
    fn mock_time_with_initial() {
        let time = MockTime::with_initial(5_000_000);
        assert_eq!(time.now_us(), 5_000_000);
        assert_eq!(time.now_ms(), 5000);
    }

    #[test]
    fn mock_time_advance_and_set() {
        let time = MockTime::new();
        time.advance(500_000);
        time.advance(500_000);
        assert_eq!(time.now_ms(), 1000);

        time.set(1_999);
        assert_eq!(time.now_ms(), 1);
    }

    #[test]
    fn mock_time_elapsed_since_saturates() {
        let time = MockTime::new();
        time.set(1_000);
        assert_eq!(time.elapsed_since(400), 600);
        assert_eq!(time.elapsed_since(5_000), 0);
    }

    #[tokio::test]
    async fn mock_time_delay_advances_clock() {
        let time = MockTime::new();
        time.delay_ms(50).await;
        (&time).delay_ms(25).await;

        assert_eq!(time.now_ms(), 75);
        assert_eq!(time.delay_count(), 2);
    }
}
