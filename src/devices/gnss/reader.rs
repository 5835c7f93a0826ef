//! Bounded poll reader
//!
//! Waits for a fresh fix by polling the session's fix store at a short
//! fixed interval until a caller-supplied deadline. Fixes arrive at about
//! 1 Hz, so the interval only has to be small against typical timeouts; the
//! last sleep is clamped to the time remaining so the deadline is not
//! overshot. The session state is checked on every poll, so a session put
//! to sleep or torn down mid-wait ends the wait with `NotReady`.

use crate::core::traits::{AsyncDelay, TimeSource};
use crate::devices::gnss::error::{GnssError, Result};
use crate::devices::gnss::fix::FixSnapshot;
use crate::devices::gnss::session::SessionShared;
use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, RawMutex};

/// Retry interval between store reads
pub const POLL_INTERVAL_MS: u32 = 10;

/// Anything that can hand out a fix within a timeout
#[allow(async_fn_in_trait)]
pub trait FixSource {
    /// Wait up to `timeout_ms` for a fresh fix
    async fn get_data(&self, timeout_ms: u32) -> Result<FixSnapshot>;
}

/// Poll `shared` until it holds a fresh fix or `timeout_ms` elapses
///
/// A timeout of zero checks the store exactly once.
///
/// # Errors
///
/// - `GnssError::NotReady` as soon as the session is not Active
/// - `GnssError::Timeout` if no fix was published in time
pub async fn read_within<T, M>(
    clock: &T,
    shared: &SessionShared<M>,
    timeout_ms: u32,
) -> Result<FixSnapshot>
where
    T: TimeSource + AsyncDelay,
    M: RawMutex,
{
    let deadline = clock.now_ms().saturating_add(timeout_ms as u64);

    loop {
        if let Some(fix) = shared.read_if_active()? {
            return Ok(fix);
        }

        let now = clock.now_ms();
        if now >= deadline {
            return Err(GnssError::Timeout);
        }

        let remaining = (deadline - now).min(POLL_INTERVAL_MS as u64) as u32;
        clock.delay_ms(remaining).await;
    }
}

/// Read-only handle on a session for consumer tasks
///
/// Cheap to clone; any number of readers may poll concurrently with the
/// decoder publishing and with the control task changing state.
pub struct GnssReader<'a, T, M: RawMutex = CriticalSectionRawMutex> {
    shared: &'a SessionShared<M>,
    clock: T,
}

impl<'a, T, M: RawMutex> GnssReader<'a, T, M> {
    pub fn new(shared: &'a SessionShared<M>, clock: T) -> Self {
        Self { shared, clock }
    }

    pub fn is_active(&self) -> bool {
        self.shared.is_active()
    }
}

impl<T: Clone, M: RawMutex> Clone for GnssReader<'_, T, M> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared,
            clock: self.clock.clone(),
        }
    }
}

impl<T, M> FixSource for GnssReader<'_, T, M>
where
    T: TimeSource + AsyncDelay,
    M: RawMutex,
{
    async fn get_data(&self, timeout_ms: u32) -> Result<FixSnapshot> {
        if !self.shared.is_active() {
            crate::log_error!("GNSS: not active");
            return Err(GnssError::NotReady);
        }

        read_within(&self.clock, self.shared, timeout_ms)
            .await
            .inspect_err(|e| match e {
                GnssError::Timeout => {
                    crate::log_warn!("GNSS: data timeout after {} ms", timeout_ms);
                }
                _ => crate::log_warn!("GNSS: session left active state while waiting"),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::MockTime;
    use crate::devices::gnss::session::SessionState;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    fn valid_fix() -> FixSnapshot {
        FixSnapshot {
            latitude: 41.0,
            longitude: 29.0,
            satellites_locked: 8,
            position_valid: true,
            ..FixSnapshot::default()
        }
    }

    fn active() -> SessionShared<NoopRawMutex> {
        let shared = SessionShared::new();
        shared.set_state(SessionState::Active);
        shared
    }

    /// Mock clock that moves the session to `next` during its n-th delay,
    /// then delivers a fix as a still-attached decoder would
    struct InterruptingClock<'a> {
        time: MockTime,
        shared: &'a SessionShared<NoopRawMutex>,
        at_delay: u64,
        next: SessionState,
    }

    impl TimeSource for InterruptingClock<'_> {
        fn now_ms(&self) -> u64 {
            self.time.now_ms()
        }

        fn now_us(&self) -> u64 {
            self.time.now_us()
        }
    }

    impl AsyncDelay for InterruptingClock<'_> {
        async fn delay_ms(&self, ms: u32) {
            self.time.delay_ms(ms).await;
            if self.time.delay_count() == self.at_delay {
                self.shared.set_state(self.next);
                self.shared.store().publish(valid_fix());
            }
        }
    }

    #[tokio::test]
    async fn test_returns_immediately_when_fresh() {
        let clock = MockTime::new();
        let shared = active();
        shared.store().publish(valid_fix());

        let fix = read_within(&clock, &shared, 1000).await.unwrap();
        assert_eq!(fix, valid_fix());
        assert_eq!(clock.delay_count(), 0);
        assert_eq!(clock.now_ms(), 0);
    }

    #[tokio::test]
    async fn test_times_out_at_deadline() {
        let clock = MockTime::new();
        let shared = active();

        let result = read_within(&clock, &shared, 200).await;
        assert_eq!(result, Err(GnssError::Timeout));
        assert_eq!(clock.now_ms(), 200);
        assert_eq!(clock.delay_count(), 200 / POLL_INTERVAL_MS as u64);
    }

    #[tokio::test]
    async fn test_last_sleep_is_clamped() {
        let clock = MockTime::new();
        let shared = active();

        let result = read_within(&clock, &shared, 25).await;
        assert_eq!(result, Err(GnssError::Timeout));
        // 10 + 10 + 5, no overshoot
        assert_eq!(clock.now_ms(), 25);
        assert_eq!(clock.delay_count(), 3);
    }

    #[tokio::test]
    async fn test_reader_requires_active_session() {
        let clock = MockTime::new();
        let shared: SessionShared<NoopRawMutex> = SessionShared::new();
        shared.store().publish(valid_fix());

        let reader = GnssReader::new(&shared, &clock);
        assert!(!reader.is_active());
        assert_eq!(reader.get_data(1000).await, Err(GnssError::NotReady));
        assert_eq!(clock.now_ms(), 0);
    }

    #[tokio::test]
    async fn test_zero_timeout_checks_once() {
        let clock = MockTime::new();
        let shared = active();

        assert_eq!(read_within(&clock, &shared, 0).await, Err(GnssError::Timeout));
        assert_eq!(clock.delay_count(), 0);

        shared.store().publish(valid_fix());
        assert!(read_within(&clock, &shared, 0).await.is_ok());
    }

    #[tokio::test]
    async fn test_sleep_mid_wait_is_not_ready() {
        let shared = active();
        let clock = InterruptingClock {
            time: MockTime::new(),
            shared: &shared,
            at_delay: 3,
            next: SessionState::Sleeping,
        };

        let reader = GnssReader::new(&shared, &clock);
        assert_eq!(reader.get_data(1000).await, Err(GnssError::NotReady));
        // Ends at the next poll, the fix published while sleeping stays unread
        assert_eq!(clock.now_ms(), 30);
        assert!(shared.store().is_fresh());
    }

    #[tokio::test]
    async fn test_deinit_mid_wait_does_not_run_out_the_timeout() {
        let shared = active();
        let clock = InterruptingClock {
            time: MockTime::new(),
            shared: &shared,
            at_delay: 2,
            next: SessionState::Deinitialized,
        };

        assert_eq!(
            read_within(&clock, &shared, 1000).await,
            Err(GnssError::NotReady)
        );
        assert_eq!(clock.now_ms(), 20);
    }

    #[tokio::test]
    async fn test_wait_succeeds_while_still_active() {
        let shared = active();
        let clock = InterruptingClock {
            time: MockTime::new(),
            shared: &shared,
            at_delay: 4,
            next: SessionState::Active,
        };

        assert_eq!(read_within(&clock, &shared, 1000).await, Ok(valid_fix()));
        assert_eq!(clock.now_ms(), 40);
    }
}
