//! Fix monitor task
//!
//! Periodically reads a fix and reports it, the way a board's GNSS task
//! runs on top of the session: read with a long timeout, log the fix or
//! a throttled "waiting for fix" notice, then wait for the next round.

use crate::core::traits::AsyncDelay;
use crate::devices::gnss::error::GnssError;
use crate::devices::gnss::fix::FixSnapshot;
use crate::devices::gnss::reader::FixSource;

/// Monitor timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MonitorConfig {
    /// Timeout for each read
    pub read_timeout_ms: u32,
    /// Wait between reads
    pub report_interval_ms: u32,
    /// Log "waiting for fix" on every n-th timed-out attempt
    pub waiting_notice_every: u32,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            read_timeout_ms: 10_000,
            report_interval_ms: 5_000,
            waiting_notice_every: 6,
        }
    }
}

/// Result of one monitor round
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MonitorOutcome {
    Fix(FixSnapshot),
    /// Read timed out
    Waiting,
    /// Any other read error
    Failed(GnssError),
}

/// Periodic fix reader with attempt statistics
#[derive(Debug)]
pub struct FixMonitor {
    config: MonitorConfig,
    attempts: u32,
    fixes: u32,
}

impl FixMonitor {
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            config,
            attempts: 0,
            fixes: 0,
        }
    }

    /// Read attempts so far
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Successful reads so far
    pub fn fixes(&self) -> u32 {
        self.fixes
    }

    /// Whether a timeout on `attempt` (1-based) gets a "waiting" notice
    pub fn notice_due(&self, attempt: u32) -> bool {
        let every = self.config.waiting_notice_every.max(1);
        attempt % every == 1 % every
    }

    /// One read-and-report round, without the trailing wait
    pub async fn poll_once<S: FixSource>(&mut self, source: &S) -> MonitorOutcome {
        self.attempts = self.attempts.wrapping_add(1);

        match source.get_data(self.config.read_timeout_ms).await {
            Ok(fix) => {
                self.fixes = self.fixes.wrapping_add(1);
                report_fix(self.fixes, &fix);
                MonitorOutcome::Fix(fix)
            }
            Err(GnssError::Timeout) => {
                if self.notice_due(self.attempts) {
                    crate::log_warn!("GNSS: waiting for fix... [attempt {}]", self.attempts);
                }
                MonitorOutcome::Waiting
            }
            Err(e) => {
                crate::log_error!("GNSS: read error: {}", e);
                MonitorOutcome::Failed(e)
            }
        }
    }

    /// Run forever
    pub async fn run<S: FixSource, D: AsyncDelay>(&mut self, source: &S, delay: &D) {
        crate::log_info!("GNSS: monitor started, waiting for fix");
        loop {
            self.poll_once(source).await;
            delay.delay_ms(self.config.report_interval_ms).await;
        }
    }
}

impl Default for FixMonitor {
    fn default() -> Self {
        Self::new(MonitorConfig::default())
    }
}

fn report_fix(count: u32, fix: &FixSnapshot) {
    crate::log_info!("=== GPS FIX [{}] ===", count);
    crate::log_info!("  Lat: {} | Lon: {}", fix.latitude, fix.longitude);
    crate::log_info!("  Satellites: {} locked", fix.satellites_locked);
    if fix.altitude_known {
        crate::log_info!("  Altitude: {} m", fix.altitude);
    }
    if fix.time_known() {
        crate::log_info!(
            "  UTC: {}:{}:{} | Date: {}/{}/{}",
            fix.utc_time.hour,
            fix.utc_time.minute,
            fix.utc_time.second,
            fix.utc_date.day,
            fix.utc_date.month,
            fix.utc_date.year
        );
    }
    if fix.hdop_known {
        crate::log_info!("  HDOP: {}", fix.horizontal_dilution);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::gnss::error::Result;
    use core::cell::RefCell;
    use std::collections::VecDeque;

    struct ScriptedSource {
        replies: RefCell<VecDeque<Result<FixSnapshot>>>,
        timeouts_seen: RefCell<Vec<u32>>,
    }

    impl ScriptedSource {
        fn new(replies: Vec<Result<FixSnapshot>>) -> Self {
            Self {
                replies: RefCell::new(replies.into()),
                timeouts_seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl FixSource for ScriptedSource {
        async fn get_data(&self, timeout_ms: u32) -> Result<FixSnapshot> {
            self.timeouts_seen.borrow_mut().push(timeout_ms);
            self.replies
                .borrow_mut()
                .pop_front()
                .unwrap_or(Err(GnssError::Timeout))
        }
    }

    fn fix() -> FixSnapshot {
        FixSnapshot {
            latitude: 41.0,
            longitude: 29.0,
            satellites_locked: 8,
            altitude: 35.5,
            altitude_known: true,
            position_valid: true,
            ..FixSnapshot::default()
        }
    }

    #[tokio::test]
    async fn test_counts_attempts_and_fixes() {
        let source = ScriptedSource::new(vec![
            Err(GnssError::Timeout),
            Ok(fix()),
            Err(GnssError::NotReady),
            Ok(fix()),
        ]);
        let mut monitor = FixMonitor::default();

        assert_eq!(monitor.poll_once(&source).await, MonitorOutcome::Waiting);
        assert_eq!(monitor.poll_once(&source).await, MonitorOutcome::Fix(fix()));
        assert_eq!(
            monitor.poll_once(&source).await,
            MonitorOutcome::Failed(GnssError::NotReady)
        );
        assert_eq!(monitor.poll_once(&source).await, MonitorOutcome::Fix(fix()));

        assert_eq!(monitor.attempts(), 4);
        assert_eq!(monitor.fixes(), 2);
    }

    #[tokio::test]
    async fn test_uses_configured_timeout() {
        let source = ScriptedSource::new(vec![Ok(fix())]);
        let mut monitor = FixMonitor::new(MonitorConfig {
            read_timeout_ms: 2_500,
            ..MonitorConfig::default()
        });

        monitor.poll_once(&source).await;
        assert_eq!(*source.timeouts_seen.borrow(), vec![2_500]);
    }

    #[test]
    fn test_waiting_notice_schedule() {
        let monitor = FixMonitor::default();
        let due: Vec<u32> = (1..=14).filter(|a| monitor.notice_due(*a)).collect();
        assert_eq!(due, vec![1, 7, 13]);
    }

    #[test]
    fn test_waiting_notice_every_attempt() {
        let monitor = FixMonitor::new(MonitorConfig {
            waiting_notice_every: 1,
            ..MonitorConfig::default()
        });
        assert!((1..=5).all(|a| monitor.notice_due(a)));
    }
}
