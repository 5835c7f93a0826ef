//! Fix types
//!
//! `FixSnapshot` is the session's own representation of a position sample.
//! It is `Copy` and is only ever replaced as a whole.

/// UTC time of day reported with a fix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UtcTime {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

/// UTC calendar date reported with a fix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UtcDate {
    pub day: u8,
    pub month: u8,
    pub year: u16,
}

/// Most recent valid position sample
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FixSnapshot {
    /// Latitude in degrees (-90 to +90)
    pub latitude: f64,
    /// Longitude in degrees (-180 to +180)
    pub longitude: f64,
    /// Altitude in meters above mean sea level
    pub altitude: f32,
    /// `false` when the receiver left altitude empty (reported as 0.0)
    pub altitude_known: bool,
    /// Horizontal dilution of precision
    pub horizontal_dilution: f32,
    /// `false` when the receiver reported no HDOP
    pub hdop_known: bool,
    /// Satellites used in the solution
    pub satellites_locked: u8,
    /// Satellites in view
    pub satellites_visible: u8,
    pub utc_time: UtcTime,
    pub utc_date: UtcDate,
    /// Always `true` for published snapshots
    pub position_valid: bool,
}

impl FixSnapshot {
    /// Whether `utc_time`/`utc_date` carry receiver time.
    ///
    /// Every published snapshot came from a valid update, and the receiver
    /// only reports a valid position once it has time.
    pub fn time_known(&self) -> bool {
        self.position_valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_snapshot_is_invalid() {
        let fix = FixSnapshot::default();
        assert!(!fix.position_valid);
        assert!(!fix.time_known());
        assert!(!fix.altitude_known);
        assert!(!fix.hdop_known);
    }

    #[test]
    fn test_time_known_follows_validity() {
        let fix = FixSnapshot {
            position_valid: true,
            utc_time: UtcTime {
                hour: 12,
                minute: 35,
                second: 19,
            },
            ..FixSnapshot::default()
        };
        assert!(fix.time_known());
        assert_eq!(fix.utc_time.minute, 35);
    }
}
