//! Decoder bridge
//!
//! Owns the running decoder instance and routes its events into the
//! [`FixStore`]. Only valid location updates reach the store; unknown
//! sentences and updates without a position are dropped, never merged.

use crate::devices::gnss::decoder::{
    DecoderConfig, DecoderDriver, DecoderInstance, FixEventHandler, LocationUpdate, RawFixEvent,
};
use crate::devices::gnss::error::{GnssError, Result};
use crate::devices::gnss::fix::FixSnapshot;
use crate::devices::gnss::store::FixStore;
use embassy_sync::blocking_mutex::raw::RawMutex;

impl From<&LocationUpdate> for FixSnapshot {
    fn from(update: &LocationUpdate) -> Self {
        FixSnapshot {
            latitude: update.latitude,
            longitude: update.longitude,
            altitude: update.altitude,
            altitude_known: update.altitude != 0.0,
            horizontal_dilution: update.horizontal_dilution,
            hdop_known: update.horizontal_dilution > 0.0,
            satellites_locked: update.satellites_in_use,
            satellites_visible: update.satellites_in_view,
            utc_time: update.utc_time,
            utc_date: update.utc_date,
            position_valid: update.valid,
        }
    }
}

impl<M: RawMutex + Sync> FixEventHandler for FixStore<M> {
    fn on_event(&self, event: &RawFixEvent) {
        match event {
            RawFixEvent::LocationUpdate(update) if update.valid => {
                self.publish(FixSnapshot::from(update));
                crate::log_debug!(
                    "GNSS: fix updated lat={} lon={} sats={}",
                    update.latitude,
                    update.longitude,
                    update.satellites_in_use
                );
            }
            RawFixEvent::LocationUpdate(_) => {
                crate::log_trace!("GNSS: update without valid position ignored");
            }
            RawFixEvent::UnknownSentence => {
                crate::log_debug!("GNSS: unknown sentence received");
            }
        }
    }
}

/// Running decoder with the session's handler attached
pub struct DecoderBridge<'a, I: DecoderInstance<'a>> {
    decoder: Option<I>,
    _lifetime: core::marker::PhantomData<&'a ()>,
}

impl<'a, I: DecoderInstance<'a>> DecoderBridge<'a, I> {
    /// Construct a decoder and attach `handler` to it
    ///
    /// # Errors
    ///
    /// - `GnssError::DecoderInit` if the driver cannot construct a decoder
    /// - `GnssError::HandlerRegistration` if the handler is refused; the
    ///   decoder has already been released when this is returned
    pub fn start<D>(
        driver: &mut D,
        config: &DecoderConfig,
        handler: &'a dyn FixEventHandler,
    ) -> Result<Self>
    where
        D: DecoderDriver<'a, Decoder = I>,
    {
        crate::log_info!(
            "GNSS: decoder config UART={} RX={} baud={} queue={}",
            config.transport_id,
            config.rx_line,
            config.uart.baud_rate,
            config.event_queue_depth
        );

        let mut decoder = driver.create(config).map_err(|e| {
            crate::log_error!("GNSS: failed to initialize decoder: {:?}", e);
            GnssError::DecoderInit(e)
        })?;

        if let Err(e) = decoder.add_handler(handler) {
            crate::log_error!("GNSS: failed to add event handler: {:?}", e);
            decoder.release();
            return Err(GnssError::HandlerRegistration(e));
        }

        Ok(Self {
            decoder: Some(decoder),
            _lifetime: core::marker::PhantomData,
        })
    }

    /// Detach the handler and release the decoder. No-op once stopped.
    pub fn stop(&mut self) {
        if let Some(mut decoder) = self.decoder.take() {
            crate::log_info!("GNSS: deinitializing decoder");
            decoder.remove_handler();
            decoder.release();
        }
    }

    pub fn is_running(&self) -> bool {
        self.decoder.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::gnss::decoder::DecoderFault;
    use crate::devices::gnss::fix::{UtcDate, UtcTime};
    use crate::platform::mock::MockNmeaBus;
    use crate::devices::gnss::config::GnssConfig;
    use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

    fn update(valid: bool) -> LocationUpdate {
        LocationUpdate {
            latitude: 41.0,
            longitude: 29.0,
            altitude: 35.5,
            horizontal_dilution: 0.9,
            satellites_in_use: 8,
            satellites_in_view: 12,
            utc_time: UtcTime {
                hour: 12,
                minute: 35,
                second: 19,
            },
            utc_date: UtcDate {
                day: 23,
                month: 3,
                year: 2024,
            },
            valid,
        }
    }

    #[test]
    fn test_translation_flags() {
        let fix = FixSnapshot::from(&update(true));
        assert!(fix.position_valid);
        assert!(fix.altitude_known);
        assert!(fix.hdop_known);
        assert_eq!(fix.satellites_locked, 8);
        assert_eq!(fix.satellites_visible, 12);
        assert_eq!(fix.utc_date.year, 2024);

        let bare = FixSnapshot::from(&LocationUpdate {
            altitude: 0.0,
            horizontal_dilution: 0.0,
            ..update(true)
        });
        assert!(!bare.altitude_known);
        assert!(!bare.hdop_known);
    }

    #[test]
    fn test_valid_update_publishes() {
        let store: FixStore<CriticalSectionRawMutex> = FixStore::new();
        store.on_event(&RawFixEvent::LocationUpdate(update(true)));

        let fix = store.try_read().unwrap();
        assert_eq!(fix.latitude, 41.0);
        assert_eq!(fix.longitude, 29.0);
    }

    #[test]
    fn test_invalid_and_unknown_events_leave_store_untouched() {
        let store: FixStore<CriticalSectionRawMutex> = FixStore::new();
        store.on_event(&RawFixEvent::LocationUpdate(update(false)));
        store.on_event(&RawFixEvent::UnknownSentence);
        assert!(store.try_read().is_none());
        assert_eq!(store.publish_count(), 0);

        store.on_event(&RawFixEvent::LocationUpdate(update(true)));
        let before = store.try_read();
        store.on_event(&RawFixEvent::LocationUpdate(LocationUpdate {
            latitude: 0.0,
            longitude: 0.0,
            ..update(false)
        }));
        assert_eq!(store.try_read(), before);
        assert_eq!(store.publish_count(), 1);
    }

    #[test]
    fn test_start_and_stop() {
        let store: FixStore<CriticalSectionRawMutex> = FixStore::new();
        let bus = MockNmeaBus::new();
        let config = GnssConfig::default().decoder_config();

        let mut bridge = DecoderBridge::start(&mut &bus, &config, &store).unwrap();
        assert!(bridge.is_running());
        assert_eq!(bus.live_decoders(), 1);
        assert!(bus.has_handler());
        assert_eq!(bus.last_config(), Some(config));

        bus.emit(&RawFixEvent::LocationUpdate(update(true)));
        assert!(store.is_fresh());

        bridge.stop();
        assert!(!bridge.is_running());
        assert_eq!(bus.live_decoders(), 0);
        assert!(!bus.has_handler());

        // Second stop is a no-op
        bridge.stop();
        assert_eq!(bus.releases(), 1);
    }

    #[test]
    fn test_create_failure() {
        let store: FixStore<CriticalSectionRawMutex> = FixStore::new();
        let bus = MockNmeaBus::new();
        bus.fail_next_create(DecoderFault::OutOfMemory);

        let result = DecoderBridge::start(&mut &bus, &GnssConfig::default().decoder_config(), &store);
        assert_eq!(
            result.err(),
            Some(GnssError::DecoderInit(DecoderFault::OutOfMemory))
        );
        assert_eq!(bus.live_decoders(), 0);
    }

    #[test]
    fn test_registration_failure_releases_decoder() {
        let store: FixStore<CriticalSectionRawMutex> = FixStore::new();
        let bus = MockNmeaBus::new();
        bus.set_reject_handlers(true);

        let result = DecoderBridge::start(&mut &bus, &GnssConfig::default().decoder_config(), &store);
        assert_eq!(
            result.err(),
            Some(GnssError::HandlerRegistration(DecoderFault::HandlerRejected))
        );
        assert_eq!(bus.creations(), 1);
        assert_eq!(bus.releases(), 1);
        assert_eq!(bus.live_decoders(), 0);
    }
}
