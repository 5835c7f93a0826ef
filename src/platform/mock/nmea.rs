//! Mock sentence decoder for testing
//!
//! `MockNmeaBus` stands in for the external NMEA decoder. It hands out
//! `MockDecoder` instances, keeps the registered handler, and lets tests
//! push events through that handler as if a sentence had been parsed.
//! Counters expose the decoder lifecycle so tests can check for leaks and
//! double registration.

use crate::devices::gnss::decoder::{
    DecoderConfig, DecoderDriver, DecoderFault, DecoderInstance, FixEventHandler, RawFixEvent,
};
use core::cell::RefCell;
use embassy_sync::blocking_mutex::{raw::CriticalSectionRawMutex, Mutex};

#[derive(Default)]
struct BusState<'a> {
    handler: Option<&'a dyn FixEventHandler>,
    live: u32,
    creations: u32,
    registrations: u32,
    releases: u32,
    fail_next_create: Option<DecoderFault>,
    reject_handlers: bool,
    last_config: Option<DecoderConfig>,
}

/// Mock decoder driver
///
/// Shared by reference between the session (as its `DecoderDriver`) and the
/// test (to inject events and failures). Safe to `emit` from another thread.
pub struct MockNmeaBus<'a> {
    state: Mutex<CriticalSectionRawMutex, RefCell<BusState<'a>>>,
}

impl<'a> MockNmeaBus<'a> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(RefCell::new(BusState::default())),
        }
    }

    fn with<R>(&self, f: impl FnOnce(&mut BusState<'a>) -> R) -> R {
        self.state.lock(|cell| f(&mut cell.borrow_mut()))
    }

    /// Make the next `create` fail with `fault`
    pub fn fail_next_create(&self, fault: DecoderFault) {
        self.with(|s| s.fail_next_create = Some(fault));
    }

    /// Refuse (or accept again) handler registrations
    pub fn set_reject_handlers(&self, reject: bool) {
        self.with(|s| s.reject_handlers = reject);
    }

    /// Deliver an event to the registered handler, as the decoder task would.
    ///
    /// Returns `false` if no handler is attached.
    pub fn emit(&self, event: &RawFixEvent) -> bool {
        // Copy the handler out so it runs outside the bus lock
        match self.with(|s| s.handler) {
            Some(handler) => {
                handler.on_event(event);
                true
            }
            None => false,
        }
    }

    /// Decoders created and not yet released
    pub fn live_decoders(&self) -> u32 {
        self.with(|s| s.live)
    }

    pub fn creations(&self) -> u32 {
        self.with(|s| s.creations)
    }

    /// Successful handler registrations
    pub fn registrations(&self) -> u32 {
        self.with(|s| s.registrations)
    }

    pub fn releases(&self) -> u32 {
        self.with(|s| s.releases)
    }

    pub fn has_handler(&self) -> bool {
        self.with(|s| s.handler.is_some())
    }

    /// Configuration passed to the most recent `create`
    pub fn last_config(&self) -> Option<DecoderConfig> {
        self.with(|s| s.last_config)
    }
}

impl Default for MockNmeaBus<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'b, 'a> DecoderDriver<'a> for &'b MockNmeaBus<'a> {
    type Decoder = MockDecoder<'b, 'a>;

    fn create(&mut self, config: &DecoderConfig) -> Result<Self::Decoder, DecoderFault> {
        let bus: &'b MockNmeaBus<'a> = *self;
        bus.with(|s| {
            s.last_config = Some(*config);
            if let Some(fault) = s.fail_next_create.take() {
                return Err(fault);
            }
            s.creations += 1;
            s.live += 1;
            Ok(())
        })?;
        Ok(MockDecoder {
            bus,
            attached: false,
        })
    }
}

/// Decoder instance handed out by `MockNmeaBus`
pub struct MockDecoder<'b, 'a> {
    bus: &'b MockNmeaBus<'a>,
    attached: bool,
}

impl<'a> DecoderInstance<'a> for MockDecoder<'_, 'a> {
    fn add_handler(&mut self, handler: &'a dyn FixEventHandler) -> Result<(), DecoderFault> {
        self.bus.with(|s| {
            if s.reject_handlers || s.handler.is_some() {
                return Err(DecoderFault::HandlerRejected);
            }
            s.handler = Some(handler);
            s.registrations += 1;
            Ok(())
        })?;
        self.attached = true;
        Ok(())
    }

    fn remove_handler(&mut self) {
        if self.attached {
            self.bus.with(|s| s.handler = None);
            self.attached = false;
        }
    }

    fn release(mut self) {
        self.remove_handler();
        self.bus.with(|s| {
            s.live -= 1;
            s.releases += 1;
        });
    }
}
