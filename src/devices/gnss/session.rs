//! GNSS session state machine
//!
//! `GnssSession` is the single owner of one receiver: its wake line, its
//! decoder and the transitions between power states. It is driven from one
//! control task (`&mut self`). Tasks that only need fixes take a
//! [`GnssReader`] instead, which sees the same state through
//! [`SessionShared`].
//!
//! ```text
//!                 init                sleep
//! Uninitialized ───────► Active ◄──────────────► Sleeping
//!       │                  │          wakeup        │
//!       │                  │ deinit                 │ deinit
//!       └──────────────────┴──────► Deinitialized ◄─┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
//! use pico_gnss::core::traits::EmbassyTime;
//! use pico_gnss::devices::gnss::{GnssConfig, GnssSession, SessionShared};
//!
//! static GNSS: SessionShared<CriticalSectionRawMutex> = SessionShared::new();
//!
//! let mut session = GnssSession::new(&GNSS, decoder_driver, wake_pin, EmbassyTime);
//! session.init(&GnssConfig::default()).await?;
//! let fix = session.get_data(10_000).await?;
//! ```

use crate::core::logging;
use crate::core::traits::{AsyncDelay, TimeSource};
use crate::devices::gnss::bridge::DecoderBridge;
use crate::devices::gnss::config::GnssConfig;
use crate::devices::gnss::decoder::{DecoderDriver, FixEventHandler};
use crate::devices::gnss::error::{GnssError, Result};
use crate::devices::gnss::fix::FixSnapshot;
use crate::devices::gnss::power::PowerGate;
use crate::devices::gnss::reader::{FixSource, GnssReader};
use crate::devices::gnss::store::FixStore;
use crate::platform::traits::GpioInterface;
use core::cell::Cell;
use embassy_sync::blocking_mutex::{
    raw::{CriticalSectionRawMutex, RawMutex},
    Mutex,
};

/// Session lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionState {
    Uninitialized,
    Active,
    Sleeping,
    /// Terminal
    Deinitialized,
}

/// State visible to every task: the session state and the fix store
///
/// Both use the same short critical-section discipline.
pub struct SessionShared<M: RawMutex = CriticalSectionRawMutex> {
    state: Mutex<M, Cell<SessionState>>,
    store: FixStore<M>,
}

impl<M: RawMutex> SessionShared<M> {
    /// Usable in `static` initializers
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(Cell::new(SessionState::Uninitialized)),
            store: FixStore::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state.lock(|s| s.get())
    }

    pub fn is_active(&self) -> bool {
        self.state() == SessionState::Active
    }

    pub fn store(&self) -> &FixStore<M> {
        &self.store
    }

    /// Copy of the fresh fix, if any, provided the session is Active
    ///
    /// The state check and the store read happen under the state lock, so a
    /// session that has left Active never hands out a fix.
    ///
    /// # Errors
    ///
    /// `NotReady` unless Active.
    pub fn read_if_active(&self) -> Result<Option<FixSnapshot>> {
        self.state.lock(|s| match s.get() {
            SessionState::Active => Ok(self.store.try_read()),
            _ => Err(GnssError::NotReady),
        })
    }

    pub(crate) fn set_state(&self, state: SessionState) -> SessionState {
        self.state.lock(|s| s.replace(state))
    }
}

impl<M: RawMutex> Default for SessionShared<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// Owner of one GNSS receiver
pub struct GnssSession<'a, D, P, T, M = CriticalSectionRawMutex>
where
    D: DecoderDriver<'a>,
    P: GpioInterface,
    M: RawMutex,
{
    shared: &'a SessionShared<M>,
    driver: D,
    power: PowerGate<P>,
    bridge: Option<DecoderBridge<'a, D::Decoder>>,
    clock: T,
    settle_ms: u32,
}

impl<'a, D, P, T, M> GnssSession<'a, D, P, T, M>
where
    D: DecoderDriver<'a>,
    P: GpioInterface,
    T: TimeSource + AsyncDelay,
    M: RawMutex + Sync,
{
    /// Create a session. Nothing is touched until `init`.
    ///
    /// # Arguments
    ///
    /// * `shared` - State shared with readers; usually a `static`
    /// * `driver` - Factory for the sentence decoder
    /// * `wake_line` - Receiver wake/enable pin
    /// * `clock` - Time source for settle delays and read timeouts
    pub fn new(shared: &'a SessionShared<M>, driver: D, wake_line: P, clock: T) -> Self {
        Self {
            shared,
            driver,
            power: PowerGate::new(wake_line),
            bridge: None,
            clock,
            settle_ms: 0,
        }
    }

    /// Power the receiver and start decoding
    ///
    /// Idempotent while Active or Sleeping. On failure the session stays
    /// Uninitialized and `init` may be retried; the wake line may be left
    /// asserted until then.
    ///
    /// # Errors
    ///
    /// - `InvalidConfig` if `config` fails validation
    /// - `Power` if the wake line cannot be configured or driven
    /// - `DecoderInit` / `HandlerRegistration` from the decoder bridge
    /// - `AlreadyDeinitialized` after `deinit`
    pub async fn init(&mut self, config: &GnssConfig) -> Result<()> {
        match self.shared.state() {
            SessionState::Uninitialized => {}
            SessionState::Active | SessionState::Sleeping => {
                crate::log_warn!("GNSS: already initialized");
                return Ok(());
            }
            SessionState::Deinitialized => {
                crate::log_error!("GNSS: init after deinit");
                return Err(GnssError::AlreadyDeinitialized);
            }
        }

        config.validate().inspect_err(|_| {
            crate::log_error!("GNSS: invalid configuration");
        })?;
        logging::set_verbosity(config.verbosity);

        self.power.configure().map_err(|e| {
            crate::log_error!("GNSS: failed to configure wake line {}: {}", config.wake_line, e);
            GnssError::Power(e)
        })?;
        self.power.set_line(true)?;
        self.settle_ms = config.wake_settle_ms;
        self.clock.delay_ms(self.settle_ms).await;

        crate::log_info!(
            "GNSS: UART={} RX={} TX={} WK={} baud={}",
            config.transport_id,
            config.rx_line,
            config.tx_line,
            config.wake_line,
            config.baud_rate
        );

        let shared: &'a SessionShared<M> = self.shared;
        let handler: &'a dyn FixEventHandler = &shared.store;
        let bridge = DecoderBridge::start(&mut self.driver, &config.decoder_config(), handler)?;
        self.bridge = Some(bridge);
        self.shared.set_state(SessionState::Active);

        crate::log_info!("GNSS: initialized successfully");
        Ok(())
    }

    /// Put the receiver into its low-power state
    ///
    /// The decoder keeps running and the stored fix is kept.
    ///
    /// # Errors
    ///
    /// `NotReady` unless Active; `Power` if the line cannot be driven.
    pub async fn sleep(&mut self) -> Result<()> {
        if self.shared.state() != SessionState::Active {
            crate::log_warn!("GNSS: sleep requested while not active");
            return Err(GnssError::NotReady);
        }

        self.power.set_line(false)?;
        self.shared.set_state(SessionState::Sleeping);
        self.clock.delay_ms(self.settle_ms).await;
        crate::log_info!("GNSS: sleep mode activated");
        Ok(())
    }

    /// Bring the receiver back from sleep
    ///
    /// # Errors
    ///
    /// `NotReady` unless Sleeping; `Power` if the line cannot be driven.
    pub async fn wakeup(&mut self) -> Result<()> {
        if self.shared.state() != SessionState::Sleeping {
            crate::log_warn!("GNSS: wakeup requested while not sleeping");
            return Err(GnssError::NotReady);
        }

        self.power.set_line(true)?;
        self.shared.set_state(SessionState::Active);
        self.clock.delay_ms(self.settle_ms).await;
        crate::log_info!("GNSS: wakeup");
        Ok(())
    }

    /// Stop the decoder, release the wake line and drop the stored fix
    ///
    /// Terminal and idempotent.
    pub fn deinit(&mut self) {
        if self.shared.state() == SessionState::Deinitialized {
            return;
        }

        // Decoder first so no event lands after the store is cleared
        if let Some(mut bridge) = self.bridge.take() {
            bridge.stop();
        }
        if let Err(e) = self.power.reset() {
            crate::log_warn!("GNSS: failed to release wake line: {}", e);
        }
        self.shared.store.clear();
        self.shared.set_state(SessionState::Deinitialized);

        crate::log_info!("GNSS: deinitialized");
    }

    /// Wait up to `timeout_ms` for a fix
    ///
    /// # Errors
    ///
    /// `NotReady` unless Active (checked before waiting); `Timeout` if no
    /// fix arrives in time.
    pub async fn get_data(&self, timeout_ms: u32) -> Result<FixSnapshot> {
        GnssReader::new(self.shared, &self.clock)
            .get_data(timeout_ms)
            .await
    }

    pub fn is_active(&self) -> bool {
        self.shared.is_active()
    }

    pub fn state(&self) -> SessionState {
        self.shared.state()
    }

    /// Whether the wake line is currently asserted
    pub fn is_powered(&self) -> bool {
        self.power.is_asserted()
    }

    /// Access the wake line pin
    pub fn wake_line(&self) -> &P {
        self.power.line()
    }

    /// Handle for tasks that only read fixes
    pub fn reader(&self) -> GnssReader<'a, T, M>
    where
        T: Clone,
    {
        GnssReader::new(self.shared, self.clock.clone())
    }
}

impl<'a, D, P, T, M> FixSource for GnssSession<'a, D, P, T, M>
where
    D: DecoderDriver<'a>,
    P: GpioInterface,
    T: TimeSource + AsyncDelay,
    M: RawMutex + Sync,
{
    async fn get_data(&self, timeout_ms: u32) -> Result<FixSnapshot> {
        GnssSession::get_data(self, timeout_ms).await
    }
}
