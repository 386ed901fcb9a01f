//! The probe: a thread-safe, bounded signal buffer with channel ingestion.
//!
//! A [`Probe`] collects floating-point readings from many producer threads
//! and retains a bounded history of them. It composes:
//!
//! - an activation state machine (Inactive / Active) guarding whether
//!   ingestion is live;
//! - a bounded MPMC ingestion channel, the single hand-off point between
//!   producers and the consumer;
//! - a background consumer thread, one per activation period, draining the
//!   channel into the buffer;
//! - a bounded history buffer, trimmed front-first once it exceeds the
//!   configured capacity;
//! - synchronous accessors (push, flush, clear, read) that interleave safely
//!   with the consumer and with each other.
//!
//! # Locking
//!
//! Two independent `parking_lot` mutexes: one over the activation state, one
//! over the signal buffer. No operation holds both at once, so a producer
//! blocked on a full channel never blocks an [`is_active`](Probe::is_active)
//! query, and a caller holding a signal snapshot never stalls activation
//! transitions.
//!
//! # Ordering
//!
//! Values sent over the channel reach the buffer in send order. Values
//! appended via [`push`](Probe::push) order against channel values only when
//! `flush_first` is requested; otherwise the two paths interleave
//! arbitrarily. Eviction always removes the oldest surviving values
//! regardless of entry path.

use crossbeam_channel::{bounded, Receiver, Sender};
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

use crate::config::ProbeConfig;
use crate::error::ProbeError;
use crate::render::{PlotSpec, SignalRenderer};

/// Activation state. The Active variant owns the channel endpoints and the
/// consumer's join handle; the channel exists iff the probe is Active.
enum Activation {
    Inactive,
    Active {
        tx: Sender<f64>,
        rx: Receiver<f64>,
        consumer: JoinHandle<()>,
    },
}

/// A thread-safe, bounded history buffer for floating-point readings.
///
/// `Probe` is a cheap-to-clone handle over shared state; clone it freely
/// into producer threads. A probe is constructed Inactive with an empty
/// buffer; [`activate`](Probe::activate) opens the ingestion channel and
/// starts the background consumer, [`deactivate`](Probe::deactivate) closes
/// the channel, drains it fully, and returns the collected signal.
///
/// The buffer is preserved across reactivation; only
/// [`clear_signal`](Probe::clear_signal) empties it.
#[derive(Clone)]
pub struct Probe {
    config: Arc<ProbeConfig>,
    signal: Arc<Mutex<Vec<f64>>>,
    activation: Arc<Mutex<Activation>>,
}

impl Default for Probe {
    fn default() -> Self {
        Self::new()
    }
}

impl Probe {
    /// Create a probe with default configuration: an effectively unbounded
    /// signal buffer and an ingestion channel capacity of 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: Arc::new(ProbeConfig::default()),
            signal: Arc::new(Mutex::new(Vec::new())),
            activation: Arc::new(Mutex::new(Activation::Inactive)),
        }
    }

    /// Create a probe from an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::InvalidConfig`] if the configuration fails
    /// validation (zero signal capacity or zero channel capacity).
    pub fn with_config(config: ProbeConfig) -> Result<Self, ProbeError> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
            signal: Arc::new(Mutex::new(Vec::new())),
            activation: Arc::new(Mutex::new(Activation::Inactive)),
        })
    }

    /// The probe's configuration.
    #[must_use]
    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// The probe's display name, if one was configured.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.config.name.as_deref()
    }

    /// Whether the probe is currently Active.
    ///
    /// Takes only the activation lock, never the buffer lock, so this query
    /// stays responsive while producers are blocked on a full channel.
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(*self.activation.lock(), Activation::Active { .. })
    }

    /// Activate the probe: allocate the ingestion channel and start the
    /// background consumer. Idempotent; calling on an Active probe is a
    /// no-op and never double-starts a consumer or leaks a channel.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Spawn`] if the consumer thread cannot be
    /// started; the probe stays Inactive in that case.
    pub fn activate(&self) -> Result<(), ProbeError> {
        let mut activation = self.activation.lock();
        if matches!(*activation, Activation::Active { .. }) {
            return Ok(());
        }

        let (tx, rx) = bounded(self.config.input_buffer_length);
        let consumer = self.spawn_consumer(rx.clone())?;
        *activation = Activation::Active { tx, rx, consumer };
        debug!(probe = self.config.name.as_deref(), "probe activated");
        Ok(())
    }

    /// Deactivate the probe and return the signal it collected.
    ///
    /// Closes the ingestion channel, waits for the background consumer to
    /// drain every value already enqueued and exit, then snapshots the
    /// buffer. No reading sent before this call is lost; the wait is
    /// intended backpressure, not a timeout condition. Calling on an
    /// Inactive probe is a no-op returning an empty vec.
    pub fn deactivate(&self) -> Vec<f64> {
        let taken = {
            let mut activation = self.activation.lock();
            match std::mem::replace(&mut *activation, Activation::Inactive) {
                Activation::Active { tx, rx, consumer } => Some((tx, rx, consumer)),
                Activation::Inactive => None,
            }
        };

        let Some((tx, rx, consumer)) = taken else {
            return Vec::new();
        };

        // Dropping our endpoints disconnects the channel once in-flight
        // sends settle; the consumer drains what is queued and exits.
        drop(tx);
        drop(rx);
        if consumer.join().is_err() {
            warn!(
                probe = self.config.name.as_deref(),
                "probe consumer terminated abnormally"
            );
        }

        debug!(probe = self.config.name.as_deref(), "probe deactivated");
        self.signal.lock().clone()
    }

    /// Send a value into the ingestion channel.
    ///
    /// Blocks while the channel is full (backpressure). The channel's FIFO
    /// order is preserved into the buffer.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Inactive`] if the probe has no live channel;
    /// values are never silently dropped.
    pub fn send(&self, value: f64) -> Result<(), ProbeError> {
        let tx = {
            let activation = self.activation.lock();
            match &*activation {
                Activation::Active { tx, .. } => tx.clone(),
                Activation::Inactive => return Err(ProbeError::Inactive),
            }
        };

        // The blocking send happens outside the activation lock so a stalled
        // producer cannot block state queries or transitions.
        tx.send(value).map_err(|_| ProbeError::ChannelClosed)
    }

    /// Synchronously drain currently queued channel values into the buffer.
    ///
    /// Drains up to the number of values queued at call time, then applies
    /// eviction. Best-effort catch-up, not a barrier: values enqueued after
    /// the count is taken, or picked up by the racing consumer, are left to
    /// the background consumer. No-op while Inactive.
    pub fn flush(&self) {
        let Some(rx) = self.receiver() else {
            return;
        };

        let mut signal = self.signal.lock();
        Self::drain_queued(&rx, &mut signal);
        Self::evict(&mut signal, self.config.max_signal_length);
    }

    /// Append a value to the signal, optionally draining queued channel
    /// values first.
    ///
    /// With `flush_first`, the drain, the append, and eviction happen under
    /// a single buffer-lock hold, so values already queued at call time land
    /// ahead of `value`. Without it, `value` is appended immediately with no
    /// ordering guarantee against the channel path.
    ///
    /// The append itself does not require the probe to be Active; only the
    /// flush portion degrades to a no-op without a channel.
    pub fn push(&self, value: f64, flush_first: bool) {
        let rx = if flush_first { self.receiver() } else { None };

        let mut signal = self.signal.lock();
        if let Some(rx) = rx {
            Self::drain_queued(&rx, &mut signal);
        }
        signal.push(value);
        Self::evict(&mut signal, self.config.max_signal_length);
    }

    /// Atomically replace the signal with an empty sequence.
    ///
    /// The ingestion channel and activation state are untouched; queued
    /// values will still arrive afterwards.
    pub fn clear_signal(&self) {
        *self.signal.lock() = Vec::new();
    }

    /// A snapshot of the collected signal.
    ///
    /// Returns a defensive copy; mutating it cannot corrupt the probe.
    #[must_use]
    pub fn signal(&self) -> Vec<f64> {
        self.signal.lock().clone()
    }

    /// The most recent collected value, or 0.0 if none has been collected.
    #[must_use]
    pub fn recent_value(&self) -> f64 {
        self.signal.lock().last().copied().unwrap_or(0.0)
    }

    /// Render a snapshot of the current signal through a collaborator.
    ///
    /// The snapshot is taken at call time; the buffer and activation state
    /// are untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Render`] if the collaborator fails. Rendering
    /// is cosmetic to the probe's contract, so this is always recoverable.
    pub fn render<R: SignalRenderer + ?Sized>(
        &self,
        renderer: &R,
        plot: &PlotSpec,
    ) -> Result<(), ProbeError> {
        let snapshot = self.signal();
        renderer.render(&snapshot, plot)?;
        Ok(())
    }

    /// Clone the channel's receiving end, or `None` while Inactive.
    fn receiver(&self) -> Option<Receiver<f64>> {
        match &*self.activation.lock() {
            Activation::Active { rx, .. } => Some(rx.clone()),
            Activation::Inactive => None,
        }
    }

    /// Move up to the currently queued number of values into the buffer.
    /// Caller holds the buffer lock and applies eviction afterwards.
    fn drain_queued(rx: &Receiver<f64>, signal: &mut Vec<f64>) {
        let queued = rx.len();
        for _ in 0..queued {
            match rx.try_recv() {
                Ok(value) => signal.push(value),
                // The background consumer got there first.
                Err(_) => break,
            }
        }
    }

    /// FIFO truncation: drop the oldest values until the signal fits.
    fn evict(signal: &mut Vec<f64>, capacity: usize) {
        if signal.len() > capacity {
            let excess = signal.len() - capacity;
            signal.drain(..excess);
        }
    }

    /// Start the background consumer for one activation period. It exits
    /// once the channel disconnects and every queued value has been moved
    /// into the buffer.
    fn spawn_consumer(&self, rx: Receiver<f64>) -> Result<JoinHandle<()>, ProbeError> {
        let signal = Arc::clone(&self.signal);
        let capacity = self.config.max_signal_length;
        let thread_name = match self.config.name.as_deref() {
            Some(name) => format!("probe-consumer-{name}"),
            None => "probe-consumer".to_string(),
        };

        let handle = thread::Builder::new().name(thread_name).spawn(move || {
            for value in rx.iter() {
                let mut signal = signal.lock();
                signal.push(value);
                Self::evict(&mut signal, capacity);
            }
            debug!("probe consumer drained and exited");
        })?;
        Ok(handle)
    }
}

impl std::fmt::Debug for Probe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Probe")
            .field("name", &self.config.name)
            .field("max_signal_length", &self.config.max_signal_length)
            .field("input_buffer_length", &self.config.input_buffer_length)
            .field("active", &self.is_active())
            .finish()
    }
}
