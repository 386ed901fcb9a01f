//! # Signal Probe Library
//!
//! This crate provides the [`Probe`] type: a thread-safe, bounded history
//! buffer for streams of floating-point readings. Many independent producer
//! threads report observations into a single collector without data races,
//! while any caller can inspect the accumulated signal, bound its memory
//! footprint, and optionally render it to an image for visual inspection.
//!
//! ## Crate Structure
//!
//! - **`config`**: Construction parameters for a probe (`ProbeConfig`) with
//!   validation and serde support.
//! - **`error`**: The `ProbeError` enum for centralized error handling.
//! - **`probe`**: The `Probe` itself: activation state machine, bounded
//!   signal buffer, channel-based ingestion, and the background consumer.
//! - **`render`**: The `SignalRenderer` collaborator seam plus a
//!   `plotters`-backed PNG renderer (behind the `render` feature).
//!
//! ## Example
//!
//! ```
//! use signal_probe::Probe;
//!
//! let probe = Probe::new();
//! probe.activate().unwrap();
//!
//! // Producers send over the bounded ingestion channel; deactivation
//! // drains every value already sent before returning the signal.
//! probe.send(1.0).unwrap();
//! let signal = probe.deactivate();
//! assert_eq!(signal, vec![1.0]);
//!
//! // Direct appends work without a channel and never drop data.
//! probe.push(2.0, false);
//! assert_eq!(probe.recent_value(), 2.0);
//! ```

pub mod config;
pub mod error;
pub mod probe;
pub mod render;

pub use config::ProbeConfig;
pub use error::ProbeError;
pub use probe::Probe;
pub use render::{PlotSpec, RenderError, SignalRenderer};

#[cfg(feature = "render")]
pub use render::PlottersRenderer;
