//! Modbus banner grabbing over plain byte streams.
//!
//! mbgrab frames Modbus requests, decodes responses from blocking streams,
//! and captures them as serializable scan event records.
//!
//! # Crate Structure
//!
//! - [`frame`] — Request encoding, exact reads, response decoding
//! - [`event`] — Captured exchange records (behind `event` feature)

/// Re-export frame types.
pub mod frame {
    pub use mbgrab_frame::*;
}

/// Re-export event types (requires `event` feature).
#[cfg(feature = "event")]
pub mod event {
    pub use mbgrab_event::*;
}
