//! FLASH: exact search exploiting monotonicity
//!
//! The lattice is processed level by level. Depending on the
//! [`FlashConfiguration`], each unprocessed node starts a binary search along
//! ascending paths, a depth-first sweep, or both.

mod algorithm;
pub mod config;

pub use algorithm::Flash;
pub use config::{
    FlashConfiguration, FlashPhaseConfiguration, Phase, PhaseAnonymityProperty, TagAction,
    Trigger,
};
