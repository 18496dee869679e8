//! Service layer: the planning pipeline and its components.
//!
//! Each component consumes only the immutable output of its predecessor:
//! sampler series feed the event detector, safety mask builder, and target
//! visibility finder; the window deriver combines the detected events; the
//! pipeline orchestrates one full run.

pub mod events;
pub mod pipeline;
pub mod safety_mask;
pub mod sampler;
pub mod target_visibility;
pub mod window_deriver;

pub use pipeline::compute_night_report;
pub use safety_mask::{DoorSegment, SafetyFlag, SafetyMask};
pub use window_deriver::DerivedWindows;
