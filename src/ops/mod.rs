//! Reusable column transformations.
//!
//! The derivation stages are thin orchestration over these primitives, which
//! operate on plain value slices so they stay independent of table layout.

pub mod broadcast;
pub mod cast;
pub mod coalesce;
pub mod ffill;
pub mod recode;
pub mod sign;

pub use broadcast::broadcast_constant;
pub use cast::{CastOutcome, try_cast};
pub use coalesce::coalesce;
pub use ffill::{forward_fill, forward_fill_complete_rows};
pub use recode::{flag_eq, flag_either_eq, flag_in, map_codes};
pub use sign::{SignResolution, decrease_mask, resolve_sign};
