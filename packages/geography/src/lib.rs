#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Salvador neighborhood geography.
//!
//! * [`neighborhoods`]: the static neighborhood and landmark tables.
//! * [`coordinates`]: city bounds and land/water validation.
//! * [`stats`]: per-neighborhood homicide counts and rates.
//! * [`lights`]: scatter one point of light per victim around each
//!   neighborhood centre.
//!
//! Everything here is pure; randomness is injected through [`rand::Rng`].

pub mod coordinates;
pub mod lights;
pub mod neighborhoods;
pub mod stats;

pub use coordinates::{is_valid_salvador_coordinate, validate_coordinates};
pub use lights::scatter_victim_lights;
pub use neighborhoods::{LANDMARKS, NEIGHBORHOODS, reference_coordinates};
pub use stats::neighborhood_stats;

/// City-wide homicide total used when no other source is available.
pub const FALLBACK_TOTAL_HOMICIDES: u64 = 161;
