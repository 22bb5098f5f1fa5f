//! Route geometry: polyline decoding and waypoint sampling.

mod polyline;
mod sampler;

pub use polyline::{decode_polyline, encode_polyline};
pub use sampler::{DEFAULT_SAMPLE_SPACING_KM, sample_waypoints};
