//! The station search seam.

use std::future::Future;

use crate::domain::{BoundingBox, FuelStation};

use super::error::FuelSearchError;

/// Something that can find fuel stations inside a bounding box.
///
/// Production uses the Overpass API; tests substitute a fixed directory.
pub trait StationSearch: Send + Sync {
    /// Return at most `limit` stations inside `bbox`.
    fn search(
        &self,
        bbox: BoundingBox,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<FuelStation>, FuelSearchError>> + Send;
}

impl<S: StationSearch> StationSearch for std::sync::Arc<S> {
    fn search(
        &self,
        bbox: BoundingBox,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<FuelStation>, FuelSearchError>> + Send {
        self.as_ref().search(bbox, limit)
    }
}
