//! Configuration for one analysis pass

use crate::error::{AnalysisError, Result};

/// Parameter set for one analysis pass over a category of incidents.
///
/// Immutable once handed to the engine; every computation receives its own
/// copy so concurrent calls with different settings never share state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    /// Maximum great-circle distance (miles) for a graph edge.
    pub spatial_radius_miles: f64,

    /// Maximum whole-day gap for a graph edge.
    pub temporal_days: i64,

    /// DBSCAN neighborhood radius (miles).
    pub dbscan_eps_miles: f64,

    /// DBSCAN minimum neighborhood size, counting the point itself.
    pub dbscan_min_samples: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            spatial_radius_miles: 0.5,
            temporal_days: 3,
            dbscan_eps_miles: 0.5,
            dbscan_min_samples: 5,
        }
    }
}

impl Config {
    /// Create a configuration with custom values.
    pub fn new(
        spatial_radius_miles: f64,
        temporal_days: i64,
        dbscan_eps_miles: f64,
        dbscan_min_samples: usize,
    ) -> Self {
        Self {
            spatial_radius_miles,
            temporal_days,
            dbscan_eps_miles,
            dbscan_min_samples,
        }
    }

    /// Reject out-of-range parameters before any computation starts.
    pub fn validate(&self) -> Result<()> {
        if !(self.spatial_radius_miles > 0.0) || !self.spatial_radius_miles.is_finite() {
            return Err(AnalysisError::InvalidConfig {
                name: "spatial_radius_miles",
                message: "must be a positive finite number",
                value: self.spatial_radius_miles.to_string(),
            });
        }
        if self.temporal_days < 0 {
            return Err(AnalysisError::InvalidConfig {
                name: "temporal_days",
                message: "must be zero or greater",
                value: self.temporal_days.to_string(),
            });
        }
        if !(self.dbscan_eps_miles > 0.0) || !self.dbscan_eps_miles.is_finite() {
            return Err(AnalysisError::InvalidConfig {
                name: "dbscan_eps_miles",
                message: "must be a positive finite number",
                value: self.dbscan_eps_miles.to_string(),
            });
        }
        if self.dbscan_min_samples < 1 {
            return Err(AnalysisError::InvalidConfig {
                name: "dbscan_min_samples",
                message: "must be at least 1",
                value: self.dbscan_min_samples.to_string(),
            });
        }
        Ok(())
    }
}
