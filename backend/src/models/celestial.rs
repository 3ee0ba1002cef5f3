//! Catalog records and the aggregation result served to the renderer.

use qtty::{Degrees, Parsecs};
use serde::Serialize;

/// A single row of the exoplanet catalog.
///
/// Coordinates and distance are always present but may be `NaN` when the
/// catalog cell was empty or unparseable; `NaN` serialises as JSON `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CelestialRecord {
    /// Catalog name, unique key for lookups (`pl_name`)
    pub name: String,
    /// Planet radius in Earth radii (`pl_rade`)
    pub radius_earths: Option<f64>,
    /// Distance to the host system (`sy_dist`)
    pub distance_parsecs: Parsecs,
    /// Host star effective temperature (`st_teff`)
    pub star_temp_kelvin: Option<f64>,
    /// Right ascension, 0..360 (`ra`)
    pub right_ascension_deg: Degrees,
    /// Declination, -90..90 (`dec`)
    pub declination_deg: Degrees,
}

impl CelestialRecord {
    /// Build a record with only the fields needed for proximity work.
    pub fn new(name: impl Into<String>, distance_pc: f64, ra_deg: f64, dec_deg: f64) -> Self {
        Self {
            name: name.into(),
            radius_earths: None,
            distance_parsecs: Parsecs::new(distance_pc),
            star_temp_kelvin: None,
            right_ascension_deg: Degrees::new(ra_deg),
            declination_deg: Degrees::new(dec_deg),
        }
    }

    pub fn with_radius(mut self, radius_earths: f64) -> Self {
        self.radius_earths = Some(radius_earths);
        self
    }

    pub fn with_star_temp(mut self, kelvin: f64) -> Self {
        self.star_temp_kelvin = Some(kelvin);
        self
    }

    /// True when both sky coordinates are finite numbers.
    pub fn has_valid_coordinates(&self) -> bool {
        self.right_ascension_deg.value().is_finite() && self.declination_deg.value().is_finite()
    }
}

/// Output of one aggregation request: the resolved target and its neighbours.
///
/// `nearby` keeps catalog response order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregationResult {
    pub target: CelestialRecord,
    pub nearby: Vec<CelestialRecord>,
}

impl AggregationResult {
    pub fn new(target: CelestialRecord, nearby: Vec<CelestialRecord>) -> Self {
        Self { target, nearby }
    }

    pub fn nearby_count(&self) -> usize {
        self.nearby.len()
    }
}
