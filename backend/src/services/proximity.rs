//! Proximity selection of candidate objects around a target.
//!
//! Two policies are supported:
//!
//! - **Catalog distance**: the candidate query itself restricts `sy_dist`;
//!   every returned row counts as nearby.
//! - **Angular separation**: the candidate query is unrestricted and each
//!   candidate is kept when its haversine distance to the target on a sphere
//!   of fixed radius is within a threshold.
//!
//! The angular policy treats right ascension / declination as longitude /
//! latitude on a sphere of arbitrary radius. The result is a grouping metric
//! for the sky view, in the sphere's units, not a physical distance: two
//! objects close on the sky may be hundreds of parsecs apart along the line
//! of sight.
//!
//! Both policies cap the output at `max_results`, keeping catalog order.

use qtty::{Degrees, Parsecs, Radians};
use serde::{Deserialize, Serialize};

use crate::catalog::CandidateFilter;
use crate::models::CelestialRecord;

/// Catalog-side distance cut, in parsecs.
pub const DEFAULT_MAX_DISTANCE_PC: f64 = 10.0;
/// Radius of the sky sphere used by the renderer.
pub const DEFAULT_SPHERE_RADIUS: f64 = 1000.0;
/// Angular-policy threshold, in sphere units.
pub const DEFAULT_ANGULAR_THRESHOLD: f64 = 50.0;
/// Most objects the renderer will draw.
pub const DEFAULT_MAX_RESULTS: usize = 10_000;

/// How "nearby" is decided.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProximityPolicy {
    CatalogDistance { max_distance: Parsecs },
    AngularSeparation { sphere_radius: f64, threshold: f64 },
}

impl ProximityPolicy {
    /// Restriction pushed into the candidate query.
    pub fn candidate_filter(&self) -> CandidateFilter {
        match self {
            ProximityPolicy::CatalogDistance { max_distance } => {
                CandidateFilter::WithinDistance(*max_distance)
            }
            ProximityPolicy::AngularSeparation { .. } => CandidateFilter::Unbounded,
        }
    }

    pub fn kind(&self) -> PolicyKind {
        match self {
            ProximityPolicy::CatalogDistance { .. } => PolicyKind::CatalogDistance,
            ProximityPolicy::AngularSeparation { .. } => PolicyKind::AngularSeparation,
        }
    }
}

impl Default for ProximityPolicy {
    fn default() -> Self {
        ProximityPolicy::CatalogDistance {
            max_distance: Parsecs::new(DEFAULT_MAX_DISTANCE_PC),
        }
    }
}

/// Policy selector as written in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    #[default]
    CatalogDistance,
    AngularSeparation,
}

impl std::str::FromStr for PolicyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "catalog_distance" | "catalog" | "distance" => Ok(Self::CatalogDistance),
            "angular_separation" | "angular" | "haversine" => Ok(Self::AngularSeparation),
            _ => Err(format!("Unknown proximity policy: {}", s)),
        }
    }
}

/// Great-circle central angle between two sky positions (haversine).
///
/// `a = sin²(Δdec/2) + cos(dec1)·cos(dec2)·sin²(Δra/2)`, angle `= 2·asin(√a)`.
/// Differences are taken as absolute values so the result is exactly
/// symmetric in its arguments.
pub fn central_angle(ra1: Degrees, dec1: Degrees, ra2: Degrees, dec2: Degrees) -> Radians {
    let half_d_dec = Degrees::new((dec2.value() - dec1.value()).abs() * 0.5);
    let half_d_ra = Degrees::new((ra2.value() - ra1.value()).abs() * 0.5);

    let a = half_d_dec.sin().powi(2) + dec1.cos() * dec2.cos() * half_d_ra.sin().powi(2);
    // Rounding can push `a` a hair outside [0, 1].
    Radians::new(2.0 * a.clamp(0.0, 1.0).sqrt().asin())
}

/// Haversine distance between two records on a sphere of `sphere_radius`.
///
/// Records with non-finite coordinates are infinitely far from everything.
pub fn sky_distance(a: &CelestialRecord, b: &CelestialRecord, sphere_radius: f64) -> f64 {
    if !a.has_valid_coordinates() || !b.has_valid_coordinates() {
        return f64::INFINITY;
    }
    let angle = central_angle(
        a.right_ascension_deg,
        a.declination_deg,
        b.right_ascension_deg,
        b.declination_deg,
    );
    sphere_radius * angle.value()
}

/// Selects the nearby subset of a candidate population.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityFilter {
    policy: ProximityPolicy,
    max_results: usize,
}

impl ProximityFilter {
    pub fn new(policy: ProximityPolicy, max_results: usize) -> Self {
        Self {
            policy,
            max_results,
        }
    }

    pub fn policy(&self) -> &ProximityPolicy {
        &self.policy
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    /// Keep the candidates that count as nearby, in input order, capped.
    pub fn apply(
        &self,
        target: &CelestialRecord,
        candidates: Vec<CelestialRecord>,
    ) -> Vec<CelestialRecord> {
        match self.policy {
            ProximityPolicy::CatalogDistance { .. } => {
                candidates.into_iter().take(self.max_results).collect()
            }
            ProximityPolicy::AngularSeparation {
                sphere_radius,
                threshold,
            } => candidates
                .into_iter()
                .filter(|c| sky_distance(target, c, sphere_radius) <= threshold)
                .take(self.max_results)
                .collect(),
        }
    }
}

impl Default for ProximityFilter {
    fn default() -> Self {
        Self::new(ProximityPolicy::default(), DEFAULT_MAX_RESULTS)
    }
}
