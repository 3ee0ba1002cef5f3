//! Two-stage aggregation: resolve the target, then gather its neighbours.
//!
//! ```text
//! name ─► ObjectName ─► target query ─► Lookup<ResolvedTarget>
//!                                          │ NoData ─► TargetNotFound
//!                                          ▼ Found
//!                       candidate query ─► Lookup<Vec<CelestialRecord>>
//!                                          │ NoData ─► NoCandidates
//!                                          ▼ Found
//!                       ProximityFilter ─► AggregationResult
//! ```
//!
//! The candidate query is only built once a target record exists. Each
//! outbound call is bounded by the configured timeout; nothing is retried.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info};

use crate::catalog::{CatalogClient, ObjectName, QueryBuilder};
use crate::config::AppConfig;
use crate::error::{AggregateError, AggregateResult, Stage};
use crate::models::{AggregationResult, CelestialRecord};
use crate::parsing::{parse_catalog_response, CatalogResponse};
use crate::services::proximity::ProximityFilter;

/// Outcome of one successful catalog round-trip.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Found(T),
    NoData,
}

/// The target record together with the validated name that found it.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTarget {
    pub name: ObjectName,
    pub record: CelestialRecord,
}

/// Aggregates a target and its nearby objects from a catalog.
///
/// Holds no per-request state; one instance serves all requests concurrently.
pub struct AggregationService {
    catalog: Arc<dyn CatalogClient>,
    queries: QueryBuilder,
    filter: ProximityFilter,
    timeout: Duration,
}

impl AggregationService {
    pub fn new(
        catalog: Arc<dyn CatalogClient>,
        queries: QueryBuilder,
        filter: ProximityFilter,
        timeout: Duration,
    ) -> Self {
        Self {
            catalog,
            queries,
            filter,
            timeout,
        }
    }

    pub fn from_config(catalog: Arc<dyn CatalogClient>, config: &AppConfig) -> Self {
        Self::new(
            catalog,
            QueryBuilder::new(config.catalog.table.clone()),
            config.proximity_filter(),
            config.catalog_timeout(),
        )
    }

    pub fn filter(&self) -> &ProximityFilter {
        &self.filter
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run the full pipeline for a caller-supplied name.
    pub async fn aggregate(&self, raw_name: &str) -> AggregateResult<AggregationResult> {
        let name = ObjectName::parse(raw_name)?;

        let target = match self.resolve_target(name).await? {
            Lookup::Found(target) => target,
            Lookup::NoData => {
                return Err(AggregateError::TargetNotFound {
                    name: raw_name.trim().to_string(),
                })
            }
        };

        let candidates = match self.fetch_candidates(&target).await? {
            Lookup::Found(candidates) => candidates,
            Lookup::NoData => {
                return Err(AggregateError::NoCandidates {
                    name: target.name.to_string(),
                })
            }
        };

        let fetched = candidates.len();
        let nearby = self.filter.apply(&target.record, candidates);
        debug!(
            "'{}': {} candidates fetched, {} nearby after filtering",
            target.name,
            fetched,
            nearby.len()
        );

        Ok(AggregationResult::new(target.record, nearby))
    }

    /// Stage one: look up the target by exact name.
    ///
    /// With several matching rows the first, in catalog order, wins.
    pub async fn resolve_target(&self, name: ObjectName) -> AggregateResult<Lookup<ResolvedTarget>> {
        let query = self.queries.target_query(&name);
        let response = self.run_query(Stage::Target, query).await?;

        Ok(match response.into_records().into_iter().next() {
            Some(record) => Lookup::Found(ResolvedTarget { name, record }),
            None => Lookup::NoData,
        })
    }

    /// Stage two: fetch the candidate population for a resolved target.
    pub async fn fetch_candidates(
        &self,
        target: &ResolvedTarget,
    ) -> AggregateResult<Lookup<Vec<CelestialRecord>>> {
        let query = self
            .queries
            .candidate_query(&target.name, self.filter.policy().candidate_filter());
        let response = self.run_query(Stage::Candidates, query).await?;

        Ok(match response {
            CatalogResponse::NoData => Lookup::NoData,
            CatalogResponse::Records(records) => Lookup::Found(records),
        })
    }

    async fn run_query(&self, stage: Stage, query: String) -> AggregateResult<CatalogResponse> {
        info!("Catalog {} query: {}", stage, query);

        let body = match tokio::time::timeout(self.timeout, self.catalog.query(&query)).await {
            Ok(Ok(body)) => body,
            Ok(Err(e)) if e.is_timeout() => {
                error!("Catalog {} timed out: {}", stage, query);
                return Err(AggregateError::Timeout {
                    stage,
                    query,
                    after: self.timeout,
                });
            }
            Ok(Err(e)) => {
                error!("Catalog {} failed: {} (query: {})", stage, e, query);
                return Err(AggregateError::Upstream {
                    stage,
                    query,
                    source: e,
                });
            }
            Err(_) => {
                error!(
                    "Catalog {} exceeded {:?}: {}",
                    stage, self.timeout, query
                );
                return Err(AggregateError::Timeout {
                    stage,
                    query,
                    after: self.timeout,
                });
            }
        };

        match parse_catalog_response(&body) {
            Ok(response) => {
                debug!("Catalog {} returned {} rows", stage, response.records().len());
                Ok(response)
            }
            Err(e) => {
                error!("Malformed catalog {} response: {} (query: {})", stage, e, query);
                Err(AggregateError::MalformedResponse {
                    stage,
                    query,
                    source: e,
                })
            }
        }
    }
}

#[cfg(all(test, feature = "local-catalog"))]
mod tests {
    use super::*;
    use crate::catalog::{CatalogError, LocalCatalog, NameError};
    use crate::parsing::ParseError;
    use crate::services::proximity::ProximityPolicy;

    const HEADER: &str = "pl_name,pl_rade,sy_dist,st_teff,ra,dec";

    fn service(catalog: Arc<LocalCatalog>, filter: ProximityFilter) -> AggregationService {
        AggregationService::new(
            catalog,
            QueryBuilder::default(),
            filter,
            Duration::from_secs(5),
        )
    }

    fn target_body() -> String {
        format!("{}\nKepler-22 b,2.1,190.5,5518,289.2,47.9\n", HEADER)
    }

    #[tokio::test]
    async fn test_full_pipeline() {
        let catalog = Arc::new(
            LocalCatalog::new()
                .with_response(target_body())
                .with_response(format!(
                    "{}\nProxima Cen b,1.07,1.3,3050,217.4,-62.7\nBarnard b,,1.8,3195,269.4,4.7\n",
                    HEADER
                )),
        );
        let result = service(catalog.clone(), ProximityFilter::default())
            .aggregate("Kepler-22 b")
            .await
            .unwrap();

        assert_eq!(result.target.name, "Kepler-22 b");
        let names: Vec<_> = result.nearby.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Proxima Cen b", "Barnard b"]);

        let queries = catalog.queries();
        assert_eq!(queries.len(), 2);
        assert!(queries[0].ends_with("WHERE pl_name = 'Kepler-22 b'"));
        assert!(queries[1].contains("sy_dist <= 10"));
        assert!(queries[1].contains("pl_name <> 'Kepler-22 b'"));
    }

    #[tokio::test]
    async fn test_first_target_row_wins() {
        let catalog = Arc::new(
            LocalCatalog::new()
                .with_response(format!(
                    "{}\nKepler-22 b,2.1,190.5,5518,289.2,47.9\nKepler-22 b,2.4,190.5,5518,289.2,47.9\n",
                    HEADER
                ))
                .with_response(format!("{}\nOther b,1,1,1,1,1\n", HEADER)),
        );
        let result = service(catalog, ProximityFilter::default())
            .aggregate("Kepler-22 b")
            .await
            .unwrap();
        assert_eq!(result.target.radius_earths, Some(2.1));
    }

    #[tokio::test]
    async fn test_invalid_name_makes_no_calls() {
        let catalog = Arc::new(LocalCatalog::new());
        let err = service(catalog.clone(), ProximityFilter::default())
            .aggregate("   ")
            .await
            .unwrap_err();

        assert!(matches!(err, AggregateError::InvalidArgument(NameError::Empty)));
        assert_eq!(catalog.call_count(), 0);
    }

    #[tokio::test]
    async fn test_target_not_found_skips_candidates() {
        let catalog = Arc::new(LocalCatalog::new().with_response(HEADER));
        let err = service(catalog.clone(), ProximityFilter::default())
            .aggregate("Nowhere b")
            .await
            .unwrap_err();

        assert!(matches!(err, AggregateError::TargetNotFound { ref name } if name == "Nowhere b"));
        assert_eq!(catalog.call_count(), 1);
    }

    #[tokio::test]
    async fn test_no_candidates() {
        let catalog = Arc::new(
            LocalCatalog::new()
                .with_response(target_body())
                .with_response(format!("{}\n", HEADER)),
        );
        let err = service(catalog.clone(), ProximityFilter::default())
            .aggregate("Kepler-22 b")
            .await
            .unwrap_err();

        assert!(matches!(err, AggregateError::NoCandidates { .. }));
        assert_eq!(catalog.call_count(), 2);
    }

    #[tokio::test]
    async fn test_candidate_transport_failure() {
        let catalog = Arc::new(
            LocalCatalog::new()
                .with_response(target_body())
                .with_error(CatalogError::transport("connection reset by peer")),
        );
        let err = service(catalog, ProximityFilter::default())
            .aggregate("Kepler-22 b")
            .await
            .unwrap_err();

        match err {
            AggregateError::Upstream { stage, query, .. } => {
                assert_eq!(stage, Stage::Candidates);
                assert!(query.contains("pl_name <> 'Kepler-22 b'"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_target_response() {
        let catalog = Arc::new(LocalCatalog::new().with_response("pl_name,ra\nX b,1.0\n"));
        let err = service(catalog.clone(), ProximityFilter::default())
            .aggregate("X b")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AggregateError::MalformedResponse {
                stage: Stage::Target,
                source: ParseError::MissingColumn { .. },
                ..
            }
        ));
        assert_eq!(catalog.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_catalog_times_out() {
        let catalog = Arc::new(
            LocalCatalog::new()
                .with_response(target_body())
                .with_delay(Duration::from_secs(30)),
        );
        let svc = AggregationService::new(
            catalog.clone(),
            QueryBuilder::default(),
            ProximityFilter::default(),
            Duration::from_secs(2),
        );
        let err = svc.aggregate("Kepler-22 b").await.unwrap_err();

        assert!(matches!(
            err,
            AggregateError::Timeout {
                stage: Stage::Target,
                ..
            }
        ));
        assert_eq!(catalog.call_count(), 1);
    }

    #[tokio::test]
    async fn test_transport_timeout_maps_to_timeout() {
        let catalog = Arc::new(LocalCatalog::new().with_error(CatalogError::Timeout));
        let err = service(catalog, ProximityFilter::default())
            .aggregate("Kepler-22 b")
            .await
            .unwrap_err();
        assert!(matches!(err, AggregateError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_angular_policy_filters_client_side() {
        let catalog = Arc::new(
            LocalCatalog::new()
                .with_response(target_body())
                .with_response(format!(
                    "{}\nClose b,1,500,5000,289.5,47.5\nFar b,1,2,5000,100.0,-30.0\nNoCoords b,1,3,5000,,\n",
                    HEADER
                )),
        );
        let filter = ProximityFilter::new(
            ProximityPolicy::AngularSeparation {
                sphere_radius: 1000.0,
                threshold: 50.0,
            },
            10,
        );
        let result = service(catalog.clone(), filter)
            .aggregate("Kepler-22 b")
            .await
            .unwrap();

        let names: Vec<_> = result.nearby.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Close b"]);
        assert_eq!(
            catalog.queries()[1],
            "SELECT pl_name, pl_rade, sy_dist, st_teff, ra, dec FROM ps WHERE pl_name <> 'Kepler-22 b'"
        );
    }

    #[tokio::test]
    async fn test_all_candidates_filtered_is_empty_success() {
        let catalog = Arc::new(
            LocalCatalog::new()
                .with_response(target_body())
                .with_response(format!("{}\nFar b,1,2,5000,100.0,-30.0\n", HEADER)),
        );
        let filter = ProximityFilter::new(
            ProximityPolicy::AngularSeparation {
                sphere_radius: 1000.0,
                threshold: 1.0,
            },
            10,
        );
        let result = service(catalog, filter).aggregate("Kepler-22 b").await.unwrap();
        assert!(result.nearby.is_empty());
    }

    #[tokio::test]
    async fn test_cap_is_enforced() {
        let mut body = HEADER.to_string();
        for i in 0..25 {
            body.push_str(&format!("\nN{} b,1,5,4000,10,10", i));
        }
        let catalog = Arc::new(
            LocalCatalog::new()
                .with_response(target_body())
                .with_response(body),
        );
        let filter = ProximityFilter::new(ProximityPolicy::default(), 7);
        let result = service(catalog, filter).aggregate("Kepler-22 b").await.unwrap();

        assert_eq!(result.nearby.len(), 7);
        assert_eq!(result.nearby[0].name, "N0 b");
        assert_eq!(result.nearby[6].name, "N6 b");
    }
}
