//! Shared helpers for integration tests.
#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use exoview::catalog::{LocalCatalog, QueryBuilder};
use exoview::services::{AggregationService, ProximityFilter};

/// Header of the fixed projection, as the archive returns it.
pub const HEADER: &str = "pl_name,pl_rade,sy_dist,st_teff,ra,dec";

/// A CSV body with the standard header followed by `rows`.
pub fn csv_body(rows: &[&str]) -> String {
    let mut body = String::from(HEADER);
    for row in rows {
        body.push('\n');
        body.push_str(row);
    }
    body.push('\n');
    body
}

/// Header-only body: the catalog found nothing.
pub fn empty_body() -> String {
    csv_body(&[])
}

pub fn kepler_22b_body() -> String {
    csv_body(&["Kepler-22 b,2.1,190.5,5518,289.2,47.9"])
}

/// Aggregation service over `catalog` with the default catalog-distance policy.
pub fn service_with(catalog: Arc<LocalCatalog>, filter: ProximityFilter) -> AggregationService {
    AggregationService::new(
        catalog,
        QueryBuilder::default(),
        filter,
        Duration::from_secs(5),
    )
}

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// Access to the process environment is serialized and the previous values
/// are restored on drop, including during unwinding.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::apply(changes);
    f()
}

struct ScopedEnv {
    saved: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn apply(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let saved = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect();

        for (key, value) in changes {
            set_or_remove(key, *value);
        }

        Self { saved }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (key, value) in self.saved.drain(..) {
            set_or_remove(&key, value.as_deref());
        }
    }
}

fn set_or_remove(key: &str, value: Option<&str>) {
    match value {
        Some(v) => std::env::set_var(key, v),
        None => std::env::remove_var(key),
    }
}
