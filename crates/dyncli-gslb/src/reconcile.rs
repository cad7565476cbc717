//! End-to-end reconciliation run: read, plan, dispatch, collect.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, instrument};

use crate::aggregator::{DEFAULT_DEADLINE, ResultAggregator};
use crate::dispatcher::{BoundedDispatcher, DEFAULT_CONCURRENCY_LIMIT};
use crate::error::GslbError;
use crate::planner;
use crate::reader;
use crate::transport::ApiTransport;
use crate::types::{DesiredConfig, GslbResource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileSettings {
    /// Region updates allowed in flight at once
    pub concurrency_limit: usize,
    /// Time allowed for all region updates to report back
    pub deadline: Duration,
}

impl Default for ReconcileSettings {
    fn default() -> Self {
        Self {
            concurrency_limit: DEFAULT_CONCURRENCY_LIMIT,
            deadline: DEFAULT_DEADLINE,
        }
    }
}

/// Summary of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Regions read from the API
    pub regions_read: usize,
    /// Regions written back, sorted by region code
    pub updated: Vec<String>,
}

impl ReconcileReport {
    pub fn is_noop(&self) -> bool {
        self.updated.is_empty()
    }
}

/// GSLB operations over an authenticated transport
pub struct GslbService {
    transport: Arc<dyn ApiTransport>,
    settings: ReconcileSettings,
}

impl GslbService {
    pub fn new(transport: Arc<dyn ApiTransport>, settings: ReconcileSettings) -> Self {
        Self {
            transport,
            settings,
        }
    }

    pub fn settings(&self) -> &ReconcileSettings {
        &self.settings
    }

    /// Bring every matching pool of the service to the desired serve mode.
    ///
    /// Region failures do not stop sibling updates. Regions that were updated
    /// stay updated when the run as a whole fails.
    #[instrument(skip_all, fields(fqdn = %desired.resource.fqdn, pattern = %desired.label_pattern, serve_mode = %desired.serve_mode))]
    pub async fn update_regions(&self, desired: &DesiredConfig) -> Result<ReconcileReport, GslbError> {
        let regions = reader::fetch_regions(self.transport.as_ref(), &desired.resource).await?;
        let plan = planner::plan(&regions, desired);
        info!(regions = regions.len(), planned = plan.len(), "Planned GSLB region updates");

        let dispatcher =
            BoundedDispatcher::new(Arc::clone(&self.transport), self.settings.concurrency_limit);
        let mut dispatch = dispatcher.dispatch(&desired.resource, plan);
        let outcome = ResultAggregator::new(dispatch.expected(), self.settings.deadline)
            .collect(dispatch.results())
            .await;
        drop(dispatch);

        let updated = outcome.into_result()?;
        Ok(ReconcileReport {
            regions_read: regions.len(),
            updated,
        })
    }

    /// Propagation TTL of the service
    pub async fn gslb_ttl(&self, resource: &GslbResource) -> Result<Duration, GslbError> {
        reader::read_ttl(self.transport.as_ref(), resource).await
    }
}
