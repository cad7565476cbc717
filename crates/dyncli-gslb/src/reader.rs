//! Read-only queries: current region state and the service TTL.

use std::time::Duration;

use tracing::{debug, error, instrument};

use crate::error::GslbError;
use crate::transport::{ApiPath, ApiTransport, Method, call};
use crate::types::{GslbResource, GslbService, RegionState};

/// Read every region of the service, with full pool detail.
#[instrument(skip_all, fields(zone = %resource.zone, fqdn = %resource.fqdn))]
pub async fn fetch_regions(
    transport: &dyn ApiTransport,
    resource: &GslbResource,
) -> Result<Vec<RegionState>, GslbError> {
    let path = ApiPath::gslb_regions(&resource.zone, &resource.fqdn);
    match call::<Vec<RegionState>>(transport, Method::Get, &path, None).await {
        Ok(regions) => {
            debug!(path = %path, regions = regions.len(), "GSLB GET response");
            Ok(regions)
        }
        Err(source) => {
            error!(path = %path, error = %source, "Failed to get GSLB regions");
            Err(GslbError::RemoteQueryFailed {
                path: path.to_string(),
                source,
            })
        }
    }
}

/// Read the propagation TTL of the service.
#[instrument(skip_all, fields(zone = %resource.zone, fqdn = %resource.fqdn))]
pub async fn read_ttl(
    transport: &dyn ApiTransport,
    resource: &GslbResource,
) -> Result<Duration, GslbError> {
    let path = ApiPath::gslb_service(&resource.zone, &resource.fqdn);
    let service: GslbService = call(transport, Method::Get, &path, None)
        .await
        .map_err(|source| {
            error!(path = %path, error = %source, "Failed to get GSLB service");
            GslbError::TtlUnavailable {
                path: path.to_string(),
                source,
            }
        })?;
    debug!(path = %path, ttl = service.ttl, "GSLB service GET response");
    Ok(Duration::from_secs(service.ttl))
}
