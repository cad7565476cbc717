use std::sync::Arc;

use anyhow::{Context, Result};
use dyncli_gslb::{DesiredConfig, GslbError, GslbResource, GslbService, LabelPattern};
use tracing::{error, info};

use crate::client::DynectClient;
use crate::config::Settings;
use crate::output::{print_region_failures, print_report, print_success};
use crate::terminal::wait_with_spinner;

/// Desired state for `gslb update-pools`; fails before any network activity
/// if the label pattern does not compile.
pub fn desired_config(settings: &Settings) -> Result<DesiredConfig> {
    let label_pattern = LabelPattern::anchored(&settings.label_pattern).inspect_err(|e| {
        error!(error = %e, "The provided label pattern was invalid");
    })?;
    let serve_mode = settings.serve_mode().map_err(anyhow::Error::msg)?;
    Ok(DesiredConfig {
        resource: GslbResource::new(&settings.zone, &settings.fqdn),
        label_pattern,
        serve_mode,
    })
}

pub async fn update_pools(
    client: Arc<DynectClient>,
    settings: &Settings,
    desired: &DesiredConfig,
) -> Result<()> {
    let service = GslbService::new(client, settings.reconcile_settings());

    let report = match service.update_regions(desired).await {
        Ok(report) => report,
        Err(e) => {
            if let GslbError::RegionUpdateFailed { failures } = &e {
                print_region_failures(failures);
            }
            error!(error = %e, fqdn = %desired.resource.fqdn, "Failed to update GSLB region");
            return Err(e).context("Failed to update GSLB region");
        }
    };
    info!(
        fqdn = %desired.resource.fqdn,
        updated = report.updated.len(),
        "Successfully updated GSLB region records"
    );
    print_report(desired, &report);

    let ttl = service
        .gslb_ttl(&desired.resource)
        .await
        .context("Could not get GSLB TTL for service")?;

    if settings.wait {
        info!(ttl = ?ttl, "Waiting for DNS changes to propagate");
        wait_with_spinner(ttl, "Waiting for DNS changes to propagate").await;
    }
    print_success("Success!");
    Ok(())
}
