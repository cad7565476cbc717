use tracing::{debug, info};

use crate::matcher::matches;
use crate::types::{DesiredConfig, RegionState, UpdatePlan};

/// Work out which regions need to be written back.
///
/// Every pool whose label matches and whose serve mode differs from the desired
/// one gets the desired serve mode in a copy of its region; regions without
/// such a pool are left out, so a converged service plans nothing. `regions`
/// is not modified.
pub fn plan(regions: &[RegionState], desired: &DesiredConfig) -> UpdatePlan {
    let mut plan = UpdatePlan::new();

    for region in regions {
        let mut updated = region.clone();
        let mut touched = false;

        for pool in updated.pool.iter_mut() {
            if !matches(&pool.label, &desired.label_pattern) {
                debug!(
                    region = %region.region_code,
                    pool = %pool.address,
                    serve_mode = %pool.serve_mode,
                    "Pool does not need update"
                );
                continue;
            }
            if pool.serve_mode == desired.serve_mode {
                debug!(
                    region = %region.region_code,
                    pool = %pool.address,
                    serve_mode = %pool.serve_mode,
                    "Pool already has desired serve mode"
                );
                continue;
            }
            info!(
                region = %region.region_code,
                pool = %pool.address,
                old_serve_mode = %pool.serve_mode,
                new_serve_mode = %desired.serve_mode,
                "Setting pool for update"
            );
            pool.serve_mode = desired.serve_mode;
            touched = true;
        }

        if touched {
            plan.insert(region.region_code.clone(), updated);
        }
    }

    plan
}
