//! Reconciliation of Dyn GSLB region pools against a desired serve mode.
//!
//! A run reads every region of a GSLB service, plans the regions whose pools
//! match a label pattern, writes them back with bounded concurrency and
//! collects the results within a deadline.

pub mod aggregator;
pub mod dispatcher;
pub mod error;
pub mod matcher;
pub mod planner;
pub mod reader;
pub mod reconcile;
pub mod transport;
pub mod types;

pub use aggregator::{CollectState, DEFAULT_DEADLINE, Outcome, ResultAggregator};
pub use dispatcher::{BoundedDispatcher, DEFAULT_CONCURRENCY_LIMIT, Dispatch, DispatchResult};
pub use error::{GslbError, RegionFailure, TransportError};
pub use matcher::{LabelPattern, matches};
pub use planner::plan;
pub use reader::{fetch_regions, read_ttl};
pub use reconcile::{GslbService, ReconcileReport, ReconcileSettings};
pub use transport::{ApiMessage, ApiPath, ApiTransport, Envelope, Method};
pub use types::*;
