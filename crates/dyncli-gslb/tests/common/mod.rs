#![allow(dead_code)]

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use dyncli_gslb::{
    ApiPath, ApiTransport, Envelope, Method, PoolEntry, RegionState, ServeMode, TransportError,
};
use serde_json::{Value, json};

/// In-memory GSLB service that applies region writes and records concurrency.
pub struct FakeGslbApi {
    regions: Mutex<BTreeMap<String, RegionState>>,
    ttl: u64,
    put_delay: Duration,
    failing_regions: HashSet<String>,
    hanging_regions: HashSet<String>,
    read_error: Option<TransportError>,
    ttl_error: Option<TransportError>,
    in_flight: AtomicUsize,
    high_water_mark: AtomicUsize,
    puts: Mutex<Vec<String>>,
}

impl FakeGslbApi {
    pub fn new(regions: Vec<RegionState>) -> Self {
        Self {
            regions: Mutex::new(
                regions
                    .into_iter()
                    .map(|r| (r.region_code.clone(), r))
                    .collect(),
            ),
            ttl: 30,
            put_delay: Duration::from_millis(20),
            failing_regions: HashSet::new(),
            hanging_regions: HashSet::new(),
            read_error: None,
            ttl_error: None,
            in_flight: AtomicUsize::new(0),
            high_water_mark: AtomicUsize::new(0),
            puts: Mutex::new(Vec::new()),
        }
    }

    pub fn with_put_delay(mut self, delay: Duration) -> Self {
        self.put_delay = delay;
        self
    }

    pub fn failing(mut self, region: &str) -> Self {
        self.failing_regions.insert(region.to_string());
        self
    }

    pub fn hanging(mut self, region: &str) -> Self {
        self.hanging_regions.insert(region.to_string());
        self
    }

    pub fn with_read_error(mut self, error: TransportError) -> Self {
        self.read_error = Some(error);
        self
    }

    pub fn with_ttl_error(mut self, error: TransportError) -> Self {
        self.ttl_error = Some(error);
        self
    }

    pub fn high_water_mark(&self) -> usize {
        self.high_water_mark.load(Ordering::SeqCst)
    }

    pub fn puts(&self) -> Vec<String> {
        self.puts.lock().unwrap().clone()
    }

    pub fn region(&self, code: &str) -> Option<RegionState> {
        self.regions.lock().unwrap().get(code).cloned()
    }

    async fn put_region(&self, region: &str, body: Option<Value>) -> Result<Envelope, TransportError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.high_water_mark.fetch_max(now, Ordering::SeqCst);
        self.puts.lock().unwrap().push(region.to_string());

        let delay = if self.hanging_regions.contains(region) {
            Duration::from_secs(3600)
        } else {
            self.put_delay
        };
        tokio::time::sleep(delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing_regions.contains(region) {
            return Ok(Envelope::failure("Operation blocked by current task"));
        }
        let payload: RegionState = serde_json::from_value(body.unwrap_or(Value::Null))
            .map_err(|e| TransportError::Decode(e.to_string()))?;
        let data = serde_json::to_value(&payload).unwrap();
        self.regions
            .lock()
            .unwrap()
            .insert(region.to_string(), payload);
        Ok(Envelope::success(data))
    }
}

#[async_trait]
impl ApiTransport for FakeGslbApi {
    async fn send(
        &self,
        method: Method,
        path: &ApiPath,
        body: Option<Value>,
    ) -> Result<Envelope, TransportError> {
        let segments: Vec<&str> = path.segments().iter().map(String::as_str).collect();
        match (method, segments.as_slice()) {
            (Method::Get, ["GSLBRegion", _, _]) => {
                if let Some(error) = &self.read_error {
                    return Err(error.clone());
                }
                let regions: Vec<RegionState> =
                    self.regions.lock().unwrap().values().cloned().collect();
                Ok(Envelope::success(serde_json::to_value(regions).unwrap()))
            }
            (Method::Put, ["GSLBRegion", _, _, region]) => self.put_region(region, body).await,
            (Method::Get, ["GSLB", _, _]) => {
                if let Some(error) = &self.ttl_error {
                    return Err(error.clone());
                }
                Ok(Envelope::success(json!({ "ttl": self.ttl })))
            }
            _ => Err(TransportError::Http(format!("unexpected {method} {path}"))),
        }
    }
}

pub fn pool(address: &str, label: &str, serve_mode: ServeMode) -> PoolEntry {
    PoolEntry {
        address: address.to_string(),
        label: label.to_string(),
        weight: 1,
        serve_mode,
    }
}

pub fn region(code: &str, pool: Vec<PoolEntry>) -> RegionState {
    RegionState {
        region_code: code.to_string(),
        serve_count: 1,
        failover_mode: "global".to_string(),
        failover_data: String::new(),
        pool,
    }
}

/// Three regions, each with an `eu-*` and a `us-*` pool, all obeying
pub fn three_regions() -> Vec<RegionState> {
    ["Asia", "EU West", "US East"]
        .iter()
        .enumerate()
        .map(|(i, code)| {
            region(
                code,
                vec![
                    pool(&format!("10.0.{i}.1"), &format!("eu-{i}"), ServeMode::Obey),
                    pool(&format!("10.0.{i}.2"), &format!("us-{i}"), ServeMode::Obey),
                ],
            )
        })
        .collect()
}
