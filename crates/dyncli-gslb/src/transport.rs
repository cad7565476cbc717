//! Boundary to the authenticated request issuer.

use std::fmt;

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::TransportError;

pub const STATUS_SUCCESS: &str = "success";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// API path relative to the REST root, kept as unescaped segments.
///
/// Transports escape each segment when building the request URL. Dyn paths
/// always end with a slash.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ApiPath {
    segments: Vec<String>,
    query: Vec<(String, String)>,
}

impl ApiPath {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
            query: Vec::new(),
        }
    }

    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    /// `GSLBRegion/{zone}/{fqdn}/` with full pool detail
    pub fn gslb_regions(zone: &str, fqdn: &str) -> Self {
        Self::new(["GSLBRegion", zone, fqdn]).with_query("detail", "Y")
    }

    /// `GSLBRegion/{zone}/{fqdn}/{region}/`
    pub fn gslb_region(zone: &str, fqdn: &str, region: &str) -> Self {
        Self::new(["GSLBRegion", zone, fqdn, region])
    }

    /// `GSLB/{zone}/{fqdn}/`
    pub fn gslb_service(zone: &str, fqdn: &str) -> Self {
        Self::new(["GSLB", zone, fqdn])
    }
}

impl fmt::Display for ApiPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "{segment}/")?;
        }
        for (i, (key, value)) in self.query.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{sep}{key}={value}")?;
        }
        Ok(())
    }
}

/// Message attached to an API response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiMessage {
    #[serde(rename = "INFO", default)]
    pub info: String,
    #[serde(rename = "SOURCE", default)]
    pub source: String,
    #[serde(rename = "ERR_CD", default)]
    pub err_cd: Option<String>,
    #[serde(rename = "LVL", default)]
    pub lvl: String,
}

/// Generic response envelope: `{status, data, job_id, msgs}`
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    pub status: String,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub job_id: Option<u64>,
    #[serde(default)]
    pub msgs: Vec<ApiMessage>,
}

impl Envelope {
    pub fn success(data: Value) -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            data,
            job_id: None,
            msgs: Vec::new(),
        }
    }

    pub fn failure(info: &str) -> Self {
        Self {
            status: "failure".to_string(),
            data: Value::Null,
            job_id: None,
            msgs: vec![ApiMessage {
                info: info.to_string(),
                lvl: "ERROR".to_string(),
                ..Default::default()
            }],
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }

    /// Require a `success` status, then decode `data`
    pub fn into_data<T: DeserializeOwned>(self) -> Result<T, TransportError> {
        if !self.is_success() {
            return Err(TransportError::Status {
                messages: self
                    .msgs
                    .iter()
                    .filter(|m| !m.info.is_empty())
                    .map(|m| format!("{}: {}", m.source, m.info))
                    .collect(),
                status: self.status,
            });
        }
        serde_json::from_value(self.data).map_err(|e| TransportError::Decode(e.to_string()))
    }
}

/// Issues requests against the API with credentials already established
#[async_trait]
pub trait ApiTransport: Send + Sync {
    async fn send(
        &self,
        method: Method,
        path: &ApiPath,
        body: Option<Value>,
    ) -> Result<Envelope, TransportError>;
}

/// Send a request and decode a successful envelope's `data`
pub async fn call<T: DeserializeOwned>(
    transport: &dyn ApiTransport,
    method: Method,
    path: &ApiPath,
    body: Option<Value>,
) -> Result<T, TransportError> {
    transport.send(method, path, body).await?.into_data()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_path_display() {
        assert_eq!(
            ApiPath::gslb_regions("ft.com", "a.ft.com").to_string(),
            "GSLBRegion/ft.com/a.ft.com/?detail=Y"
        );
        assert_eq!(
            ApiPath::gslb_region("ft.com", "a.ft.com", "EU West").to_string(),
            "GSLBRegion/ft.com/a.ft.com/EU West/"
        );
        assert_eq!(ApiPath::gslb_service("ft.com", "a.ft.com").to_string(), "GSLB/ft.com/a.ft.com/");
    }

    #[test]
    fn test_failure_status_is_an_error_even_with_data() {
        let envelope: Envelope = serde_json::from_value(json!({
            "status": "failure",
            "data": {"ttl": 30},
            "msgs": [{"INFO": "zone: No such zone", "SOURCE": "BLL", "ERR_CD": "NOT_FOUND", "LVL": "ERROR"}]
        }))
        .unwrap();
        let err = envelope.into_data::<Value>().unwrap_err();
        assert!(matches!(
            err,
            TransportError::Status { ref status, ref messages }
                if status == "failure" && messages == &vec!["BLL: zone: No such zone".to_string()]
        ));
    }

    #[test]
    fn test_incomplete_status_is_not_success() {
        let envelope: Envelope =
            serde_json::from_value(json!({"status": "incomplete", "job_id": 42})).unwrap();
        assert!(!envelope.is_success());
        assert_eq!(envelope.job_id, Some(42));
    }

    #[test]
    fn test_success_decodes_data() {
        let envelope = Envelope::success(json!({"ttl": 30}));
        let service: crate::types::GslbService = envelope.into_data().unwrap();
        assert_eq!(service.ttl, 30);
    }
}
