//! Health check endpoints
//!
//! Health checks answer 200 when the condition holds and 503 with a JSON
//! body describing the failure when it does not. A 503 is therefore reported
//! as a failed [`HealthCheck`], not as an error. Any other non-2xx status is
//! still an error.

use std::fmt;
use std::str::FromStr;

use tracing::{instrument, warn};

use crate::client::Client;
use crate::encode::encode_path_segment;
use crate::error::{ClientError, Result};
use crate::resource::Resource;
use crate::response::decode_resource;

const SERVICE_UNAVAILABLE: u16 = 503;

/// Outcome of a health check
#[derive(Debug, Clone, PartialEq)]
pub struct HealthCheck {
    pub passed: bool,
    /// Failure details from the 503 body, e.g. `{"status": "failed", "reason": "..."}`
    pub details: Option<Resource>,
}

impl HealthCheck {
    pub fn passed() -> Self {
        Self {
            passed: true,
            details: None,
        }
    }

    pub fn failed(details: Option<Resource>) -> Self {
        Self {
            passed: false,
            details,
        }
    }

    /// Failure reason reported by the server, if any
    pub fn reason(&self) -> Option<&str> {
        self.details.as_ref().and_then(|d| d.str("reason"))
    }

    pub fn into_parts(self) -> (bool, Option<Resource>) {
        (self.passed, self.details)
    }
}

/// Time units accepted by the certificate expiration check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Days,
    Weeks,
    Months,
    Years,
}

impl TimeUnit {
    pub const ALL: [TimeUnit; 4] = [Self::Days, Self::Weeks, Self::Months, Self::Years];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Days => "days",
            Self::Weeks => "weeks",
            Self::Months => "months",
            Self::Years => "years",
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeUnit {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|unit| unit.as_str() == s)
            .ok_or_else(|| {
                let allowed: Vec<&str> = Self::ALL.iter().map(|u| u.as_str()).collect();
                ClientError::InvalidArgument(format!(
                    "supported time units are {}, given: {}",
                    allowed.join(", "),
                    s
                ))
            })
    }
}

/// Health check sub-client, see [`Client::health`]
#[derive(Debug, Clone, Copy)]
pub struct HealthChecks<'a> {
    client: &'a Client,
}

impl<'a> HealthChecks<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Fails if any resource alarm is in effect anywhere in the cluster
    #[instrument(skip(self))]
    pub async fn check_alarms(&self) -> Result<HealthCheck> {
        self.check("health/checks/alarms").await
    }

    /// Fails if a resource alarm is in effect on the target node
    #[instrument(skip(self))]
    pub async fn check_local_alarms(&self) -> Result<HealthCheck> {
        self.check("health/checks/local-alarms").await
    }

    /// Fails if any vhost is not running on the target node
    #[instrument(skip(self))]
    pub async fn check_virtual_hosts(&self) -> Result<HealthCheck> {
        self.check("health/checks/virtual-hosts").await
    }

    /// Fails if shutting down the node would leave a quorum queue without a majority
    #[instrument(skip(self))]
    pub async fn check_if_node_is_quorum_critical(&self) -> Result<HealthCheck> {
        self.check("health/checks/node-is-quorum-critical").await
    }

    /// Fails if shutting down the node would leave a mirrored queue without a synchronised mirror
    #[instrument(skip(self))]
    pub async fn check_if_node_is_mirror_sync_critical(&self) -> Result<HealthCheck> {
        self.check("health/checks/node-is-mirror-sync-critical")
            .await
    }

    /// Fails if nothing listens on `port`
    #[instrument(skip(self))]
    pub async fn check_port_listener(&self, port: u16) -> Result<HealthCheck> {
        self.check(&format!("health/checks/port-listener/{}", port))
            .await
    }

    /// Fails if no listener serves `protocol`, e.g. `amqp` or `mqtt`
    #[instrument(skip(self))]
    pub async fn check_protocol_listener(&self, protocol: &str) -> Result<HealthCheck> {
        self.check(&format!(
            "health/checks/protocol-listener/{}",
            encode_path_segment(protocol)
        ))
        .await
    }

    /// Fails if a TLS certificate used by a listener expires within the period
    ///
    /// `unit` must be one of `days`, `weeks`, `months` or `years` and `within`
    /// must be positive. Invalid input is rejected without a request.
    #[instrument(skip(self))]
    pub async fn check_certificate_expiration(
        &self,
        within: i64,
        unit: &str,
    ) -> Result<HealthCheck> {
        let path = certificate_expiration_path(within, unit)?;
        self.check(&path).await
    }

    async fn check(&self, path: &str) -> Result<HealthCheck> {
        match self.client.get_resource(path).await {
            Ok(_) => Ok(HealthCheck::passed()),
            Err(ClientError::Api { status, body, .. }) if status == SERVICE_UNAVAILABLE => {
                let details = decode_resource(body.as_bytes(), true).ok();
                warn!(
                    path,
                    reason = details.as_ref().and_then(|d| d.str("reason")),
                    "Health check failed"
                );
                Ok(HealthCheck::failed(details))
            }
            Err(e) => Err(e),
        }
    }
}

fn certificate_expiration_path(within: i64, unit: &str) -> Result<String> {
    let unit: TimeUnit = unit.parse()?;
    if within <= 0 {
        return Err(ClientError::InvalidArgument(
            "the number of time units must be a positive integer".to_string(),
        ));
    }
    Ok(format!(
        "health/checks/certificate-expiration/{}/{}",
        within, unit
    ))
}
