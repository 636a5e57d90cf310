//! Connectivity and credential check.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::Result;
use crate::port::ControlPlane;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    /// Root type name returned by the endpoint.
    pub typename: String,
    /// Wall time of the logical call, retries included.
    pub elapsed: Duration,
}

/// One `__typename` round-trip through the retrying client.
pub async fn check<C>(control: &C) -> Result<CheckReport>
where
    C: ControlPlane + ?Sized,
{
    let started = Instant::now();
    let typename = control.ping().await?;
    let elapsed = started.elapsed();
    debug!(typename = %typename, ?elapsed, "Control plane reachable");
    Ok(CheckReport { typename, elapsed })
}
