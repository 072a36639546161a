use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Ordered from best to worst so that a report can take the maximum
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Result of probing one collaborator
#[derive(Debug, Clone, Serialize)]
pub struct ComponentHealth {
    pub status: ComponentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,
    pub checked_at: DateTime<Utc>,
}

impl ComponentHealth {
    fn with(status: ComponentStatus, message: Option<String>, response_time_ms: Option<u64>) -> Self {
        Self {
            status,
            message,
            response_time_ms,
            checked_at: Utc::now(),
        }
    }

    pub fn up(response_time_ms: u64) -> Self {
        Self::with(ComponentStatus::Healthy, None, Some(response_time_ms))
    }

    pub fn slow(response_time_ms: u64) -> Self {
        Self::with(
            ComponentStatus::Degraded,
            Some(format!("respondeu em {} ms", response_time_ms)),
            Some(response_time_ms),
        )
    }

    pub fn down(reason: impl Into<String>) -> Self {
        Self::with(ComponentStatus::Unhealthy, Some(reason.into()), None)
    }
}

/// Body of `/health/components`
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: ComponentStatus,
    pub version: &'static str,
    pub uptime_seconds: u64,
    pub timestamp: DateTime<Utc>,
    pub components: BTreeMap<&'static str, ComponentHealth>,
}

impl HealthReport {
    pub fn new(uptime_seconds: u64) -> Self {
        Self {
            status: ComponentStatus::Healthy,
            version: env!("CARGO_PKG_VERSION"),
            uptime_seconds,
            timestamp: Utc::now(),
            components: BTreeMap::new(),
        }
    }

    pub fn record(&mut self, component: &'static str, health: ComponentHealth) {
        self.status = self.status.max(health.status);
        self.components.insert(component, health);
    }

    pub fn is_healthy(&self) -> bool {
        self.status == ComponentStatus::Healthy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worst_component_wins() {
        let mut report = HealthReport::new(1);
        report.record("baas", ComponentHealth::up(3));
        assert!(report.is_healthy());

        report.record("mercadopago", ComponentHealth::slow(1500));
        assert_eq!(report.status, ComponentStatus::Degraded);

        report.record("email", ComponentHealth::down("connection refused"));
        report.record("other", ComponentHealth::up(1));
        assert_eq!(report.status, ComponentStatus::Unhealthy);
    }
}
