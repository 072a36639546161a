use super::models::{ComponentHealth, HealthReport};
use crate::connectors::{BaasConnector, ConnectorError, PaymentGatewayConnector};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;

const CHECK_TIMEOUT: Duration = Duration::from_secs(5);
const SLOW_RESPONSE_THRESHOLD_MS: u64 = 1000;

/// Checks the external collaborators for `/health/components`
pub struct HealthChecker {
    baas: Arc<dyn BaasConnector>,
    gateway: Arc<dyn PaymentGatewayConnector>,
    start_time: Instant,
}

impl HealthChecker {
    pub fn new(baas: Arc<dyn BaasConnector>, gateway: Arc<dyn PaymentGatewayConnector>) -> Self {
        Self {
            baas,
            gateway,
            start_time: Instant::now(),
        }
    }

    pub async fn check_all(&self) -> HealthReport {
        let mut report = HealthReport::new(self.start_time.elapsed().as_secs());

        let (baas, gateway) = tokio::join!(
            check_component("BaaS", self.baas.ping()),
            check_component("Mercado Pago", self.gateway.ping()),
        );

        report.record("baas", baas);
        report.record("mercadopago", gateway);
        report
    }
}

#[tracing::instrument(name = "Check component health", skip(check))]
async fn check_component<F>(name: &str, check: F) -> ComponentHealth
where
    F: Future<Output = Result<(), ConnectorError>>,
{
    let start = Instant::now();
    match timeout(CHECK_TIMEOUT, check).await {
        Ok(Ok(())) => {
            let elapsed = start.elapsed().as_millis() as u64;
            if elapsed > SLOW_RESPONSE_THRESHOLD_MS {
                tracing::warn!("{} answered in {} ms", name, elapsed);
                ComponentHealth::slow(elapsed)
            } else {
                ComponentHealth::up(elapsed)
            }
        }
        Ok(Err(err)) => {
            tracing::error!("{} health check failed: {}", name, err);
            ComponentHealth::down(err.to_string())
        }
        Err(_) => {
            tracing::error!("{} health check timed out", name);
            ComponentHealth::down(format!("sem resposta em {}s", CHECK_TIMEOUT.as_secs()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectors::{InMemoryBaas, MockPaymentGateway};
    use crate::health::ComponentStatus;

    #[tokio::test]
    async fn unreachable_gateway_makes_report_unhealthy() {
        let gateway = Arc::new(MockPaymentGateway::new());
        let checker = HealthChecker::new(Arc::new(InMemoryBaas::new()), gateway.clone());
        assert!(checker.check_all().await.is_healthy());

        gateway.set_unavailable(true);
        let report = checker.check_all().await;
        assert_eq!(report.status, ComponentStatus::Unhealthy);
        assert_eq!(report.components["baas"].status, ComponentStatus::Healthy);
        assert_eq!(report.components["mercadopago"].status, ComponentStatus::Unhealthy);
    }
}
