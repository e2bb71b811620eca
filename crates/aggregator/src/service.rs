use crate::error::AggregatorError;
use crate::gather::{Gatherer, SourceCall};
use crate::outcome::SourceOutcome;
use crate::view::{compose_view, AggregateView};
use api_client::error::ApiError;
use api_client::{HttpUpstream, SourcePayload, Upstream};
use configuration::{MetricWindow, Settings};
use core_types::{HealthStatus, Source};
use futures::FutureExt;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

/// Fans out over the configured upstreams and composes the dashboard.
#[derive(Clone)]
pub struct DashboardService {
    upstreams: Vec<Arc<dyn Upstream>>,
    gatherer: Gatherer,
    window: MetricWindow,
}

impl DashboardService {
    pub fn new(upstreams: Vec<Arc<dyn Upstream>>, gatherer: Gatherer, window: MetricWindow) -> Self {
        Self {
            upstreams,
            gatherer,
            window,
        }
    }

    /// One `HttpUpstream` per source, each bounded by `upstream.timeout_secs`.
    ///
    /// The same bound is applied again at the fan-out, so a client that
    /// ignores its own timeout still cannot hold the view back.
    pub fn from_settings(settings: &Settings) -> Result<Self, AggregatorError> {
        let upstreams = Source::ALL
            .into_iter()
            .map(|source| {
                HttpUpstream::from_config(source, &settings.upstream)
                    .map(|client| Arc::new(client) as Arc<dyn Upstream>)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(
            upstreams,
            Gatherer::with_timeout(settings.upstream.timeout()),
            settings.dashboard.window,
        ))
    }

    pub fn window(&self) -> MetricWindow {
        self.window
    }

    pub fn per_call_timeout(&self) -> Option<Duration> {
        self.gatherer.per_call_timeout()
    }

    /// Lists every source concurrently and merges the results. Never fails.
    pub async fn load(&self) -> AggregateView {
        let calls = self.upstreams.iter().map(|upstream| {
            let source = upstream.source();
            let upstream = Arc::clone(upstream);
            let call: SourceCall<SourcePayload, ApiError> =
                async move { upstream.list().await }.boxed();
            (source, call)
        });
        let outcomes = self.gatherer.gather(calls).await;

        let view = compose_view(&outcomes, self.window);
        tracing::info!(
            offline = view.summary.offline_sources,
            total_records = view.summary.total_records,
            "Dashboard view composed."
        );
        view
    }

    /// Health-checks every source concurrently.
    pub async fn health(&self) -> BTreeMap<Source, SourceOutcome<HealthStatus>> {
        let calls = self.upstreams.iter().map(|upstream| {
            let source = upstream.source();
            let upstream = Arc::clone(upstream);
            let call: SourceCall<HealthStatus, ApiError> =
                async move { upstream.health().await }.boxed();
            (source, call)
        });
        self.gatherer.gather(calls).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::FaultKind;
    use crate::view::Availability;
    use analytics::{compute_statistics, NumericSeries, StatisticsResult};
    use api_client::SourceStatistics;
    use async_trait::async_trait;
    use core_types::{ListResponse, Product};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    enum Behaviour {
        Answer(SourcePayload),
        Fail(ApiError),
        Hang,
    }

    struct FakeUpstream {
        source: Source,
        behaviour: Behaviour,
    }

    #[async_trait]
    impl Upstream for FakeUpstream {
        fn source(&self) -> Source {
            self.source
        }

        async fn list(&self) -> Result<SourcePayload, ApiError> {
            match &self.behaviour {
                Behaviour::Answer(payload) => Ok(payload.clone()),
                Behaviour::Fail(err) => Err(err.clone()),
                Behaviour::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Err(ApiError::Timeout {
                        url: "never".into(),
                    })
                }
            }
        }

        async fn health(&self) -> Result<HealthStatus, ApiError> {
            match &self.behaviour {
                Behaviour::Answer(_) => Ok(HealthStatus::ok(self.source.service_name())),
                Behaviour::Fail(err) => Err(err.clone()),
                Behaviour::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok(HealthStatus::ok(self.source.service_name()))
                }
            }
        }

        async fn statistics(&self) -> Result<SourceStatistics, ApiError> {
            Ok(SourceStatistics::Sales(StatisticsResult::empty()))
        }
    }

    fn fake(source: Source, behaviour: Behaviour) -> Arc<dyn Upstream> {
        Arc::new(FakeUpstream { source, behaviour })
    }

    fn two_products() -> SourcePayload {
        let items: Vec<Product> = [dec!(2500.00), dec!(89.90)]
            .into_iter()
            .map(|price| Product {
                id: Uuid::new_v4(),
                name: "item".into(),
                description: String::new(),
                price,
                created_at: chrono::Utc::now(),
                updated_at: None,
            })
            .collect();
        let series = NumericSeries::collect(items.iter().map(|p| p.price)).unwrap();
        SourcePayload::Products(ListResponse::new(items, compute_statistics(&series).unwrap()))
    }

    fn no_sales() -> SourcePayload {
        SourcePayload::Sales(ListResponse::new(vec![], StatisticsResult::empty()))
    }

    #[tokio::test(start_paused = true)]
    async fn load_renders_despite_a_hanging_customers_service() {
        let service = DashboardService::new(
            vec![
                fake(Source::Products, Behaviour::Answer(two_products())),
                fake(Source::Customers, Behaviour::Hang),
                fake(Source::Sales, Behaviour::Answer(no_sales())),
            ],
            Gatherer::with_timeout(Duration::from_secs(10)),
            MetricWindow::Lifetime,
        );

        let view = service.load().await;

        assert_eq!(view.products.total, 2);
        assert_eq!(view.sales.total, 0);
        let customers = view.availability(Source::Customers).unwrap();
        assert_eq!(customers.status, Availability::Offline);
        assert_eq!(customers.total, 0);
        assert_eq!(customers.reason.as_ref().unwrap().kind, FaultKind::Timeout);
        assert!(view.is_partial());
    }

    #[tokio::test]
    async fn load_with_every_source_down_still_returns_a_view() {
        let refused = |source: Source| {
            fake(
                source,
                Behaviour::Fail(ApiError::Network {
                    url: format!("http://localhost{}", source.collection_path()),
                    message: "connection refused".into(),
                }),
            )
        };
        let service = DashboardService::new(
            Source::ALL.into_iter().map(refused).collect(),
            Gatherer::new(),
            MetricWindow::Lifetime,
        );

        let view = service.load().await;

        assert_eq!(view.summary.offline_sources, 3);
        assert_eq!(view.summary.total_records, 0);
        assert!(view.sources.values().all(|a| a.status == Availability::Offline));
    }

    #[tokio::test]
    async fn health_reports_each_source_separately() {
        let service = DashboardService::new(
            vec![
                fake(Source::Products, Behaviour::Answer(two_products())),
                fake(
                    Source::Sales,
                    Behaviour::Fail(ApiError::Upstream {
                        url: "http://localhost:3003/saude".into(),
                        status: 503,
                    }),
                ),
            ],
            Gatherer::new(),
            MetricWindow::Lifetime,
        );

        let health = service.health().await;

        assert_eq!(health.len(), 2);
        assert_eq!(
            health[&Source::Products].success().unwrap().service,
            "servico-produtos"
        );
        assert_eq!(
            health[&Source::Sales].failure().unwrap().kind,
            FaultKind::UpstreamError { status: 503 }
        );
    }

    #[test]
    fn from_settings_builds_one_client_per_source() {
        let settings = Settings::default();
        let service = DashboardService::from_settings(&settings).unwrap();

        assert_eq!(service.upstreams.len(), 3);
        assert_eq!(service.per_call_timeout(), Some(Duration::from_secs(10)));
        assert_eq!(service.window(), MetricWindow::Lifetime);
    }
}
