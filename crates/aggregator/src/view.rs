use crate::outcome::{FailureReason, FaultKind, SourceOutcome};
use analytics::{compute_statistics, CustomerDigest, NumericSeries, StatisticsResult};
use api_client::{CustomerList, ProductList, SaleList, SourcePayload};
use chrono::{DateTime, Datelike, Utc};
use configuration::MetricWindow;
use core_types::{Customer, Product, Sale, Source};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    Online,
    Offline,
}

/// How one source fared in the fan-out that produced the view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceAvailability {
    pub status: Availability,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<FailureReason>,
}

impl SourceAvailability {
    pub fn is_online(&self) -> bool {
        self.status == Availability::Online
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductsPanel {
    pub total: usize,
    pub items: Vec<Product>,
    pub statistics: StatisticsResult,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomersPanel {
    pub total: usize,
    pub items: Vec<Customer>,
    pub digest: CustomerDigest,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesPanel {
    pub total: usize,
    pub items: Vec<Sale>,
    pub statistics: StatisticsResult,
}

/// Totals derived across sources. Only online sources contribute; `partial`
/// is set whenever at least one source is offline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_records: usize,
    pub revenue: Decimal,
    pub average_ticket: Decimal,
    pub largest_sale: Decimal,
    pub catalog_value: Decimal,
    pub offline_sources: usize,
    pub partial: bool,
}

/// The merged dashboard: one panel per source plus availability metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateView {
    pub sources: BTreeMap<Source, SourceAvailability>,
    pub products: ProductsPanel,
    pub customers: CustomersPanel,
    pub sales: SalesPanel,
    pub summary: Summary,
    pub window: MetricWindow,
    pub generated_at: DateTime<Utc>,
}

impl AggregateView {
    pub fn is_partial(&self) -> bool {
        self.summary.partial
    }

    pub fn availability(&self, source: Source) -> Option<&SourceAvailability> {
        self.sources.get(&source)
    }
}

/// Composes the view as of now. See [`compose_view_at`].
pub fn compose_view(
    outcomes: &BTreeMap<Source, SourceOutcome<SourcePayload>>,
    window: MetricWindow,
) -> AggregateView {
    compose_view_at(outcomes, window, Utc::now())
}

/// Merges per-source outcomes into one view. Never fails.
///
/// A source that is missing from `outcomes`, failed, or answered with another
/// source's payload is shown offline with empty defaults. `now` anchors the
/// `CurrentMonth` window.
pub fn compose_view_at(
    outcomes: &BTreeMap<Source, SourceOutcome<SourcePayload>>,
    window: MetricWindow,
    now: DateTime<Utc>,
) -> AggregateView {
    let mut sources = BTreeMap::new();
    let mut products = None;
    let mut customers = None;
    let mut sales = None;

    for source in Source::ALL {
        let payload = match outcomes.get(&source) {
            Some(SourceOutcome::Success(payload)) if payload.source() == source => Ok(payload),
            Some(SourceOutcome::Success(payload)) => Err(FailureReason::new(
                FaultKind::Decode,
                format!("expected {} payload, got {}", source, payload.source()),
            )),
            Some(SourceOutcome::Failure(reason)) => Err(reason.clone()),
            None => Err(FailureReason::new(
                FaultKind::Aborted,
                format!("no outcome recorded for {}", source),
            )),
        };

        let availability = match payload {
            Ok(payload) => {
                let total = match payload {
                    SourcePayload::Products(list) => {
                        products = Some(list);
                        list.total
                    }
                    SourcePayload::Customers(list) => {
                        customers = Some(list);
                        list.total
                    }
                    SourcePayload::Sales(list) => {
                        sales = Some(list);
                        list.total
                    }
                };
                SourceAvailability {
                    status: Availability::Online,
                    total,
                    reason: None,
                }
            }
            Err(reason) => SourceAvailability {
                status: Availability::Offline,
                total: 0,
                reason: Some(reason),
            },
        };
        sources.insert(source, availability);
    }

    // Offline panels are stamped with `now` so the view depends only on its inputs.
    let products = products
        .map(products_panel)
        .unwrap_or_else(|| ProductsPanel {
            statistics: empty_statistics(now),
            ..ProductsPanel::default()
        });
    let customers = customers
        .map(customers_panel)
        .unwrap_or_else(|| CustomersPanel {
            digest: CustomerDigest {
                generated_at: now,
                ..CustomerDigest::empty()
            },
            ..CustomersPanel::default()
        });
    let sales = sales
        .map(|list| sales_panel(list, window, now))
        .unwrap_or_else(|| SalesPanel {
            statistics: empty_statistics(now),
            ..SalesPanel::default()
        });

    let offline_sources = sources.values().filter(|a| !a.is_online()).count();
    let summary = Summary {
        total_records: products.total + customers.total + sales.total,
        revenue: sales.statistics.sum,
        average_ticket: sales.statistics.mean,
        largest_sale: sales.statistics.max,
        catalog_value: products.statistics.sum,
        offline_sources,
        partial: offline_sources > 0,
    };

    if summary.partial {
        tracing::warn!(offline = offline_sources, "Dashboard view is partial.");
    }

    AggregateView {
        sources,
        products,
        customers,
        sales,
        summary,
        window,
        generated_at: now,
    }
}

fn empty_statistics(now: DateTime<Utc>) -> StatisticsResult {
    StatisticsResult {
        computed_at: now,
        ..StatisticsResult::empty()
    }
}

fn products_panel(list: &ProductList) -> ProductsPanel {
    ProductsPanel {
        total: list.total,
        items: list.items.clone(),
        statistics: list.statistics.clone(),
    }
}

fn customers_panel(list: &CustomerList) -> CustomersPanel {
    CustomersPanel {
        total: list.total,
        items: list.items.clone(),
        digest: list.statistics.clone(),
    }
}

fn sales_panel(list: &SaleList, window: MetricWindow, now: DateTime<Utc>) -> SalesPanel {
    match window {
        MetricWindow::Lifetime => SalesPanel {
            total: list.total,
            items: list.items.clone(),
            statistics: list.statistics.clone(),
        },
        MetricWindow::CurrentMonth => {
            let items: Vec<Sale> = list
                .items
                .iter()
                .filter(|s| s.sold_at.year() == now.year() && s.sold_at.month() == now.month())
                .cloned()
                .collect();
            let statistics = match NumericSeries::collect(items.iter().map(|s| s.total))
                .and_then(|series| compute_statistics(&series))
            {
                Ok(statistics) => statistics,
                Err(e) => {
                    tracing::warn!(error = %e, "Sales totals rejected; showing empty statistics.");
                    empty_statistics(now)
                }
            };
            SalesPanel {
                total: items.len(),
                items,
                statistics,
            }
        }
    }
}
