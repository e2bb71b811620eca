use crate::DashboardState;
use aggregator::{AggregateView, SourceOutcome};
use axum::{extract::State, Json};
use core_types::{HealthStatus, Source};
use std::collections::BTreeMap;
use std::sync::Arc;

/// # GET /api/dashboard
/// Always 200: offline sources are reported inside the view.
pub async fn get_dashboard(State(state): State<Arc<DashboardState>>) -> Json<AggregateView> {
    Json(state.dashboard.load().await)
}

/// # GET /api/saude
pub async fn get_health(
    State(state): State<Arc<DashboardState>>,
) -> Json<BTreeMap<Source, SourceOutcome<HealthStatus>>> {
    Json(state.dashboard.health().await)
}
