//! Portfolio view-model: balance, performance, activity, PnL and positions
//! merged from independent calls.

use std::future::Future;

use rust_decimal::Decimal;

use crate::api::ApiClient;
use crate::errors::ApiError;
use crate::metrics;
use crate::models::{
    Activity, Balance, ChartWindow, PageRequest, Performance, PnlSummary, PnlType, Prediction,
    TimeInForce,
};

/// Positions are fetched in one large page and paginated locally.
pub const POSITIONS_FETCH_SIZE: u32 = 200;
pub const POSITIONS_PAGE_SIZE: usize = 5;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PortfolioData {
    pub balance: Balance,
    pub performance: Performance,
    pub activities: Vec<Activity>,
    pub realized_pnl: PnlSummary,
    pub unrealized_pnl: PnlSummary,
    pub positions: Vec<Prediction>,
}

impl PortfolioData {
    pub fn total_pnl(&self) -> Decimal {
        self.realized_pnl.total_pnl + self.unrealized_pnl.total_pnl
    }
}

/// Portfolio page state.
///
/// Each source is fetched independently and a failure only zeroes its own
/// slice. A reload is assembled off to the side and swapped in whole, so a
/// reader never sees half of one load mixed with half of another.
#[derive(Debug, Clone)]
pub struct PortfolioView {
    user_id: String,
    data: PortfolioData,
    chart_window: ChartWindow,
    positions_filter: TimeInForce,
    positions_loaded: bool,
    failed_slices: Vec<&'static str>,
}

impl PortfolioView {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            data: PortfolioData::default(),
            chart_window: ChartWindow::default(),
            positions_filter: TimeInForce::Live,
            positions_loaded: false,
            failed_slices: Vec::new(),
        }
    }

    pub fn data(&self) -> &PortfolioData {
        &self.data
    }

    pub fn chart_window(&self) -> ChartWindow {
        self.chart_window
    }

    pub fn positions_filter(&self) -> TimeInForce {
        self.positions_filter
    }

    /// Slices that fell back to defaults during the last load.
    pub fn failed_slices(&self) -> &[&'static str] {
        &self.failed_slices
    }

    /// Fetch balance, performance, activity and both PnL kinds, in that order.
    /// Positions are fetched only on the first load; later loads keep them.
    pub async fn load(&mut self, client: &ApiClient) {
        let user_id = self.user_id.clone();
        let window = self.chart_window;
        let mut failed = Vec::new();

        let balance = slice("balance", &mut failed, client.get_balance(Some(&user_id))).await;
        let performance = slice(
            "performance",
            &mut failed,
            client.get_performance(&user_id, Some(window)),
        )
        .await;
        let activities = slice("activity", &mut failed, async {
            client
                .get_activities_by_user(&user_id, None)
                .await
                .map(|r| r.activities)
        })
        .await;
        let realized_pnl = slice(
            "pnl_realized",
            &mut failed,
            client.get_pnl(&user_id, PnlType::Realized),
        )
        .await;
        let unrealized_pnl = slice(
            "pnl_unrealized",
            &mut failed,
            client.get_pnl(&user_id, PnlType::Unrealized),
        )
        .await;

        let positions = if self.positions_loaded {
            std::mem::take(&mut self.data.positions)
        } else {
            let positions = slice(
                "positions",
                &mut failed,
                fetch_positions(client, &user_id, self.positions_filter),
            )
            .await;
            self.positions_loaded = true;
            positions
        };

        self.data = PortfolioData {
            balance,
            performance,
            activities,
            realized_pnl,
            unrealized_pnl,
            positions,
        };
        self.failed_slices = failed;

        tracing::info!(
            user_id = %self.user_id,
            window = self.chart_window.label(),
            positions = self.data.positions.len(),
            failed = ?self.failed_slices,
            "Portfolio loaded"
        );
    }

    /// Change the chart window and reload the chart slices. Positions are untouched.
    pub async fn set_chart_window(&mut self, client: &ApiClient, window: ChartWindow) {
        if self.chart_window == window && self.positions_loaded {
            return;
        }
        self.chart_window = window;
        self.load(client).await;
    }

    /// Change the positions filter and refetch positions only.
    pub async fn set_positions_filter(&mut self, client: &ApiClient, filter: TimeInForce) {
        self.positions_filter = filter;
        self.refresh_positions(client).await;
    }

    /// Refetch positions for the current filter. On failure the list is
    /// emptied rather than showing rows from a different filter.
    pub async fn refresh_positions(&mut self, client: &ApiClient) {
        let mut failed = Vec::new();
        let positions = slice(
            "positions",
            &mut failed,
            fetch_positions(client, &self.user_id, self.positions_filter),
        )
        .await;

        self.data.positions = positions;
        self.positions_loaded = true;
        self.failed_slices.retain(|s| *s != "positions");
        self.failed_slices.extend(failed);
    }

    /// 1-based page of positions, `POSITIONS_PAGE_SIZE` rows each.
    pub fn page(&self, page: usize) -> &[Prediction] {
        let start = page.saturating_sub(1) * POSITIONS_PAGE_SIZE;
        let positions = &self.data.positions;
        if start >= positions.len() {
            return &[];
        }
        let end = (start + POSITIONS_PAGE_SIZE).min(positions.len());
        &positions[start..end]
    }

    pub fn page_count(&self) -> usize {
        self.data.positions.len().div_ceil(POSITIONS_PAGE_SIZE).max(1)
    }
}

async fn fetch_positions(
    client: &ApiClient,
    user_id: &str,
    filter: TimeInForce,
) -> Result<Vec<Prediction>, ApiError> {
    let resp = client
        .get_predictions(
            user_id,
            Some(filter),
            Some(PageRequest::new(1, POSITIONS_FETCH_SIZE)),
        )
        .await?;
    Ok(resp.predictions)
}

/// Await one slice; on failure log, count, and fall back to the default.
async fn slice<T, F>(name: &'static str, failed: &mut Vec<&'static str>, fut: F) -> T
where
    T: Default,
    F: Future<Output = Result<T, ApiError>>,
{
    match fut.await {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(slice = name, error = %e, "Portfolio slice failed, using default");
            metrics::record_slice_failure(name);
            failed.push(name);
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view_with(n: usize) -> PortfolioView {
        let mut view = PortfolioView::new("u1");
        view.data.positions = (0..n)
            .map(|i| Prediction {
                prediction_id: Some(format!("p{i}")),
                ..Default::default()
            })
            .collect();
        view
    }

    #[test]
    fn client_side_pagination() {
        let view = view_with(12);
        assert_eq!(view.page_count(), 3);
        assert_eq!(view.page(1).len(), 5);
        assert_eq!(view.page(3).len(), 2);
        assert_eq!(view.page(3)[0].prediction_id.as_deref(), Some("p10"));
        assert!(view.page(4).is_empty());
        // page 0 is treated as the first page
        assert_eq!(view.page(0), view.page(1));
    }

    #[test]
    fn empty_portfolio_has_one_page() {
        let view = view_with(0);
        assert_eq!(view.page_count(), 1);
        assert!(view.page(1).is_empty());
    }

    #[test]
    fn total_pnl_sums_both_kinds() {
        let data = PortfolioData {
            realized_pnl: PnlSummary {
                total_pnl: Decimal::from(25),
                ..Default::default()
            },
            unrealized_pnl: PnlSummary {
                total_pnl: Decimal::from(-10),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(data.total_pnl(), Decimal::from(15));
    }
}
