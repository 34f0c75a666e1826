//! Dashboard statistics.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Datelike, TimeZone, Utc};
use mockable::Clock;

use crate::domain::ports::{StatsQuery, StatsRepository, StatsRepositoryError};
use crate::domain::service_support::{add_duration, outage_or_internal};
use crate::domain::{
    EQUIPMENT_OVERVIEW_LIMIT, EquipmentId, EquipmentOverview, Error, RECENT_MAINTENANCE_LIMIT,
    RecentMaintenance, StatsWindow, SystemStats, UPCOMING_WINDOW, UpcomingMaintenance,
};

/// Implements [`StatsQuery`] with windows computed from the injected clock.
#[derive(Clone)]
pub struct StatsService<S> {
    stats: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<S> StatsService<S> {
    /// Create a new service with the given repository.
    pub fn new(stats: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self { stats, clock }
    }

    fn window(&self) -> Result<StatsWindow, Error> {
        window_at(self.clock.utc())
    }
}

fn window_at(now: DateTime<Utc>) -> Result<StatsWindow, Error> {
    let month_start = Utc
        .with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .single()
        .ok_or_else(|| Error::internal(format!("no month start for {now}")))?;
    Ok(StatsWindow {
        month_start,
        now,
        upcoming_until: add_duration(now, UPCOMING_WINDOW)?,
    })
}

fn map_stats_error(error: StatsRepositoryError) -> Error {
    outage_or_internal(&error, error.is_unavailable())
}

#[async_trait]
impl<S: StatsRepository> StatsQuery for StatsService<S> {
    async fn system_stats(&self) -> Result<SystemStats, Error> {
        let window = self.window()?;
        self.stats
            .system_stats(window)
            .await
            .map_err(map_stats_error)
    }

    async fn upcoming_maintenance(&self) -> Result<Vec<UpcomingMaintenance>, Error> {
        let window = self.window()?;
        self.stats.upcoming(window).await.map_err(map_stats_error)
    }

    async fn equipment_overview(&self) -> Result<Vec<EquipmentOverview>, Error> {
        self.stats
            .equipment_overview(EQUIPMENT_OVERVIEW_LIMIT)
            .await
            .map_err(map_stats_error)
    }

    async fn recent_maintenance(
        &self,
        equipment_id: Option<EquipmentId>,
    ) -> Result<Vec<RecentMaintenance>, Error> {
        self.stats
            .recent_maintenance(equipment_id, RECENT_MAINTENANCE_LIMIT)
            .await
            .map_err(map_stats_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockStatsRepository;
    use crate::domain::test_fixtures::{fixed_clock, fixture_now};
    use chrono::TimeDelta;

    #[test]
    fn window_starts_at_calendar_month() {
        let window = window_at(fixture_now()).expect("window");
        assert_eq!(
            window.month_start,
            Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).single().expect("date")
        );
        assert_eq!(window.upcoming_until, fixture_now() + TimeDelta::days(30));
    }

    #[tokio::test]
    async fn passes_clock_window_to_repository() {
        let mut repo = MockStatsRepository::new();
        repo.expect_system_stats()
            .withf(|window| window.now == fixture_now())
            .times(1)
            .return_once(|_| {
                Ok(SystemStats {
                    total_equipment: 3,
                    active_equipment: 2,
                    ..SystemStats::default()
                })
            });

        let stats = StatsService::new(Arc::new(repo), fixed_clock())
            .system_stats()
            .await
            .expect("stats");
        assert_eq!(stats.active_equipment, 2);
    }

    #[tokio::test]
    async fn feeds_are_capped_and_filtered() {
        let equipment_id = EquipmentId::random();
        let mut repo = MockStatsRepository::new();
        repo.expect_equipment_overview()
            .withf(|limit| *limit == EQUIPMENT_OVERVIEW_LIMIT)
            .times(1)
            .return_once(|_| Ok(Vec::new()));
        repo.expect_recent_maintenance()
            .withf(move |filter, limit| {
                *filter == Some(equipment_id) && *limit == RECENT_MAINTENANCE_LIMIT
            })
            .times(1)
            .return_once(|_, _| Ok(Vec::new()));

        let service = StatsService::new(Arc::new(repo), fixed_clock());
        assert!(service.equipment_overview().await.expect("overview").is_empty());
        assert!(
            service
                .recent_maintenance(Some(equipment_id))
                .await
                .expect("recent")
                .is_empty()
        );
    }

    #[tokio::test]
    async fn query_failure_is_internal() {
        let mut repo = MockStatsRepository::new();
        repo.expect_recent_maintenance()
            .return_once(|_, _| Err(StatsRepositoryError::query("syntax")));

        let error = StatsService::new(Arc::new(repo), fixed_clock())
            .recent_maintenance(None)
            .await
            .expect_err("query failure");
        assert_eq!(error.code(), ErrorCode::InternalError);
    }

    #[tokio::test]
    async fn outage_is_service_unavailable() {
        let mut repo = MockStatsRepository::new();
        repo.expect_upcoming()
            .return_once(|_| Err(StatsRepositoryError::connection("refused")));

        let error = StatsService::new(Arc::new(repo), fixed_clock())
            .upcoming_maintenance()
            .await
            .expect_err("outage");
        assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    }
}
