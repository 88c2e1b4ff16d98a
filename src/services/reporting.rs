//! Aggregate reporting: pass rates and counts over executions, cases and bugs.

use crate::db::reports::{self, ReportScope};
use crate::db::{self, DbPool};
use crate::error::AppResult;
use crate::models::{
    DashboardStats, ExecutionQuery, ProjectReport, ReportSummary, TestExecution, UserStats,
};

/// Executions shown on the dashboard.
pub const RECENT_EXECUTIONS: u64 = 5;

/// Percentage of passed executions, rounded half-to-even to two decimals;
/// 0 when `total` is 0.
pub fn pass_rate(passed: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let rate = passed as f64 / total as f64 * 100.0;
    (rate * 100.0).round_ties_even() / 100.0
}

/// Execution totals across every project.
pub async fn summary(pool: &DbPool) -> AppResult<ReportSummary> {
    let conn = pool.connection();
    let total_test_cases = reports::count_test_cases(conn, ReportScope::All).await?;
    let counts = reports::execution_counts(conn, ReportScope::All).await?;

    Ok(ReportSummary {
        total_test_cases,
        total_executions: counts.total,
        passed: counts.passed,
        failed: counts.failed,
        blocked: counts.blocked,
        pass_rate: pass_rate(counts.passed, counts.total),
    })
}

/// Totals for one project. Fails with `NotFound` for an unknown project.
pub async fn project_report(pool: &DbPool, project_id: i32) -> AppResult<ProjectReport> {
    let conn = pool.connection();
    db::projects::get(conn, project_id).await?;

    let scope = ReportScope::Project(project_id);
    let total_test_cases = reports::count_test_cases(conn, scope).await?;
    let counts = reports::execution_counts(conn, scope).await?;
    let total_bugs = reports::count_bugs(conn, scope).await?;
    let total_requirements = reports::count_requirements(conn, scope).await?;

    Ok(ProjectReport {
        project_id,
        total_test_cases,
        total_executions: counts.total,
        passed: counts.passed,
        failed: counts.failed,
        total_bugs,
        total_requirements,
        pass_rate: pass_rate(counts.passed, counts.total),
    })
}

pub async fn dashboard(pool: &DbPool) -> AppResult<DashboardStats> {
    let conn = pool.connection();
    let total_test_cases = reports::count_test_cases(conn, ReportScope::All).await?;
    let counts = reports::execution_counts(conn, ReportScope::All).await?;
    let total_bugs = reports::count_bugs(conn, ReportScope::All).await?;

    let recent = db::test_executions::list(
        conn,
        &ExecutionQuery {
            limit: Some(RECENT_EXECUTIONS),
            ..Default::default()
        },
    )
    .await?;

    Ok(DashboardStats {
        total_test_cases,
        total_executions: counts.total,
        total_bugs,
        pass_rate: pass_rate(counts.passed, counts.total),
        recent_executions: recent.into_iter().map(TestExecution::from).collect(),
    })
}

pub async fn user_stats(pool: &DbPool) -> AppResult<UserStats> {
    let (total_users, active_users, [admin_count, manager_count, developer_count, tester_count]) =
        reports::user_counts(pool.connection()).await?;

    Ok(UserStats {
        total_users,
        active_users,
        admin_count,
        manager_count,
        developer_count,
        tester_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pass_rate_is_zero_without_executions() {
        assert_eq!(pass_rate(0, 0), 0.0);
    }

    #[test]
    fn test_pass_rate_rounds_to_two_decimals() {
        assert_eq!(pass_rate(3, 4), 75.0);
        assert_eq!(pass_rate(1, 3), 33.33);
        assert_eq!(pass_rate(2, 3), 66.67);
        assert_eq!(pass_rate(5, 5), 100.0);
    }

    #[test]
    fn test_pass_rate_ties_round_to_even() {
        // 3.125 and 15.625 are exact halves at the second decimal.
        assert_eq!(pass_rate(1, 32), 3.12);
        assert_eq!(pass_rate(5, 32), 15.62);
        assert_eq!(pass_rate(3, 32), 9.38);
    }
}
