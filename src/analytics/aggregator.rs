//! Pure aggregation over registration records.
//!
//! Everything here is derived and recomputable from the stored rows alone:
//! no running counters, no mutation of the underlying collection. "Collected"
//! figures only ever count approved registrations; pending money is
//! "projected", rejected money is "at risk".

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{Registration, RegistrationStatus};
use crate::pricing::resolver::round_money;

/// Label under which rows with a blank region/role reference are grouped.
pub const UNASSIGNED: &str = "unassigned";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevenueSummary {
    /// Sum over approved records of what was actually paid (falling back to
    /// the agreed price when no payment amount was recorded).
    #[serde(with = "rust_decimal::serde::str")]
    pub collected: Decimal,
    /// Sum of agreed prices over pending records.
    #[serde(with = "rust_decimal::serde::str")]
    pub projected: Decimal,
    /// Sum of agreed prices over rejected records.
    #[serde(with = "rust_decimal::serde::str")]
    pub at_risk: Decimal,
}

/// Count and revenue subtotals for one region or role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupStat {
    pub name: String,
    pub count: usize,
    #[serde(with = "rust_decimal::serde::str")]
    pub collected: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub projected: Decimal,
}

/// One calendar day of sign-up activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub count: usize,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GrowthRate {
    pub window_days: i64,
    pub recent: usize,
    pub previous: usize,
    /// Percent change of the most recent window over the one before it.
    #[serde(with = "rust_decimal::serde::str")]
    pub percent: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoalProgress {
    #[serde(with = "rust_decimal::serde::str")]
    pub goal: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub collected: Decimal,
    /// Gap still to close, clamped at zero once the goal is exceeded.
    #[serde(with = "rust_decimal::serde::str")]
    pub remaining: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub percent: Decimal,
}

pub fn status_counts(registrations: &[Registration]) -> StatusCounts {
    let mut counts = StatusCounts {
        total: registrations.len(),
        pending: 0,
        approved: 0,
        rejected: 0,
    };
    for r in registrations {
        match r.workflow_status() {
            RegistrationStatus::Pending => counts.pending += 1,
            RegistrationStatus::Approved => counts.approved += 1,
            RegistrationStatus::Rejected => counts.rejected += 1,
        }
    }
    counts
}

pub fn revenue_summary(registrations: &[Registration]) -> RevenueSummary {
    let mut summary = RevenueSummary {
        collected: Decimal::ZERO,
        projected: Decimal::ZERO,
        at_risk: Decimal::ZERO,
    };
    for r in registrations {
        match r.workflow_status() {
            RegistrationStatus::Approved => summary.collected += r.effective_amount(),
            RegistrationStatus::Pending => summary.projected += r.agreed_price,
            RegistrationStatus::Rejected => summary.at_risk += r.agreed_price,
        }
    }
    summary
}

/// Group by region name, sorted descending by collected revenue (name as the
/// tiebreak). Rows whose region reference is blank land in `unassigned`.
pub fn by_region(registrations: &[Registration]) -> Vec<GroupStat> {
    grouped(registrations, |r| r.region_name.as_str())
}

/// Group by role key, same ordering rules as [`by_region`].
pub fn by_role(registrations: &[Registration]) -> Vec<GroupStat> {
    grouped(registrations, |r| r.role_key.as_str())
}

fn grouped<'a>(
    registrations: &'a [Registration],
    key: impl Fn(&'a Registration) -> &'a str,
) -> Vec<GroupStat> {
    let mut map: BTreeMap<&str, GroupStat> = BTreeMap::new();

    for r in registrations {
        let name = match key(r) {
            "" => UNASSIGNED,
            name => name,
        };
        let entry = map.entry(name).or_insert_with(|| GroupStat {
            name: name.to_string(),
            count: 0,
            collected: Decimal::ZERO,
            projected: Decimal::ZERO,
        });
        entry.count += 1;
        match r.workflow_status() {
            RegistrationStatus::Approved => entry.collected += r.effective_amount(),
            RegistrationStatus::Pending => entry.projected += r.agreed_price,
            RegistrationStatus::Rejected => {}
        }
    }

    let mut groups: Vec<GroupStat> = map.into_values().collect();
    groups.sort_by(|a, b| b.collected.cmp(&a.collected).then(a.name.cmp(&b.name)));
    groups
}

/// Sign-ups per calendar day, chronologically ordered regardless of the
/// input order.
pub fn daily_trend(registrations: &[Registration]) -> Vec<TrendPoint> {
    let mut days: BTreeMap<NaiveDate, (usize, Decimal)> = BTreeMap::new();

    for r in registrations {
        let day = r.created_at.date_naive();
        let entry = days.entry(day).or_insert((0, Decimal::ZERO));
        entry.0 += 1;
        entry.1 += r.agreed_price;
    }

    days.into_iter()
        .map(|(date, (count, amount))| TrendPoint {
            date,
            count,
            amount,
        })
        .collect()
}

/// Compare sign-up counts of the most recent `window_days` against the
/// immediately preceding window of equal length. An empty previous window
/// reports +100% when the recent one has any activity, 0% otherwise.
pub fn growth_rate(
    registrations: &[Registration],
    now: DateTime<Utc>,
    window_days: i64,
) -> GrowthRate {
    let window = Duration::days(window_days.max(1));
    let recent_start = now - window;
    let previous_start = recent_start - window;

    let mut recent = 0usize;
    let mut previous = 0usize;
    for r in registrations {
        if r.created_at >= recent_start && r.created_at < now {
            recent += 1;
        } else if r.created_at >= previous_start && r.created_at < recent_start {
            previous += 1;
        }
    }

    let percent = if previous == 0 {
        if recent > 0 {
            Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        }
    } else {
        round_money(
            Decimal::from(recent as i64 - previous as i64) * Decimal::ONE_HUNDRED
                / Decimal::from(previous as i64),
            2,
        )
    };

    GrowthRate {
        window_days: window_days.max(1),
        recent,
        previous,
        percent,
    }
}

/// How many approved registrants asked for lodging.
pub fn lodging_uptake(registrations: &[Registration]) -> usize {
    registrations
        .iter()
        .filter(|r| r.workflow_status() == RegistrationStatus::Approved && r.lodging)
        .count()
}

/// Progress of collected revenue toward the event's goal, when one is set.
pub fn goal_progress(goal: Option<Decimal>, collected: Decimal) -> Option<GoalProgress> {
    let goal = goal.filter(|g| *g > Decimal::ZERO)?;

    Some(GoalProgress {
        goal,
        collected,
        remaining: (goal - collected).max(Decimal::ZERO),
        percent: round_money(collected * Decimal::ONE_HUNDRED / goal, 2),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn reg(
        status: &str,
        region: &str,
        role: &str,
        price: Decimal,
        day: u32,
        lodging: bool,
    ) -> Registration {
        Registration {
            id: Uuid::new_v4(),
            event_id: Uuid::nil(),
            first_name: "Ana".to_string(),
            last_name: "Sosa".to_string(),
            email: "ana@example.com".to_string(),
            phone: "3000000000".to_string(),
            health_entity: "Sura".to_string(),
            region_name: region.to_string(),
            role_key: role.to_string(),
            lodging,
            receipt_url: "/media/e/1.jpg".to_string(),
            agreed_price: price,
            amount_paid: None,
            status: status.to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 10, day, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_status_counts() {
        let rows = vec![
            reg("approved", "Bogotá", "laico", dec!(120000), 1, true),
            reg("pending", "Cali", "laico", dec!(100000), 2, false),
            reg("rejected", "Cali", "obispo", dec!(0), 3, false),
            reg("approved", "Bogotá", "laico", dec!(150000), 4, true),
        ];
        let counts = status_counts(&rows);
        assert_eq!(counts.total, 4);
        assert_eq!(counts.approved, 2);
        assert_eq!(counts.pending, 1);
        assert_eq!(counts.rejected, 1);
    }

    #[test]
    fn test_collected_revenue_counts_approved_only() {
        let rows = vec![
            reg("approved", "Bogotá", "laico", dec!(120000), 1, false),
            reg("pending", "Cali", "laico", dec!(100000), 2, false),
            reg("rejected", "Cali", "laico", dec!(90000), 3, false),
        ];
        let revenue = revenue_summary(&rows);
        assert_eq!(revenue.collected, dec!(120000));
        assert_eq!(revenue.projected, dec!(100000));
        assert_eq!(revenue.at_risk, dec!(90000));
    }

    #[test]
    fn test_status_flip_moves_contribution_between_aggregates() {
        let mut rows = vec![
            reg("approved", "Bogotá", "laico", dec!(120000), 1, false),
            reg("approved", "Cali", "laico", dec!(80000), 2, false),
        ];
        assert_eq!(revenue_summary(&rows).collected, dec!(200000));

        rows[1].status = "rejected".to_string();
        let revenue = revenue_summary(&rows);
        assert_eq!(revenue.collected, dec!(120000));
        assert_eq!(revenue.at_risk, dec!(80000));
    }

    #[test]
    fn test_amount_paid_overrides_agreed_price_when_collected() {
        let mut row = reg("approved", "Bogotá", "laico", dec!(120000), 1, false);
        row.amount_paid = Some(dec!(100000)); // partial payment
        assert_eq!(revenue_summary(&[row]).collected, dec!(100000));
    }

    #[test]
    fn test_by_region_sorted_by_collected_desc() {
        let rows = vec![
            reg("approved", "Cali", "laico", dec!(80000), 1, false),
            reg("approved", "Bogotá", "laico", dec!(120000), 1, false),
            reg("approved", "Bogotá", "laico", dec!(150000), 2, false),
            reg("pending", "Cali", "laico", dec!(100000), 2, false),
        ];
        let groups = by_region(&rows);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "Bogotá");
        assert_eq!(groups[0].collected, dec!(270000));
        assert_eq!(groups[0].count, 2);
        assert_eq!(groups[1].name, "Cali");
        assert_eq!(groups[1].collected, dec!(80000));
        assert_eq!(groups[1].projected, dec!(100000));
    }

    #[test]
    fn test_blank_region_grouped_as_unassigned() {
        let rows = vec![reg("pending", "", "laico", dec!(50000), 1, false)];
        let groups = by_region(&rows);
        assert_eq!(groups[0].name, UNASSIGNED);
    }

    #[test]
    fn test_daily_trend_is_chronological() {
        // Deliberately out of insertion order
        let rows = vec![
            reg("pending", "Cali", "laico", dec!(10), 15, false),
            reg("pending", "Cali", "laico", dec!(10), 5, false),
            reg("pending", "Cali", "laico", dec!(10), 15, false),
            reg("pending", "Cali", "laico", dec!(10), 6, false),
        ];
        let trend = daily_trend(&rows);
        assert_eq!(trend.len(), 3);
        assert!(trend.windows(2).all(|w| w[0].date < w[1].date));
        assert_eq!(trend[2].count, 2);
        assert_eq!(trend[2].amount, dec!(20));
    }

    #[test]
    fn test_growth_rate_half_as_many_is_minus_fifty() {
        // 10 sign-ups in days 1-7, 5 in days 8-14; evaluated at end of day 14
        let mut rows = Vec::new();
        for day in 1..=5 {
            rows.push(reg("pending", "Cali", "laico", dec!(1), day, false));
            rows.push(reg("pending", "Cali", "laico", dec!(1), day, false));
        }
        for day in 8..=12 {
            rows.push(reg("pending", "Cali", "laico", dec!(1), day, false));
        }
        let now = Utc.with_ymd_and_hms(2024, 10, 14, 23, 59, 59).unwrap();

        let growth = growth_rate(&rows, now, 7);
        assert_eq!(growth.recent, 5);
        assert_eq!(growth.previous, 10);
        assert_eq!(growth.percent, dec!(-50));
    }

    #[test]
    fn test_growth_rate_from_empty_previous_window() {
        let rows = vec![reg("pending", "Cali", "laico", dec!(1), 12, false)];
        let now = Utc.with_ymd_and_hms(2024, 10, 14, 0, 0, 0).unwrap();

        let growth = growth_rate(&rows, now, 7);
        assert_eq!(growth.previous, 0);
        assert_eq!(growth.percent, dec!(100));
    }

    #[test]
    fn test_growth_rate_no_activity_at_all() {
        let now = Utc.with_ymd_and_hms(2024, 10, 14, 0, 0, 0).unwrap();
        let growth = growth_rate(&[], now, 7);
        assert_eq!(growth.percent, dec!(0));
    }

    #[test]
    fn test_lodging_uptake_counts_approved_only() {
        let rows = vec![
            reg("approved", "Bogotá", "laico", dec!(150000), 1, true),
            reg("pending", "Bogotá", "laico", dec!(150000), 2, true),
            reg("approved", "Cali", "laico", dec!(100000), 3, false),
        ];
        assert_eq!(lodging_uptake(&rows), 1);
    }

    #[test]
    fn test_goal_progress_clamps_remaining() {
        let progress = goal_progress(Some(dec!(100000)), dec!(120000)).unwrap();
        assert_eq!(progress.remaining, dec!(0));
        assert_eq!(progress.percent, dec!(120));

        let progress = goal_progress(Some(dec!(200000)), dec!(50000)).unwrap();
        assert_eq!(progress.remaining, dec!(150000));
        assert_eq!(progress.percent, dec!(25));

        assert!(goal_progress(None, dec!(50000)).is_none());
        assert!(goal_progress(Some(dec!(0)), dec!(50000)).is_none());
    }
}
