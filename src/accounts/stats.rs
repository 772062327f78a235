//! Dashboard numbers and CSV exports derived from the store contents.

use super::types::{AuditEntry, UserSummary};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

const RECENT_LIMIT: usize = 5;
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecentUser {
    pub email: String,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayCount {
    pub day: NaiveDate,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsageStats {
    pub total_users: usize,
    pub total_logins: usize,
    pub logins_last_7_days: usize,
    pub last_registered: Vec<RecentUser>,
    pub last_logins: Vec<RecentUser>,
    /// Ascending by day; days without logins are absent.
    pub logins_by_day: Vec<DayCount>,
}

impl UsageStats {
    pub fn compute(logs: &[AuditEntry], users: &[UserSummary], now: DateTime<Utc>) -> Self {
        let since = now - Duration::days(7);
        let logins = logs.iter().filter(|entry| entry.action.is_login());

        let mut by_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
        let mut total_logins = 0;
        for entry in logins {
            total_logins += 1;
            if entry.timestamp >= since {
                *by_day.entry(entry.timestamp.date_naive()).or_default() += 1;
            }
        }

        Self {
            total_users: users.len(),
            total_logins,
            logins_last_7_days: by_day.values().sum(),
            last_registered: most_recent(users, |user| user.created_at),
            last_logins: most_recent(users, |user| user.last_login),
            logins_by_day: by_day
                .into_iter()
                .map(|(day, total)| DayCount { day, total })
                .collect(),
        }
    }
}

fn most_recent(
    users: &[UserSummary],
    key: impl Fn(&UserSummary) -> DateTime<Utc>,
) -> Vec<RecentUser> {
    let mut recent: Vec<RecentUser> = users
        .iter()
        .map(|user| RecentUser {
            email: user.email.clone(),
            at: key(user),
        })
        .collect();
    recent.sort_by(|a, b| b.at.cmp(&a.at).then_with(|| a.email.cmp(&b.email)));
    recent.truncate(RECENT_LIMIT);
    recent
}

pub fn users_csv(users: &[UserSummary]) -> String {
    let mut out = String::from("email,created_at,last_login\n");
    for user in users {
        let created_at = user.created_at.format(TIMESTAMP_FORMAT).to_string();
        let last_login = user.last_login.format(TIMESTAMP_FORMAT).to_string();
        push_row(&mut out, &[user.email.as_str(), created_at.as_str(), last_login.as_str()]);
    }
    out
}

pub fn logins_by_day_csv(days: &[DayCount]) -> String {
    let mut out = String::from("dia,total\n");
    for day in days {
        let (dia, total) = (day.day.to_string(), day.total.to_string());
        push_row(&mut out, &[dia.as_str(), total.as_str()]);
    }
    out
}

fn push_row(out: &mut String, fields: &[&str]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&csv_field(field));
    }
    out.push('\n');
}

/// Quote only when needed; embedded quotes are doubled.
fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
