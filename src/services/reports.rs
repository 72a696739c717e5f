//! Usage reports and CSV export

use chrono::{Local, NaiveDate};
use std::collections::{BTreeMap, HashMap};

use crate::{
    api::reports::{StatEntry, UsageReport},
    error::AppResult,
    models::period::PeriodSchedule,
    repository::{bookings::BookingRow, Repository},
};

#[derive(Clone)]
pub struct ReportsService {
    repository: Repository,
    schedule: PeriodSchedule,
}

impl ReportsService {
    pub fn new(repository: Repository, schedule: PeriodSchedule) -> Self {
        Self { repository, schedule }
    }

    /// Aggregate booking usage over a date range. Statuses are derived
    /// before counting, so live bookings land in the right bucket.
    pub async fn usage(&self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> AppResult<UsageReport> {
        let rows = self.fetch(from, to).await?;
        let now = Local::now().naive_local();

        let mut by_status: BTreeMap<&'static str, i64> = BTreeMap::new();
        let mut by_classroom: BTreeMap<String, i64> = BTreeMap::new();
        let mut by_program: BTreeMap<String, i64> = BTreeMap::new();
        let mut by_type: BTreeMap<&'static str, i64> = BTreeMap::new();
        let mut by_equipment: BTreeMap<i32, i64> = BTreeMap::new();

        for row in &rows {
            let b = &row.booking;
            let status = self.schedule.derive_status(b.status, b.date, b.period, now)?;

            *by_status.entry(status.as_str()).or_insert(0) += 1;
            *by_classroom.entry(row.classroom_name.clone()).or_insert(0) += 1;
            *by_program
                .entry(b.program.clone().unwrap_or_else(|| "unknown".to_string()))
                .or_insert(0) += 1;
            *by_type.entry(b.booking_type.as_str()).or_insert(0) += 1;
            for id in &b.equipment_ids {
                *by_equipment.entry(*id).or_insert(0) += 1;
            }
        }

        // Resolve equipment names for the top list
        let equipment_names: HashMap<i32, String> = self
            .repository
            .equipment
            .list()
            .await?
            .into_iter()
            .map(|e| (e.id, e.name))
            .collect();

        let mut top_equipment: Vec<StatEntry> = by_equipment
            .into_iter()
            .map(|(id, value)| StatEntry {
                label: equipment_names
                    .get(&id)
                    .cloned()
                    .unwrap_or_else(|| format!("(deleted equipment {})", id)),
                value,
            })
            .collect();
        top_equipment.sort_by(|a, b| b.value.cmp(&a.value).then(a.label.cmp(&b.label)));
        top_equipment.truncate(20);

        Ok(UsageReport {
            from,
            to,
            total: rows.len() as i64,
            by_status: to_entries(by_status),
            by_classroom: to_entries(by_classroom),
            by_program: to_entries(by_program),
            by_booking_type: to_entries(by_type),
            top_equipment,
        })
    }

    /// Export bookings in a date range as CSV, oldest first
    pub async fn export_csv(&self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> AppResult<String> {
        let mut rows = self.fetch(from, to).await?;
        rows.sort_by(|a, b| {
            (a.booking.date, a.booking.period, a.booking.id)
                .cmp(&(b.booking.date, b.booking.period, b.booking.id))
        });

        let equipment_names: HashMap<i32, String> = self
            .repository
            .equipment
            .list()
            .await?
            .into_iter()
            .map(|e| (e.id, e.name))
            .collect();

        let now = Local::now().naive_local();

        let mut out = String::from(
            "id,date,period,type,status,teacher,program,classroom,equipment,learning_plan,created_at,returned_at\n",
        );

        for row in &rows {
            let b = &row.booking;
            let status = self.schedule.derive_status(b.status, b.date, b.period, now)?;
            let equipment = b
                .equipment_ids
                .iter()
                .map(|id| {
                    equipment_names
                        .get(id)
                        .cloned()
                        .unwrap_or_else(|| format!("(deleted equipment {})", id))
                })
                .collect::<Vec<_>>()
                .join("; ");

            let fields = [
                b.id.to_string(),
                b.date.to_string(),
                b.period.to_string(),
                b.booking_type.to_string(),
                status.to_string(),
                b.teacher_name.clone(),
                b.program.clone().unwrap_or_default(),
                row.classroom_name.clone(),
                equipment,
                b.learning_plan.clone().unwrap_or_default(),
                b.created_at.to_rfc3339(),
                b.returned_at.map(|d| d.to_rfc3339()).unwrap_or_default(),
            ];

            let line = fields
                .iter()
                .map(|f| csv_escape(f))
                .collect::<Vec<_>>()
                .join(",");
            out.push_str(&line);
            out.push('\n');
        }

        Ok(out)
    }

    async fn fetch(&self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> AppResult<Vec<BookingRow>> {
        self.repository
            .bookings
            .list(None, from, to, None, None, None)
            .await
    }
}

fn to_entries<K: ToString>(map: BTreeMap<K, i64>) -> Vec<StatEntry> {
    let mut entries: Vec<StatEntry> = map
        .into_iter()
        .map(|(label, value)| StatEntry {
            label: label.to_string(),
            value,
        })
        .collect();
    entries.sort_by(|a, b| b.value.cmp(&a.value).then(a.label.cmp(&b.label)));
    entries
}

/// Quote a CSV field when it contains separators, quotes or newlines
fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_fields_are_unquoted() {
        assert_eq!(csv_escape("Physics Lab"), "Physics Lab");
    }

    #[test]
    fn fields_with_separators_are_quoted() {
        assert_eq!(csv_escape("a,b"), "\"a,b\"");
        assert_eq!(csv_escape("line\nbreak"), "\"line\nbreak\"");
    }

    #[test]
    fn quotes_are_doubled() {
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn entries_sort_by_count_then_label() {
        let mut map = BTreeMap::new();
        map.insert("b".to_string(), 2);
        map.insert("a".to_string(), 2);
        map.insert("c".to_string(), 5);
        let entries = to_entries(map);
        assert_eq!(entries[0].label, "c");
        assert_eq!(entries[1].label, "a");
        assert_eq!(entries[2].label, "b");
    }
}
