use arrow::{
    array::{ArrayRef, Int64Array, StringArray},
    datatypes::{DataType, Field, Schema as ArrowSchema},
};
use chrono::NaiveDate;
use std::{
    collections::{BTreeMap, HashMap, HashSet},
    sync::Arc,
};
use tracing::{debug, warn};

use crate::process::enrich::EnrichedRecord;
use crate::schema::{
    columns,
    table::{date_array, TableRow},
};

/// Processes handled by one agent on one day.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PerformanceRow {
    pub date: NaiveDate,
    pub agent: String,
    pub count: i64,
}

/// Raw (date, agent) counts over records with a valid date and a named agent,
/// plus the agents in first-appearance order.
fn count_activity(base: &[EnrichedRecord]) -> (HashMap<(NaiveDate, &str), i64>, Vec<&str>) {
    let mut counts: HashMap<(NaiveDate, &str), i64> = HashMap::new();
    let mut seen = HashSet::new();
    let mut agents = Vec::new();
    for r in base {
        let (Some(date), Some(agent)) = (r.extraction_date, r.responsible_agent()) else {
            continue;
        };
        *counts.entry((date, agent)).or_insert(0) += 1;
        if seen.insert(agent) {
            agents.push(agent);
        }
    }
    (counts, agents)
}

/// Per-agent, per-day activity.
///
/// With a non-empty `calendar`, every (business day, agent) pair gets a row,
/// zero-filled where nothing was recorded, ordered by day then agent. Activity
/// on a date outside the calendar has no slot and is left out.
///
/// With an empty calendar the raw counts are returned, sorted by (day, agent).
pub fn performance(base: &[EnrichedRecord], calendar: &[NaiveDate]) -> Vec<PerformanceRow> {
    let (counts, agents) = count_activity(base);

    if calendar.is_empty() {
        debug!("empty calendar; emitting raw activity counts");
        let sorted: BTreeMap<(NaiveDate, &str), i64> = counts.into_iter().collect();
        return sorted
            .into_iter()
            .map(|((date, agent), count)| PerformanceRow {
                date,
                agent: agent.to_string(),
                count,
            })
            .collect();
    }

    let rows: Vec<PerformanceRow> = calendar
        .iter()
        .flat_map(|date| {
            let counts = &counts;
            agents.iter().map(move |agent| PerformanceRow {
                date: *date,
                agent: agent.to_string(),
                count: counts.get(&(*date, *agent)).copied().unwrap_or(0),
            })
        })
        .collect();

    let placed: i64 = rows.iter().map(|r| r.count).sum();
    let recorded: i64 = counts.values().sum();
    if placed < recorded {
        warn!(
            unplaced = recorded - placed,
            "activity on non-business days left out of the performance table"
        );
    }
    debug!(
        days = calendar.len(),
        agents = agents.len(),
        rows = rows.len(),
        "densified performance table"
    );
    rows
}

impl TableRow for PerformanceRow {
    fn schema() -> ArrowSchema {
        ArrowSchema::new(vec![
            Field::new(columns::EXTRACTION_DATE, DataType::Date32, false),
            Field::new(columns::RESPONSIBLE_AGENT, DataType::Utf8, false),
            Field::new(columns::ACTIVITY_COUNT, DataType::Int64, false),
        ])
    }

    fn to_arrays(rows: &[Self]) -> Vec<ArrayRef> {
        vec![
            date_array(rows.iter().map(|r| Some(&r.date))),
            Arc::new(StringArray::from_iter_values(
                rows.iter().map(|r| r.agent.as_str()),
            )),
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.count))),
        ]
    }
}
