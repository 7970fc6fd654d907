//! Secondary tables derived from the enriched base table: the exploded
//! subject-matter dimension, the unpivoted jurisdiction dimension and the
//! stakeholder-role projection.

use arrow::{
    array::{ArrayRef, Float64Array, StringArray},
    datatypes::{DataType, Field, Schema as ArrowSchema},
};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::debug;

use crate::process::enrich::EnrichedRecord;
use crate::schema::{
    columns,
    table::{date_array, TableRow},
};

const SUBJECT_SEPARATOR: char = '|';

/// Roles kept in the stakeholder dimension, compared upper-cased.
pub const RELEVANT_ROLES: [&str; 2] = ["AUTOR", "RÉU"];

#[derive(Clone, Debug, PartialEq)]
pub struct SubjectRow {
    pub extraction_date: NaiveDate,
    pub process_number: String,
    pub standardized_unit: String,
    pub subject_code: String,
}

/// Which wide column a jurisdiction observation came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JurisdictionSlot {
    Primary,
    Secondary,
}

impl JurisdictionSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            JurisdictionSlot::Primary => columns::JURISDICTION_PRIMARY,
            JurisdictionSlot::Secondary => columns::JURISDICTION_SECONDARY,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct JurisdictionRow {
    pub extraction_date: Option<NaiveDate>,
    pub process_number: Option<String>,
    pub claim_value: f64,
    pub slot: JurisdictionSlot,
    pub code: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RoleRow {
    pub extraction_date: Option<NaiveDate>,
    pub process_number: Option<String>,
    pub role: String,
}

/// One row per `|`-separated subject code. Records with no subject value, no
/// valid date or no process number produce no rows.
pub fn explode_subjects(base: &[EnrichedRecord]) -> Vec<SubjectRow> {
    let rows: Vec<SubjectRow> = base
        .iter()
        .filter_map(|r| {
            let date = r.extraction_date?;
            let number = r.process_number()?;
            let codes = r.raw.subject_codes.as_deref()?;
            Some(codes.split(SUBJECT_SEPARATOR).map(move |code| SubjectRow {
                extraction_date: date,
                process_number: number.to_string(),
                standardized_unit: r.standardized_unit.clone(),
                subject_code: code.to_string(),
            }))
        })
        .flatten()
        .collect();
    debug!(rows = rows.len(), "subject-matter dimension");
    rows
}

/// Primary and secondary jurisdiction codes as one long column. All primary
/// observations come first, then all secondary ones; empty codes are skipped.
pub fn unpivot_jurisdictions(base: &[EnrichedRecord]) -> Vec<JurisdictionRow> {
    let observations = |slot: JurisdictionSlot| {
        base.iter().filter_map(move |r| {
            let code = match slot {
                JurisdictionSlot::Primary => &r.jurisdiction_primary,
                JurisdictionSlot::Secondary => &r.jurisdiction_secondary,
            };
            (!code.is_empty()).then(|| JurisdictionRow {
                extraction_date: r.extraction_date,
                process_number: r.raw.process_number.clone(),
                claim_value: r.claim_value,
                slot,
                code: code.clone(),
            })
        })
    };
    let rows: Vec<JurisdictionRow> = observations(JurisdictionSlot::Primary)
        .chain(observations(JurisdictionSlot::Secondary))
        .collect();
    debug!(rows = rows.len(), "jurisdiction dimension");
    rows
}

/// Records whose stakeholder role is one of [`RELEVANT_ROLES`].
pub fn filter_roles(base: &[EnrichedRecord]) -> Vec<RoleRow> {
    let rows: Vec<RoleRow> = base
        .iter()
        .filter_map(|r| {
            let role = r.raw.stakeholder_role.as_deref()?;
            let upper = role.to_uppercase();
            RELEVANT_ROLES
                .contains(&upper.as_str())
                .then(|| RoleRow {
                    extraction_date: r.extraction_date,
                    process_number: r.raw.process_number.clone(),
                    role: role.to_string(),
                })
        })
        .collect();
    debug!(rows = rows.len(), "stakeholder-role dimension");
    rows
}

impl TableRow for SubjectRow {
    fn schema() -> ArrowSchema {
        ArrowSchema::new(vec![
            Field::new(columns::EXTRACTION_DATE, DataType::Date32, false),
            Field::new(columns::PROCESS_NUMBER, DataType::Utf8, false),
            Field::new(columns::STANDARDIZED_UNIT, DataType::Utf8, false),
            Field::new(columns::SUBJECT_CODE, DataType::Utf8, false),
        ])
    }

    fn to_arrays(rows: &[Self]) -> Vec<ArrayRef> {
        vec![
            date_array(rows.iter().map(|r| Some(&r.extraction_date))),
            Arc::new(StringArray::from_iter_values(
                rows.iter().map(|r| r.process_number.as_str()),
            )),
            Arc::new(StringArray::from_iter_values(
                rows.iter().map(|r| r.standardized_unit.as_str()),
            )),
            Arc::new(StringArray::from_iter_values(
                rows.iter().map(|r| r.subject_code.as_str()),
            )),
        ]
    }
}

impl TableRow for JurisdictionRow {
    fn schema() -> ArrowSchema {
        ArrowSchema::new(vec![
            Field::new(columns::EXTRACTION_DATE, DataType::Date32, true),
            Field::new(columns::PROCESS_NUMBER, DataType::Utf8, true),
            Field::new(columns::CLAIM_VALUE, DataType::Float64, false),
            Field::new(columns::JURISDICTION_SOURCE, DataType::Utf8, false),
            Field::new(columns::JURISDICTION_CODE, DataType::Utf8, false),
        ])
    }

    fn to_arrays(rows: &[Self]) -> Vec<ArrayRef> {
        vec![
            date_array(rows.iter().map(|r| r.extraction_date.as_ref())),
            Arc::new(StringArray::from_iter(
                rows.iter().map(|r| r.process_number.as_deref()),
            )),
            Arc::new(Float64Array::from_iter_values(
                rows.iter().map(|r| r.claim_value),
            )),
            Arc::new(StringArray::from_iter_values(
                rows.iter().map(|r| r.slot.as_str()),
            )),
            Arc::new(StringArray::from_iter_values(
                rows.iter().map(|r| r.code.as_str()),
            )),
        ]
    }
}

impl TableRow for RoleRow {
    fn schema() -> ArrowSchema {
        ArrowSchema::new(vec![
            Field::new(columns::EXTRACTION_DATE, DataType::Date32, true),
            Field::new(columns::PROCESS_NUMBER, DataType::Utf8, true),
            Field::new(columns::STAKEHOLDER_ROLE, DataType::Utf8, false),
        ])
    }

    fn to_arrays(rows: &[Self]) -> Vec<ArrayRef> {
        vec![
            date_array(rows.iter().map(|r| r.extraction_date.as_ref())),
            Arc::new(StringArray::from_iter(
                rows.iter().map(|r| r.process_number.as_deref()),
            )),
            Arc::new(StringArray::from_iter_values(
                rows.iter().map(|r| r.role.as_str()),
            )),
        ]
    }
}
