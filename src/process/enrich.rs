use arrow::{
    array::{ArrayRef, Float64Array, StringArray},
    datatypes::{DataType, Field, Schema as ArrowSchema},
};
use chrono::NaiveDate;
use rayon::prelude::*;
use std::sync::Arc;
use tracing::{debug, info};

use crate::process::{
    date_parser::parse_extraction_date,
    lookup::UNIT_LOOKUP,
    normalize::{parse_claim_value, split_jurisdiction, ProcessStatus},
    raw_table::RawRecord,
};
use crate::schema::{
    columns,
    table::{date_array, TableRow},
};

/// Substring in a rapporteur name marking the chair of a judging unit.
pub const PRESIDING_OFFICER_MARKER: &str = "PRESIDENTE";

/// A raw record plus every derived field. Built once, never mutated.
#[derive(Clone, Debug, PartialEq)]
pub struct EnrichedRecord {
    pub raw: RawRecord,
    pub extraction_date: Option<NaiveDate>,
    pub claim_value: f64,
    pub standardized_unit: String,
    pub jurisdiction_primary: String,
    pub jurisdiction_secondary: String,
    pub status: ProcessStatus,
}

impl EnrichedRecord {
    pub fn process_number(&self) -> Option<&str> {
        self.raw.process_number.as_deref()
    }

    pub fn responsible_agent(&self) -> Option<&str> {
        self.raw.responsible_agent.as_deref()
    }
}

/// Resolve the judging unit: lookup table, then the rapporteur when they
/// preside over the unit, then the raw label as given.
pub fn standardize_unit(judging_unit: Option<&str>, rapporteur: Option<&str>) -> String {
    let raw = judging_unit.unwrap_or_default();
    if let Some(canonical) = UNIT_LOOKUP.resolve(raw) {
        return canonical.to_string();
    }
    match rapporteur {
        Some(name) if name.to_uppercase().contains(PRESIDING_OFFICER_MARKER) => name.to_string(),
        _ => raw.to_string(),
    }
}

/// Derive every field of one record. Looks at nothing but `raw`.
pub fn enrich_record(raw: RawRecord) -> EnrichedRecord {
    let extraction_date = raw
        .extraction_date
        .as_deref()
        .and_then(parse_extraction_date);
    let claim_value = parse_claim_value(raw.claim_value.as_deref());
    let standardized_unit =
        standardize_unit(raw.judging_unit.as_deref(), raw.rapporteur.as_deref());
    let (jurisdiction_primary, jurisdiction_secondary) =
        split_jurisdiction(raw.jurisdiction.as_deref());
    let status = ProcessStatus::from_raw(raw.status.as_deref());

    EnrichedRecord {
        raw,
        extraction_date,
        claim_value,
        standardized_unit,
        jurisdiction_primary,
        jurisdiction_secondary,
        status,
    }
}

/// Enrich the whole batch. Rows are independent, so they are mapped in
/// parallel; output order matches input order.
#[tracing::instrument(level = "info", skip(records), fields(rows = records.len()))]
pub fn enrich_records(records: Vec<RawRecord>) -> Vec<EnrichedRecord> {
    let enriched: Vec<EnrichedRecord> = records.into_par_iter().map(enrich_record).collect();

    let undated = enriched
        .iter()
        .filter(|r| r.extraction_date.is_none())
        .count();
    if undated > 0 {
        debug!(undated, "records without a valid extraction date");
    }
    info!(rows = enriched.len(), "enriched base table");
    enriched
}

/// The analytic base table projection.
impl TableRow for EnrichedRecord {
    fn schema() -> ArrowSchema {
        ArrowSchema::new(vec![
            Field::new(columns::EXTRACTION_DATE, DataType::Date32, true),
            Field::new(columns::PROCESS_NUMBER, DataType::Utf8, true),
            Field::new(columns::CASE_CLASS, DataType::Utf8, true),
            Field::new(columns::RESPONSIBLE_AGENT, DataType::Utf8, true),
            Field::new(columns::STANDARDIZED_UNIT, DataType::Utf8, false),
            Field::new(columns::CLAIM_VALUE, DataType::Float64, false),
            Field::new(columns::NORMALIZED_STATUS, DataType::Utf8, false),
            Field::new(columns::JURISDICTION_PRIMARY, DataType::Utf8, false),
            Field::new(columns::JURISDICTION_SECONDARY, DataType::Utf8, false),
        ])
    }

    fn to_arrays(rows: &[Self]) -> Vec<ArrayRef> {
        vec![
            date_array(rows.iter().map(|r| r.extraction_date.as_ref())),
            Arc::new(StringArray::from_iter(
                rows.iter().map(|r| r.raw.process_number.as_deref()),
            )),
            Arc::new(StringArray::from_iter(
                rows.iter().map(|r| r.raw.case_class.as_deref()),
            )),
            Arc::new(StringArray::from_iter(
                rows.iter().map(|r| r.raw.responsible_agent.as_deref()),
            )),
            Arc::new(StringArray::from_iter_values(
                rows.iter().map(|r| r.standardized_unit.as_str()),
            )),
            Arc::new(Float64Array::from_iter_values(
                rows.iter().map(|r| r.claim_value),
            )),
            Arc::new(StringArray::from_iter_values(
                rows.iter().map(|r| r.status.as_str()),
            )),
            Arc::new(StringArray::from_iter_values(
                rows.iter().map(|r| r.jurisdiction_primary.as_str()),
            )),
            Arc::new(StringArray::from_iter_values(
                rows.iter().map(|r| r.jurisdiction_secondary.as_str()),
            )),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::to_record_batch;
    use arrow::array::{Array, Date32Array};

    fn raw(unit: &str, rapporteur: &str) -> RawRecord {
        RawRecord {
            extraction_date: Some("15/01/2024".into()),
            process_number: Some("0001".into()),
            case_class: Some("Execução Fiscal".into()),
            responsible_agent: Some("Ana Souza".into()),
            rapporteur: Some(rapporteur.into()),
            judging_unit: Some(unit.into()),
            claim_value: Some("R$ 1.000,00\nR$ 1.200,00".into()),
            jurisdiction: Some("DF\nSP".into()),
            stakeholder_role: Some("Autor".into()),
            status: Some("CONCLUÍDO - ACÓRDÃO".into()),
            subject_codes: Some("1.2.3|4.5.6".into()),
        }
    }

    #[test]
    fn test_enrich_record_derives_every_field() {
        let r = enrich_record(raw("1ª Turma", "Des. Rui"));
        assert_eq!(r.extraction_date, NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(r.claim_value, 1200.0);
        assert_eq!(r.standardized_unit, "PRIMEIRA TURMA");
        assert_eq!(r.jurisdiction_primary, "DF");
        assert_eq!(r.jurisdiction_secondary, "SP");
        assert_eq!(r.status, ProcessStatus::Concluded);
    }

    #[test]
    fn test_unit_fallback_to_presiding_rapporteur() {
        let r = enrich_record(raw("Não Informado", "Min. Presidente Costa"));
        assert_eq!(r.standardized_unit, "Min. Presidente Costa");
    }

    #[test]
    fn test_unit_fallback_to_raw_label() {
        let r = enrich_record(raw("Não Informado", "Des. Rui"));
        assert_eq!(r.standardized_unit, "Não Informado");
    }

    #[test]
    fn test_lookup_hit_beats_presiding_rapporteur() {
        let r = enrich_record(raw("T2", "PRESIDENTE da Turma"));
        assert_eq!(r.standardized_unit, "SEGUNDA TURMA");
    }

    #[test]
    fn test_missing_unit_never_null() {
        assert_eq!(standardize_unit(None, None), "");
        assert_eq!(standardize_unit(None, Some("presidente x")), "presidente x");
    }

    #[test]
    fn test_bad_fields_degrade_without_failing() {
        let mut bad = raw("1T", "Des. Rui");
        bad.extraction_date = Some("32/01/2024".into());
        bad.claim_value = Some("valor ilegível".into());
        bad.jurisdiction = None;
        bad.status = None;
        let r = enrich_record(bad);
        assert_eq!(r.extraction_date, None);
        assert_eq!(r.claim_value, 0.0);
        assert_eq!(r.jurisdiction_primary, "");
        assert_eq!(r.jurisdiction_secondary, "");
        assert_eq!(r.status, ProcessStatus::Pending);
    }

    #[test]
    fn test_enrich_records_preserves_order() {
        let records: Vec<RawRecord> = (0..200)
            .map(|i| {
                let mut r = raw("1T", "Des. Rui");
                r.process_number = Some(format!("{i:04}"));
                r
            })
            .collect();
        let enriched = enrich_records(records);
        for (i, r) in enriched.iter().enumerate() {
            assert_eq!(r.process_number(), Some(format!("{i:04}").as_str()));
        }
    }

    #[test]
    fn test_base_table_batch() -> anyhow::Result<()> {
        let mut undated = raw("1T", "Des. Rui");
        undated.extraction_date = None;
        let rows = enrich_records(vec![raw("1T", "Des. Rui"), undated]);
        let batch = to_record_batch(&rows)?;
        assert_eq!(batch.num_rows(), 2);
        assert_eq!(batch.num_columns(), 9);
        let dates = batch
            .column(0)
            .as_any()
            .downcast_ref::<Date32Array>()
            .unwrap();
        assert!(dates.is_valid(0));
        assert!(dates.is_null(1));
        assert_eq!(batch.schema().field(4).name(), columns::STANDARDIZED_UNIT);
        Ok(())
    }
}
