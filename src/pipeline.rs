use anyhow::Result;
use arrow::record_batch::RecordBatch;
use std::path::Path;
use tracing::info;

use crate::process::{
    aggregate::{performance, PerformanceRow},
    calendar::business_days,
    enrich::{enrich_records, EnrichedRecord},
    raw_table::{dedupe_keep_last, load_raw_table, RawRecord},
    reshape::{
        explode_subjects, filter_roles, unpivot_jurisdictions, JurisdictionRow, RoleRow,
        SubjectRow,
    },
};
use crate::schema::to_record_batch;

/// The named tables a run produces, in export order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OutputTable {
    Performance,
    Base,
    Subjects,
    Jurisdictions,
    Roles,
}

impl OutputTable {
    pub const ALL: [OutputTable; 5] = [
        OutputTable::Performance,
        OutputTable::Base,
        OutputTable::Subjects,
        OutputTable::Jurisdictions,
        OutputTable::Roles,
    ];

    /// File stem the table is exported under.
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputTable::Performance => "performance",
            OutputTable::Base => "base_analitica",
            OutputTable::Subjects => "dim_materias_mae",
            OutputTable::Jurisdictions => "dim_regionalizacao_uf",
            OutputTable::Roles => "dim_polo_pgfn",
        }
    }
}

/// Everything one run derives. Each run owns its own tables.
#[derive(Debug)]
pub struct PipelineOutput {
    pub calendar: Vec<chrono::NaiveDate>,
    pub performance: Vec<PerformanceRow>,
    pub base: Vec<EnrichedRecord>,
    pub subjects: Vec<SubjectRow>,
    pub jurisdictions: Vec<JurisdictionRow>,
    pub roles: Vec<RoleRow>,
}

impl PipelineOutput {
    pub fn row_count(&self, table: OutputTable) -> usize {
        match table {
            OutputTable::Performance => self.performance.len(),
            OutputTable::Base => self.base.len(),
            OutputTable::Subjects => self.subjects.len(),
            OutputTable::Jurisdictions => self.jurisdictions.len(),
            OutputTable::Roles => self.roles.len(),
        }
    }

    pub fn to_batch(&self, table: OutputTable) -> Result<RecordBatch> {
        match table {
            OutputTable::Performance => to_record_batch(&self.performance),
            OutputTable::Base => to_record_batch(&self.base),
            OutputTable::Subjects => to_record_batch(&self.subjects),
            OutputTable::Jurisdictions => to_record_batch(&self.jurisdictions),
            OutputTable::Roles => to_record_batch(&self.roles),
        }
    }

    /// All named tables as Arrow batches, in [`OutputTable::ALL`] order.
    pub fn tables(&self) -> Result<Vec<(OutputTable, RecordBatch)>> {
        OutputTable::ALL
            .iter()
            .map(|t| Ok((*t, self.to_batch(*t)?)))
            .collect()
    }
}

/// Run every transformation stage over an in-memory record set.
#[tracing::instrument(level = "info", skip(raw), fields(rows = raw.len()))]
pub fn run(raw: Vec<RawRecord>) -> PipelineOutput {
    let deduped = dedupe_keep_last(raw);
    let base = enrich_records(deduped);

    let calendar = business_days(base.iter().filter_map(|r| r.extraction_date));
    let performance = performance(&base, &calendar);
    let subjects = explode_subjects(&base);
    let jurisdictions = unpivot_jurisdictions(&base);
    let roles = filter_roles(&base);

    let out = PipelineOutput {
        calendar,
        performance,
        base,
        subjects,
        jurisdictions,
        roles,
    };
    for t in OutputTable::ALL {
        info!(table = t.as_str(), rows = out.row_count(t), "table ready");
    }
    out
}

/// Load the input file and run the pipeline over it.
pub fn run_file<P: AsRef<Path>>(input: P) -> Result<PipelineOutput> {
    let raw = load_raw_table(input)?;
    Ok(run(raw))
}
