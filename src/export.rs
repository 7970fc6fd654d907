use anyhow::{Context, Result};
use arrow::{csv::WriterBuilder, record_batch::RecordBatch};
use clap::ValueEnum;
use parquet::{arrow::ArrowWriter, basic::Compression, file::properties::WriterProperties};
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

use crate::error::PipelineError;
use crate::pipeline::OutputTable;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// UTF-8 CSV with a byte-order mark
    #[default]
    Csv,
    /// Snappy-compressed Parquet
    Parquet,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Parquet => "parquet",
        }
    }
}

/// Write one table to `path`.
fn write_table(batch: &RecordBatch, path: &Path, format: ExportFormat) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut out = BufWriter::new(file);
    match format {
        ExportFormat::Csv => {
            out.write_all(UTF8_BOM)?;
            let mut writer = WriterBuilder::new().with_header(true).build(&mut out);
            writer.write(batch).map_err(PipelineError::from)?;
        }
        ExportFormat::Parquet => {
            let props = WriterProperties::builder()
                .set_compression(Compression::SNAPPY)
                .build();
            let mut writer = ArrowWriter::try_new(&mut out, batch.schema(), Some(props))
                .map_err(PipelineError::from)?;
            writer.write(batch).map_err(PipelineError::from)?;
            writer.close().map_err(PipelineError::from)?;
        }
    }
    out.flush()
        .with_context(|| format!("flushing {}", path.display()))?;
    Ok(())
}

/// Export every non-empty table into `out_dir` as `<name>.<ext>`.
///
/// Tables are first written to `.tmp` files and only renamed into place once
/// all of them succeeded, so a failure leaves no partial table set behind.
/// Returns the final paths, in table order.
#[tracing::instrument(level = "info", skip(tables, out_dir), fields(dir = %out_dir.as_ref().display()))]
pub fn export_tables<P: AsRef<Path>>(
    tables: &[(OutputTable, RecordBatch)],
    out_dir: P,
    format: ExportFormat,
) -> Result<Vec<PathBuf>> {
    let out_dir = out_dir.as_ref();
    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;

    let mut staged: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(tables.len());
    for (table, batch) in tables {
        if batch.num_rows() == 0 {
            debug!(table = table.as_str(), "empty table, not written");
            continue;
        }
        let final_path = out_dir.join(format!("{}.{}", table.as_str(), format.extension()));
        let tmp_path = out_dir.join(format!("{}.{}.tmp", table.as_str(), format.extension()));
        staged.push((tmp_path.clone(), final_path));

        if let Err(e) = write_table(batch, &tmp_path, format) {
            discard(&staged);
            return Err(e.context(format!("writing table {}", table.as_str())));
        }
    }

    for (i, (tmp, final_path)) in staged.iter().enumerate() {
        if let Err(e) = fs::rename(tmp, final_path) {
            discard(&staged[i..]);
            retract(&staged[..i]);
            return Err(anyhow::Error::new(e).context(format!(
                "renaming {} -> {}",
                tmp.display(),
                final_path.display()
            )));
        }
    }

    for (_, final_path) in &staged {
        info!(path = %final_path.display(), "wrote table");
    }
    Ok(staged.into_iter().map(|(_, p)| p).collect())
}

/// Best-effort removal of staged temporaries.
fn discard(staged: &[(PathBuf, PathBuf)]) {
    for (tmp, _) in staged {
        if tmp.exists() {
            if let Err(e) = fs::remove_file(tmp) {
                warn!("failed to remove {}: {}", tmp.display(), e);
            }
        }
    }
}

/// Remove tables already renamed into place by a run that then failed.
fn retract(renamed: &[(PathBuf, PathBuf)]) {
    for (_, final_path) in renamed {
        if let Err(e) = fs::remove_file(final_path) {
            warn!("failed to remove {}: {}", final_path.display(), e);
        }
    }
}
