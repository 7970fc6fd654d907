use clap::Parser;
use std::path::PathBuf;

use crate::export::ExportFormat;

/// Clean a batch of legal-process records and export the reporting tables.
#[derive(Debug, Clone, Parser)]
#[command(name = "casetables", version, about)]
pub struct Config {
    /// Raw input CSV
    #[arg(
        short,
        long,
        env = "CASETABLES_INPUT",
        default_value = "dados_brutos_simulados.csv"
    )]
    pub input: PathBuf,

    /// Directory the tables are written to (created if absent)
    #[arg(
        short,
        long,
        env = "CASETABLES_OUTPUT_DIR",
        default_value = "output_relatorios"
    )]
    pub output_dir: PathBuf,

    /// Export file format
    #[arg(
        short,
        long,
        env = "CASETABLES_FORMAT",
        value_enum,
        default_value_t = ExportFormat::Csv
    )]
    pub format: ExportFormat,
}
