use anyhow::{Context, Result};
use csv::{ReaderBuilder, Trim};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs, io::Cursor, path::Path};
use tracing::{debug, info};

use crate::error::PipelineError;
use crate::schema::columns;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// One legal process snapshot, exactly as read from the input file.
/// Empty cells are `None`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "Data da Extração")]
    pub extraction_date: Option<String>,
    #[serde(rename = "Número")]
    pub process_number: Option<String>,
    #[serde(rename = "Classe")]
    pub case_class: Option<String>,
    #[serde(rename = "Procurador Responsável")]
    pub responsible_agent: Option<String>,
    #[serde(rename = "Relator")]
    pub rapporteur: Option<String>,
    #[serde(rename = "Órgão Julgador")]
    pub judging_unit: Option<String>,
    #[serde(rename = "Valor da causa")]
    pub claim_value: Option<String>,
    #[serde(rename = "UF")]
    pub jurisdiction: Option<String>,
    #[serde(rename = "Polo da PFGN")]
    pub stakeholder_role: Option<String>,
    #[serde(rename = "Situação do processo")]
    pub status: Option<String>,
    #[serde(rename = "Código Matéria SAJ", default)]
    pub subject_codes: Option<String>,
}

impl RawRecord {
    /// Deduplication key: (process number, case class).
    pub fn dedupe_key(&self) -> (Option<&str>, Option<&str>) {
        (self.process_number.as_deref(), self.case_class.as_deref())
    }
}

/// Read the input CSV into raw records.
///
/// - A missing file is reported as [`PipelineError::MissingInput`].
/// - A leading UTF-8 BOM is stripped.
/// - Every column in [`columns::REQUIRED`] must be in the header.
#[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn load_raw_table<P: AsRef<Path>>(path: P) -> Result<Vec<RawRecord>> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(PipelineError::MissingInput(path.to_path_buf()).into());
    }
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let records = parse_raw_csv(&bytes)
        .with_context(|| format!("parsing {}", path.display()))?;
    info!(records = records.len(), "loaded raw records");
    Ok(records)
}

/// Parse an in-memory CSV buffer. See [`load_raw_table`].
pub fn parse_raw_csv(bytes: &[u8]) -> Result<Vec<RawRecord>> {
    let data = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::Headers)
        .from_reader(Cursor::new(data));

    let headers = rdr.headers().map_err(PipelineError::from)?.clone();
    for required in columns::REQUIRED {
        if !headers.iter().any(|h| h == required) {
            return Err(PipelineError::MissingColumn(required.to_string()).into());
        }
    }
    if !headers.iter().any(|h| h == columns::SUBJECT_CODES) {
        debug!("no subject-matter column; subject dimension will be empty");
    }

    let mut records = Vec::new();
    for (idx, result) in rdr.deserialize::<RawRecord>().enumerate() {
        let record = result
            .map_err(PipelineError::from)
            .with_context(|| format!("CSV parse error at record {}", idx))?;
        records.push(record);
    }
    Ok(records)
}

/// Keep only the last occurrence of each (process number, case class),
/// preserving the input order of the survivors.
pub fn dedupe_keep_last(records: Vec<RawRecord>) -> Vec<RawRecord> {
    let keep: Vec<bool> = {
        let last_index: HashMap<(Option<&str>, Option<&str>), usize> = records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.dedupe_key(), i))
            .collect();
        records
            .iter()
            .enumerate()
            .map(|(i, r)| last_index.get(&r.dedupe_key()) == Some(&i))
            .collect()
    };

    let before = records.len();
    let kept: Vec<RawRecord> = records
        .into_iter()
        .zip(keep)
        .filter_map(|(r, k)| k.then_some(r))
        .collect();
    if kept.len() < before {
        debug!(dropped = before - kept.len(), "removed duplicate processes");
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    const HEADER: &str = "Data da Extração,Número,Classe,Procurador Responsável,Relator,Órgão Julgador,Valor da causa,UF,Polo da PFGN,Situação do processo,Código Matéria SAJ";

    #[test]
    fn test_parse_with_bom_and_multiline_cells() -> Result<()> {
        let body = format!(
            "{HEADER}\n15/01/2024,123-45,Execução Fiscal,Ana,Des. Rui,1T,\"R$ 1.000,00\nR$ 1.200,00\",\"DF\nSP\",Autor,CONCLUÍDO - SENTENÇA,1.2.3|4.5.6\n"
        );
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice(body.as_bytes());

        let records = parse_raw_csv(&bytes)?;
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.extraction_date.as_deref(), Some("15/01/2024"));
        assert_eq!(r.claim_value.as_deref(), Some("R$ 1.000,00\nR$ 1.200,00"));
        assert_eq!(r.jurisdiction.as_deref(), Some("DF\nSP"));
        assert_eq!(r.subject_codes.as_deref(), Some("1.2.3|4.5.6"));
        Ok(())
    }

    #[test]
    fn test_empty_cells_are_none() -> Result<()> {
        let body = format!("{HEADER}\n,,,,,,,,,,\n");
        let records = parse_raw_csv(body.as_bytes())?;
        assert_eq!(records, vec![RawRecord::default()]);
        Ok(())
    }

    #[test]
    fn test_subject_column_is_optional() -> Result<()> {
        let header = HEADER.trim_end_matches(",Código Matéria SAJ");
        let body = format!("{header}\n15/01/2024,1,C,Ana,Rel,1T,\"R$ 1,00\",DF,Réu,TRIAGEM\n");
        let records = parse_raw_csv(body.as_bytes())?;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].subject_codes, None);
        Ok(())
    }

    #[test]
    fn test_missing_required_column() {
        let body = "Data da Extração,Número\n15/01/2024,1\n";
        let err = parse_raw_csv(body.as_bytes()).unwrap_err();
        match err.downcast_ref::<PipelineError>() {
            Some(PipelineError::MissingColumn(col)) => assert_eq!(col, "Classe"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_missing_input_is_distinct() {
        let dir = tempdir().unwrap();
        let err = load_raw_table(dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::MissingInput(_))
        ));
    }

    #[test]
    fn test_load_from_disk() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("input.csv");
        let mut f = fs::File::create(&path)?;
        f.write_all(UTF8_BOM)?;
        writeln!(f, "{HEADER}")?;
        writeln!(f, "15/01/2024,1,C,Ana,Rel,1T,\"R$ 1,00\",DF,Réu,TRIAGEM,1.1.1")?;
        writeln!(f, "16/01/2024,2,C,Bia,Rel,2T,\"R$ 2,00\",SP,Autor,TRIAGEM,")?;
        drop(f);

        let records = load_raw_table(&path)?;
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].subject_codes, None);
        Ok(())
    }

    fn rec(number: &str, class: &str, agent: &str) -> RawRecord {
        RawRecord {
            process_number: Some(number.to_string()),
            case_class: Some(class.to_string()),
            responsible_agent: Some(agent.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_dedupe_keeps_last_in_order() {
        let records = vec![
            rec("1", "A", "first"),
            rec("2", "A", "only"),
            rec("1", "B", "other class"),
            rec("1", "A", "second"),
        ];
        let kept = dedupe_keep_last(records);
        let agents: Vec<_> = kept
            .iter()
            .map(|r| r.responsible_agent.as_deref().unwrap())
            .collect();
        assert_eq!(agents, vec!["only", "other class", "second"]);
    }

    #[test]
    fn test_dedupe_treats_missing_keys_as_equal() {
        let a = RawRecord {
            responsible_agent: Some("a".into()),
            ..Default::default()
        };
        let b = RawRecord {
            responsible_agent: Some("b".into()),
            ..Default::default()
        };
        let kept = dedupe_keep_last(vec![a, b.clone()]);
        assert_eq!(kept, vec![b]);
    }
}
