use once_cell::sync::Lazy;
use tracing::debug;
use std::collections::HashMap;

use crate::process::normalize::unit_key;

/// Canonical judging-unit labels and the spellings seen for each of them.
/// Keys go through [`unit_key`] when the table is built, so they can be
/// authored the way they show up in the source systems.
const UNIT_VARIANTS: &[(&str, &[&str])] = &[
    ("PRIMEIRA TURMA", &["1T", "T1", "Primeira Turma", "1ª Turma"]),
    ("SEGUNDA TURMA", &["2T", "T2", "Segunda Turma", "2ª Turma"]),
    ("TERCEIRA TURMA", &["3T", "T3", "Terceira Turma", "3ª Turma"]),
    ("QUARTA TURMA", &["4T", "T4", "Quarta Turma", "4ª Turma"]),
    ("QUINTA TURMA", &["5T", "T5", "Quinta Turma", "5ª Turma"]),
    ("SEXTA TURMA", &["6T", "T6", "Sexta Turma", "6ª Turma"]),
    ("CORTE ESPECIAL", &["CE", "Corte Especial"]),
    ("PRIMEIRA SEÇÃO", &["1S", "S1", "Primeira Seção", "1ª Seção"]),
    ("SEGUNDA SEÇÃO", &["2S", "S2", "Segunda Seção", "2ª Seção"]),
    ("TERCEIRA SEÇÃO", &["3S", "S3", "Terceira Seção", "3ª Seção"]),
    ("QUARTA SEÇÃO", &["4S", "S4", "Quarta Seção", "4ª Seção"]),
    ("QUINTA SEÇÃO", &["5S", "S5", "Quinta Seção", "5ª Seção"]),
];

/// Read-only map from normalized judging-unit spellings to canonical labels.
pub struct UnitLookup {
    by_key: HashMap<String, &'static str>,
}

impl UnitLookup {
    fn build(variants: &[(&'static str, &[&str])]) -> Self {
        let mut by_key = HashMap::new();
        for (canonical, spellings) in variants {
            by_key.insert(unit_key(canonical), *canonical);
            for s in spellings.iter() {
                by_key.insert(unit_key(s), *canonical);
            }
        }
        Self { by_key }
    }

    /// Canonical label for `raw`, or `None` when the spelling is unknown.
    pub fn resolve(&self, raw: &str) -> Option<&'static str> {
        self.by_key.get(&unit_key(raw)).copied()
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

pub static UNIT_LOOKUP: Lazy<UnitLookup> = Lazy::new(|| {
    let lookup = UnitLookup::build(UNIT_VARIANTS);
    debug!(keys = lookup.len(), labels = UNIT_VARIANTS.len(), "unit lookup built");
    lookup
});
