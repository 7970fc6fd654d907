//! Column names as they appear in the input header and in the exported tables.
//!
//! Input and output share names where a value passes through unchanged, so a
//! downstream report can join the dimensions back onto the base table.

// ----- input header -----
pub const EXTRACTION_DATE: &str = "Data da Extração";
pub const PROCESS_NUMBER: &str = "Número";
pub const CASE_CLASS: &str = "Classe";
pub const RESPONSIBLE_AGENT: &str = "Procurador Responsável";
pub const RAPPORTEUR: &str = "Relator";
pub const JUDGING_UNIT: &str = "Órgão Julgador";
pub const CLAIM_VALUE: &str = "Valor da causa";
pub const JURISDICTION: &str = "UF";
pub const STAKEHOLDER_ROLE: &str = "Polo da PFGN";
pub const PROCESS_STATUS: &str = "Situação do processo";
pub const SUBJECT_CODES: &str = "Código Matéria SAJ";

/// Header columns the loader refuses to run without. The subject-matter column
/// is optional.
pub const REQUIRED: [&str; 10] = [
    EXTRACTION_DATE,
    PROCESS_NUMBER,
    CASE_CLASS,
    RESPONSIBLE_AGENT,
    RAPPORTEUR,
    JUDGING_UNIT,
    CLAIM_VALUE,
    JURISDICTION,
    STAKEHOLDER_ROLE,
    PROCESS_STATUS,
];

// ----- derived -----
pub const STANDARDIZED_UNIT: &str = "Órgão Padronizado";
pub const NORMALIZED_STATUS: &str = "Status Normalizado";
pub const JURISDICTION_PRIMARY: &str = "UF_1";
pub const JURISDICTION_SECONDARY: &str = "UF_2";
pub const SUBJECT_CODE: &str = "Lista_Materias";
pub const JURISDICTION_SOURCE: &str = "variable";
pub const JURISDICTION_CODE: &str = "UF_Unificada";
pub const ACTIVITY_COUNT: &str = "Qtd_Processos";
