//! Writes a synthetic batch of "dirty" legal-process records in the layout the
//! `casetables` loader expects: currency histories and multi-state cells joined
//! with newlines, judging units spelled a dozen different ways.

use anyhow::{Context, Result};
use casetables::process::raw_table::RawRecord;
use chrono::{Duration, Local, NaiveDate};
use clap::Parser;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
/// Furthest back an extraction date is drawn, about a century.
const MAX_DAYS_BACK: i64 = 36_500;

const FIRST_NAMES: &[&str] = &[
    "Ana", "Bruno", "Carla", "Diego", "Elisa", "Fábio", "Gabriela", "Heitor", "Isabela",
    "João", "Larissa", "Marcos", "Natália", "Otávio", "Paula", "Rafael",
];
const LAST_NAMES: &[&str] = &[
    "Almeida", "Barbosa", "Cardoso", "Duarte", "Esteves", "Ferreira", "Gomes", "Lima",
    "Moreira", "Nogueira", "Oliveira", "Pereira", "Ribeiro", "Souza", "Teixeira",
];

const UNIT_SPELLINGS: &[&str] = &[
    "1T", "T1", "1ª Turma", "PRIMEIRA TURMA", "PRIMEIRATURMA", "1  Turma",
    "2T", "T2", "2ª Turma", "SEGUNDA TURMA", "SEGUNDATURMA",
    "3T", "T3", "3ª Turma", "TERCEIRA TURMA", "TERCEIRATURMA",
    "4T", "T4", "4ª Turma", "QUARTA TURMA", "QUARTATURMA",
    "5T", "T5", "5ª Turma", "QUINTA TURMA", "QUINTATURMA",
    "6T", "T6", "6ª Turma", "SEXTA TURMA", "SEXTATURMA",
    "CE", "Corte Especial", "CORTE ESPECIAL", "CORTEESPECIAL",
    "1S", "S1", "1ª Seção", "PRIMEIRA SEÇÃO", "PRIMEIRASEÇÃO",
    "2S", "S2", "2ª Seção", "SEGUNDA SEÇÃO", "SEGUNDASEÇÃO",
    "3S", "S3", "3ª Seção", "TERCEIRA SEÇÃO", "TERCEIRASEÇÃO",
    "Não Informado", "", " ",
];

const CASE_CLASSES: &[&str] = &[
    "Apelação Cível",
    "Agravo de Instrumento",
    "Execução Fiscal",
    "Mandado de Segurança",
];
const ROLES: &[&str] = &["Autor", "Réu", "Terceiro", "Assistente"];
const STATUSES: &[&str] = &[
    "CONCLUÍDO - SENTENÇA",
    "CONCLUÍDO - ACÓRDÃO",
    "PENDENTE DE ANÁLISE",
    "AGUARDANDO PRAZO",
    "TRIAGEM",
];
const STATES: &[&str] = &[
    "AC", "AL", "AP", "AM", "BA", "CE", "DF", "ES", "GO", "MA", "MT", "MS", "MG", "PA",
    "PB", "PR", "PE", "PI", "RJ", "RN", "RS", "RO", "RR", "SC", "SP", "SE", "TO",
];

/// Generate a synthetic raw input file.
#[derive(Debug, Parser)]
#[command(name = "gen_mock", about)]
struct Args {
    /// Number of records
    #[arg(short, long, default_value_t = 500)]
    rows: usize,

    /// Output CSV
    #[arg(short, long, default_value = "dados_brutos_simulados.csv")]
    output: PathBuf,

    /// Seed for a reproducible file
    #[arg(short, long)]
    seed: Option<u64>,

    /// Extraction dates fall within this many days before today
    #[arg(short, long, default_value_t = 60)]
    days: i64,

    /// Size of the team of responsible agents
    #[arg(long, default_value_t = 12)]
    agents: usize,

    /// Size of the bench of rapporteurs
    #[arg(long, default_value_t = 15)]
    rapporteurs: usize,
}

/// "R$ 12.345,67"
fn format_brl(value: f64) -> String {
    let cents = (value * 100.0).round() as i64;
    let int_part = (cents / 100).to_string();
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    format!("R$ {},{:02}", grouped, cents % 100)
}

fn pick<'a>(rng: &mut StdRng, items: &[&'a str]) -> &'a str {
    items.choose(rng).copied().unwrap_or_default()
}

fn person(rng: &mut StdRng) -> String {
    format!("{} {}", pick(rng, FIRST_NAMES), pick(rng, LAST_NAMES))
}

/// Claim value, with a 20% chance of carrying a two-entry history.
fn dirty_value(rng: &mut StdRng) -> String {
    let first = (rng.gen_range(1000.0..50000.0_f64) * 100.0).round() / 100.0;
    if rng.gen_bool(0.2) {
        let second = (first * 1.1 * 100.0).round() / 100.0;
        format!("{}\n{}", format_brl(first), format_brl(second))
    } else {
        format_brl(first)
    }
}

/// Jurisdiction, with a 10% chance of naming two states.
fn dirty_states(rng: &mut StdRng) -> String {
    let first = pick(rng, STATES);
    if rng.gen_bool(0.1) {
        format!("{}\n{}", first, pick(rng, STATES))
    } else {
        first.to_string()
    }
}

fn subject_codes(rng: &mut StdRng) -> String {
    let first = format!("1.{}.{}", rng.gen_range(1..=5), rng.gen_range(1..=9));
    if rng.gen_bool(0.3) {
        format!("{}|2.{}.{}", first, rng.gen_range(1..=5), rng.gen_range(1..=9))
    } else {
        first
    }
}

fn process_number(rng: &mut StdRng) -> String {
    format!(
        "{}-{}.{}.4.01.{}",
        rng.gen_range(1_000_000..=9_999_999),
        rng.gen_range(10..=99),
        rng.gen_range(2020..=2025),
        rng.gen_range(3000..=4000)
    )
}

fn non_empty(s: String) -> Option<String> {
    (!s.is_empty()).then_some(s)
}

fn generate(
    rng: &mut StdRng,
    agents: &[String],
    rapporteurs: &[String],
    today: NaiveDate,
    days: i64,
) -> RawRecord {
    let back = Duration::days(rng.gen_range(0..=days.clamp(0, MAX_DAYS_BACK)));
    let date = today.checked_sub_signed(back).unwrap_or(today);
    RawRecord {
        extraction_date: Some(date.format("%d/%m/%Y").to_string()),
        process_number: Some(process_number(rng)),
        case_class: Some(pick(rng, CASE_CLASSES).to_string()),
        responsible_agent: agents.choose(rng).cloned(),
        rapporteur: rapporteurs.choose(rng).cloned(),
        judging_unit: non_empty(pick(rng, UNIT_SPELLINGS).to_string()),
        claim_value: Some(dirty_value(rng)),
        jurisdiction: Some(dirty_states(rng)),
        stakeholder_role: Some(pick(rng, ROLES).to_string()),
        status: Some(pick(rng, STATUSES).to_string()),
        subject_codes: Some(subject_codes(rng)),
    }
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let args = Args::parse();
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let agents: Vec<String> = (0..args.agents).map(|_| person(&mut rng)).collect();
    // one presiding rapporteur so the unit fallback shows up in the output
    let mut rapporteurs: Vec<String> = (0..args.rapporteurs)
        .map(|_| format!("Des. {}", person(&mut rng)))
        .collect();
    if let Some(first) = rapporteurs.first_mut() {
        *first = format!("Des. Presidente {}", pick(&mut rng, LAST_NAMES));
    }
    info!(
        rows = args.rows,
        agents = agents.len(),
        rapporteurs = rapporteurs.len(),
        "generating synthetic records"
    );

    let today = Local::now().date_naive();
    let file = File::create(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    let mut out = BufWriter::new(file);
    out.write_all(UTF8_BOM)?;
    {
        let mut wtr = csv::Writer::from_writer(&mut out);
        for _ in 0..args.rows {
            wtr.serialize(generate(&mut rng, &agents, &rapporteurs, today, args.days))?;
        }
        wtr.flush()?;
    }
    out.flush()?;

    info!(path = %args.output.display(), "wrote synthetic input");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_brl() {
        assert_eq!(format_brl(1000.0), "R$ 1.000,00");
        assert_eq!(format_brl(12500.5), "R$ 12.500,50");
        assert_eq!(format_brl(999.99), "R$ 999,99");
        assert_eq!(format_brl(1234567.891), "R$ 1.234.567,89");
    }

    #[test]
    fn test_generated_values_parse_back() {
        use casetables::process::normalize::parse_claim_value;
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let raw = dirty_value(&mut rng);
            let parsed = parse_claim_value(Some(raw.as_str()));
            assert!((1000.0..=55000.0).contains(&parsed), "{raw} -> {parsed}");
        }
    }

    #[test]
    fn test_huge_day_span_is_clamped() {
        let agents = vec!["Ana Lima".to_string()];
        let rapporteurs = vec!["Des. Rui Souza".to_string()];
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let rec = generate(&mut rng, &agents, &rapporteurs, today, i64::MAX);
            let date = NaiveDate::parse_from_str(
                rec.extraction_date.as_deref().unwrap(),
                "%d/%m/%Y",
            )
            .unwrap();
            assert!(date <= today);
            assert!(today - date <= Duration::days(MAX_DAYS_BACK));
        }
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let agents = vec!["Ana Lima".to_string()];
        let rapporteurs = vec!["Des. Rui Souza".to_string()];
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let a = generate(&mut StdRng::seed_from_u64(1), &agents, &rapporteurs, today, 60);
        let b = generate(&mut StdRng::seed_from_u64(1), &agents, &rapporteurs, today, 60);
        assert_eq!(a, b);
    }
}
