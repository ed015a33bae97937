//! Ambient roster import. Grounded in the teacher's
//! `io::import_people_csv`: header row, one record per vet, `;`-separated
//! sub-fields.

use crate::model::VetId;
use crate::roster::RawVet;
use anyhow::{bail, Context};
use chrono::NaiveDate;
use csv::ReaderBuilder;
use std::path::Path;

/// Import a vet roster from CSV: header `handle,rest_days,vacations` where
/// `rest_days` is `;`-separated weekday digits (0=Monday) and `vacations` is
/// `;`-separated ISO dates.
pub fn import_roster_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<RawVet>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let handle = rec.get(0).context("missing handle")?.trim();
        if handle.is_empty() {
            bail!("invalid roster row (empty handle)");
        }
        let rest_days = rec
            .get(1)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(parse_rest_days)
            .transpose()
            .with_context(|| format!("invalid rest_days for handle {handle}"))?
            .unwrap_or_default();
        let vacations = rec
            .get(2)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(parse_vacations)
            .transpose()
            .with_context(|| format!("invalid vacations for handle {handle}"))?
            .unwrap_or_default();
        out.push(RawVet { id: VetId::new(handle), rest_days, vacations });
    }
    Ok(out)
}

fn parse_rest_days(raw: &str) -> anyhow::Result<Vec<u8>> {
    raw.split(';')
        .filter(|chunk| !chunk.trim().is_empty())
        .map(|chunk| chunk.trim().parse::<u8>().context("expected a weekday digit 0-6"))
        .collect()
}

fn parse_vacations(raw: &str) -> anyhow::Result<Vec<NaiveDate>> {
    raw.split(';')
        .filter(|chunk| !chunk.trim().is_empty())
        .map(|chunk| {
            NaiveDate::parse_from_str(chunk.trim(), "%Y-%m-%d")
                .with_context(|| format!("invalid date: {chunk}"))
        })
        .collect()
}
