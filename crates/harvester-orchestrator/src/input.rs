//! Catalogue input readers (§6): gzipped Unpaywall JSONL and plain PMC
//! TSV, plus the line-counting pass used to size progress reporting and
//! seed sampling.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::GzDecoder;
use serde::Deserialize;

use harvester_types::record::{OaLocation, Record};

#[derive(Debug, Deserialize)]
struct UnpaywallLine {
    doi: Option<String>,
    #[serde(default)]
    oa_locations: Vec<OaLocation>,
    best_oa_location: Option<OaLocation>,
}

/// One parsed Unpaywall catalogue line, not yet assigned a UUID or
/// best-location.
pub struct UnpaywallRecord {
    pub record: Record,
    pub oa_locations: Vec<OaLocation>,
    pub input_best: Option<OaLocation>,
}

pub fn parse_unpaywall_line(line: &str) -> Option<UnpaywallRecord> {
    let parsed: UnpaywallLine = serde_json::from_str(line).ok()?;
    let mut record = Record::new(uuid::Uuid::nil());
    record.doi = parsed.doi;
    Some(UnpaywallRecord { oa_locations: parsed.oa_locations, input_best: parsed.best_oa_location, record })
}

/// A parsed PMC TSV data row: `subpath`, an ignored column, `pmcid`,
/// `pmid` (optionally `PMID:`-prefixed) — §6 "Input catalogue (PMC)".
pub struct PmcRecord {
    pub record: Record,
    pub subpath: String,
}

pub fn parse_pmc_line(line: &str) -> Option<PmcRecord> {
    let columns: Vec<&str> = line.split('\t').collect();
    if columns.len() < 4 {
        return None;
    }
    let subpath = columns[0].trim().to_string();
    let pmcid = columns[2].trim().to_string();
    let pmid_raw = columns[3].trim();
    let pmid = pmid_raw.rsplit_once(':').map(|(_, v)| v).unwrap_or(pmid_raw).to_string();

    if subpath.is_empty() || pmcid.is_empty() {
        return None;
    }

    let mut record = Record::new(uuid::Uuid::nil());
    record.pmcid = Some(pmcid);
    if !pmid.is_empty() {
        record.pmid = Some(pmid);
    }

    Some(PmcRecord { record, subpath })
}

/// Open the gzipped Unpaywall file as a line iterator.
pub fn open_unpaywall_lines(path: &Path) -> std::io::Result<impl Iterator<Item = std::io::Result<String>>> {
    let file = File::open(path)?;
    let reader = BufReader::new(GzDecoder::new(file));
    Ok(reader.lines())
}

/// Open the PMC TSV file as a line iterator, skipping the header row.
pub fn open_pmc_lines(path: &Path) -> std::io::Result<impl Iterator<Item = std::io::Result<String>>> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file).lines();
    reader.next();
    Ok(reader)
}

/// Count data lines (post-header, where applicable) for progress sizing
/// and sampling (§4.2 step 1).
pub fn count_unpaywall_lines(path: &Path) -> std::io::Result<u64> {
    Ok(open_unpaywall_lines(path)?.filter_map(Result::ok).count() as u64)
}

pub fn count_pmc_lines(path: &Path) -> std::io::Result<u64> {
    Ok(open_pmc_lines(path)?.filter_map(Result::ok).count() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_unpaywall_line_with_locations() {
        let line = r#"{"doi":"10.1/abc","oa_locations":[{"is_best":true,"url_for_pdf":"https://example.test/a.pdf"}]}"#;
        let parsed = parse_unpaywall_line(line).unwrap();
        assert_eq!(parsed.record.doi.as_deref(), Some("10.1/abc"));
        assert_eq!(parsed.oa_locations.len(), 1);
    }

    #[test]
    fn rejects_malformed_unpaywall_line() {
        assert!(parse_unpaywall_line("not json").is_none());
    }

    #[test]
    fn parses_pmc_line_strips_pmid_prefix() {
        let line = "oa_package/0a/12/PMC1.tar.gz\tignored\tPMC1\tPMID:123";
        let parsed = parse_pmc_line(line).unwrap();
        assert_eq!(parsed.subpath, "oa_package/0a/12/PMC1.tar.gz");
        assert_eq!(parsed.record.pmcid.as_deref(), Some("PMC1"));
        assert_eq!(parsed.record.pmid.as_deref(), Some("123"));
    }

    #[test]
    fn rejects_short_pmc_line() {
        assert!(parse_pmc_line("only\ttwo").is_none());
    }
}
