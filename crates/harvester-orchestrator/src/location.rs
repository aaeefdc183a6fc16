//! Best-location precedence (§4.2 "Best-location selection"). Host
//! substrings are taken verbatim from the original since spec.md leaves
//! them unspecified (SPEC_FULL.md "Supplemented Features").

use harvester_types::record::OaLocation;

use crate::config::MirrorHostConfig;

const PMC_HOST_EUROPEPMC: &str = "europepmc.org/articles/pmc";
const PMC_HOST_NCBI: &str = "ncbi.nlm.nih.gov/pmc/articles";
const ARXIV_HOST: &str = "arxiv.org";
const PLOS_HOST: &str = "plos.org";

fn pdf_url(location: &OaLocation) -> Option<&str> {
    location.url_for_pdf.as_deref().filter(|u| !u.is_empty())
}

fn matches_host(location: &OaLocation, host: &str) -> bool {
    pdf_url(location).map(|u| u.contains(host)).unwrap_or(false)
}

/// Choose `best_oa_location` from the candidate set and return it
/// alongside every other PDF-bearing location as `alternative_oa_locations`
/// (§4.2), in the fixed six-step precedence order.
pub fn select_best_location(
    oa_locations: &[OaLocation],
    input_best: Option<&OaLocation>,
    mirrors: &MirrorHostConfig,
) -> (Option<OaLocation>, Vec<OaLocation>) {
    let mut chosen_index: Option<usize> = None;

    if mirrors.prioritize_pmc {
        chosen_index = oa_locations
            .iter()
            .position(|l| matches_host(l, PMC_HOST_EUROPEPMC) || matches_host(l, PMC_HOST_NCBI));
    }

    if chosen_index.is_none() && mirrors.arxiv_mirror_configured {
        chosen_index = oa_locations.iter().position(|l| matches_host(l, ARXIV_HOST));
    }

    if chosen_index.is_none() && mirrors.plos_mirror_configured {
        chosen_index = oa_locations.iter().position(|l| matches_host(l, PLOS_HOST));
    }

    let chosen = if let Some(idx) = chosen_index {
        Some(oa_locations[idx].clone())
    } else if let Some(best) = input_best.filter(|l| l.has_pdf_url()) {
        Some(best.clone())
    } else if let Some(idx) = oa_locations
        .iter()
        .position(|l| l.is_best == Some(true) && l.has_pdf_url())
    {
        chosen_index = Some(idx);
        Some(oa_locations[idx].clone())
    } else if let Some(idx) = oa_locations.iter().position(OaLocation::has_pdf_url) {
        chosen_index = Some(idx);
        Some(oa_locations[idx].clone())
    } else {
        None
    };

    let alternatives = oa_locations
        .iter()
        .enumerate()
        .filter(|(idx, l)| Some(*idx) != chosen_index && l.has_pdf_url())
        .map(|(_, l)| l.clone())
        .collect();

    (chosen, alternatives)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(url: &str, is_best: bool) -> OaLocation {
        OaLocation { url_for_pdf: Some(url.to_string()), is_best: Some(is_best), ..Default::default() }
    }

    #[test]
    fn prefers_pmc_mirror_host_when_prioritized() {
        let locations = vec![
            loc("https://example.test/a.pdf", true),
            loc("https://europepmc.org/articles/pmc123/pdf", false),
        ];
        let mirrors = MirrorHostConfig { prioritize_pmc: true, ..Default::default() };
        let (chosen, alts) = select_best_location(&locations, None, &mirrors);
        assert_eq!(chosen.unwrap().url_for_pdf.as_deref(), Some("https://europepmc.org/articles/pmc123/pdf"));
        assert_eq!(alts.len(), 1);
    }

    #[test]
    fn falls_back_to_input_best_location() {
        let locations = vec![loc("https://example.test/a.pdf", false)];
        let input_best = loc("https://example.test/best.pdf", true);
        let mirrors = MirrorHostConfig::default();
        let (chosen, _) = select_best_location(&locations, Some(&input_best), &mirrors);
        assert_eq!(chosen.unwrap().url_for_pdf.as_deref(), Some("https://example.test/best.pdf"));
    }

    #[test]
    fn falls_back_to_first_is_best_location() {
        let locations = vec![loc("https://example.test/a.pdf", false), loc("https://example.test/b.pdf", true)];
        let mirrors = MirrorHostConfig::default();
        let (chosen, alts) = select_best_location(&locations, None, &mirrors);
        assert_eq!(chosen.unwrap().url_for_pdf.as_deref(), Some("https://example.test/b.pdf"));
        assert_eq!(alts.len(), 1);
    }

    #[test]
    fn falls_back_to_first_pdf_bearing_location() {
        let locations = vec![loc("https://example.test/a.pdf", false)];
        let mirrors = MirrorHostConfig::default();
        let (chosen, alts) = select_best_location(&locations, None, &mirrors);
        assert!(chosen.is_some());
        assert!(alts.is_empty());
    }

    #[test]
    fn no_usable_location_returns_none() {
        let locations = vec![OaLocation::default()];
        let mirrors = MirrorHostConfig::default();
        let (chosen, alts) = select_best_location(&locations, None, &mirrors);
        assert!(chosen.is_none());
        assert!(alts.is_empty());
    }
}
