//! arXiv/PLOS mirror URL detection and object-path derivation.
//!
//! Grounded on `arxiv_url_to_path`/`plos_url_to_path` and `_arxiv_mirror`/
//! `_plos_mirror` in the original; host substrings taken verbatim since
//! spec.md leaves them unspecified (SPEC_FULL.md "Supplemented Features").

pub fn is_arxiv_url(url: &str) -> bool {
    url.contains("arxiv.org")
}

pub fn is_plos_url(url: &str) -> bool {
    url.contains("plos.org")
}

/// `{prefix}/{yymm}/{filename}/{filename}.{ext}` derived from an arXiv PDF
/// URL of the form `.../arxiv.org/pdf/<id>`, where `prefix` is `"arxiv"`
/// for the new-style numeric id scheme or the old subject class (e.g.
/// `"hep-th"`) otherwise, and `yymm` is the first four characters of the
/// trailing filename.
pub fn arxiv_url_to_path(url: &str, ext: &str) -> Option<String> {
    let marker = "arxiv.org/pdf/";
    let idx = url.find(marker)?;
    let id = &url[idx + marker.len()..];
    if id.is_empty() {
        return None;
    }

    let prefix = if id.chars().next()?.is_ascii_digit() {
        "arxiv".to_string()
    } else {
        id.split('/').next()?.to_string()
    };

    let filename = url.rsplit('/').next()?;
    if filename.len() < 4 {
        return None;
    }
    let yymm = &filename[0..4];

    Some(format!("{prefix}/{yymm}/{filename}/{filename}.{ext}"))
}

/// PLOS article id extracted from the DOI suffix embedded in the PDF URL
/// (`.../10.1371/<id>&...`), falling back to the record's own DOI when the
/// URL itself doesn't carry it.
pub fn plos_url_to_path(url: &str, record_doi: Option<&str>) -> Option<String> {
    let marker = "10.1371/";
    if let Some(idx) = url.find(marker) {
        let rest = &url[idx + marker.len()..];
        let id = rest.split('&').next()?;
        if !id.is_empty() {
            return Some(id.to_string());
        }
    }

    let doi = record_doi?;
    let idx = doi.find(marker)?;
    let id = &doi[idx + marker.len()..];
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arxiv_path_uses_arxiv_prefix_for_numeric_ids() {
        let path = arxiv_url_to_path("https://arxiv.org/pdf/2101.00001", "pdf.gz").unwrap();
        assert_eq!(path, "arxiv/2101/2101.00001/2101.00001.pdf.gz");
    }

    #[test]
    fn arxiv_path_uses_subject_class_prefix_for_old_ids() {
        let path = arxiv_url_to_path("https://arxiv.org/pdf/hep-th/9901001", "pdf.gz").unwrap();
        assert_eq!(path, "hep-th/9901/9901001/9901001.pdf.gz");
    }

    #[test]
    fn plos_path_extracted_from_url() {
        let url = "https://journals.plos.org/plosone/article/file?id=10.1371/journal.pone.0263309&type=printable";
        assert_eq!(plos_url_to_path(url, None).unwrap(), "journal.pone.0263309");
    }

    #[test]
    fn plos_path_falls_back_to_record_doi() {
        let url = "https://journals.plos.org/plosone/article/file?id=unexpected&type=printable";
        assert_eq!(
            plos_url_to_path(url, Some("10.1371/journal.pone.0263309")).unwrap(),
            "journal.pone.0263309"
        );
    }
}
