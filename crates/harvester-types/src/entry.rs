use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::record::Record;
use crate::resource::Resource;

/// The compact projection of a [`Record`] persisted in the `entries` map
/// and emitted by the catalogue dump. Always carries the `json` resource;
/// `pdf`/`xml`/`thumbnails` reflect successful downloads/generation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogueEntry {
    pub id: Uuid,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pmid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pmcid: Option<String>,
    #[serde(rename = "istexId", skip_serializing_if = "Option::is_none")]
    pub istex_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ark: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pii: Option<String>,

    pub resources: Vec<Resource>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oa_link: Option<String>,
}

impl CatalogueEntry {
    /// Build the compact entry from a fully-processed record, mirroring
    /// the original `_create_map_entry` projection: always `json`, plus
    /// `pdf`/`xml` when the corresponding `valid_fulltext_*` flag is set
    /// and `thumbnails` when `valid_thumbnails` is set.
    pub fn from_record(record: &Record) -> Self {
        let mut resources = vec![Resource::Json];
        if record.valid_fulltext_pdf {
            resources.push(Resource::Pdf);
        }
        if record.valid_fulltext_xml {
            resources.push(Resource::Xml);
        }
        if record.valid_thumbnails {
            resources.push(Resource::Thumbnails);
        }

        let mut license = None;
        let mut oa_link = None;
        if let Some(loc) = &record.best_oa_location {
            if let Some(pdf_url) = loc.url_for_pdf.as_ref().filter(|u| !u.is_empty()) {
                oa_link = Some(pdf_url.clone());
                license = loc.license.clone().filter(|l| !l.is_empty());
                if license.is_none() && pdf_url.contains("arxiv.org") {
                    license = Some("arXiv".to_string());
                }
            }
        }

        CatalogueEntry {
            id: record.id,
            doi: record.doi.clone(),
            pmid: record.pmid.clone(),
            pmcid: record.pmcid.clone(),
            istex_id: record.istex_id.clone(),
            ark: record.ark.clone(),
            pii: record.pii.clone(),
            resources,
            license,
            oa_link,
        }
    }

    pub fn has_pdf(&self) -> bool {
        self.resources.contains(&Resource::Pdf)
    }

    pub fn has_xml(&self) -> bool {
        self.resources.contains(&Resource::Xml)
    }

    /// Whether this entry represents an unrecoverable harvesting failure:
    /// neither a PDF nor an XML full text was obtained (§8 invariant 3).
    pub fn is_failure(&self) -> bool {
        !self.has_pdf() && !self.has_xml()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::OaLocation;

    #[test]
    fn from_record_marks_resources_from_provenance_flags() {
        let mut record = Record::new(Uuid::nil());
        record.doi = Some("10.1/abc".to_string());
        record.valid_fulltext_pdf = true;
        record.best_oa_location = Some(OaLocation {
            url_for_pdf: Some("https://example.test/a.pdf".to_string()),
            ..Default::default()
        });

        let entry = CatalogueEntry::from_record(&record);
        assert_eq!(entry.resources, vec![Resource::Json, Resource::Pdf]);
        assert_eq!(entry.oa_link.as_deref(), Some("https://example.test/a.pdf"));
        assert!(!entry.is_failure());
    }

    #[test]
    fn arxiv_pdf_without_license_gets_arxiv_license() {
        let mut record = Record::new(Uuid::nil());
        record.best_oa_location = Some(OaLocation {
            url_for_pdf: Some("https://arxiv.org/pdf/2101.00001".to_string()),
            ..Default::default()
        });
        let entry = CatalogueEntry::from_record(&record);
        assert_eq!(entry.license.as_deref(), Some("arXiv"));
    }

    #[test]
    fn failure_entry_has_only_json_resource() {
        let record = Record::new(Uuid::nil());
        let entry = CatalogueEntry::from_record(&record);
        assert_eq!(entry.resources, vec![Resource::Json]);
        assert!(entry.is_failure());
    }
}
