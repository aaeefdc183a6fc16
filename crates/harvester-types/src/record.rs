use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::identifier::StrongIdentifier;

/// A single OA location as carried by the Unpaywall catalogue: a candidate
/// download source for a record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OaLocation {
    pub url: Option<String>,
    pub url_for_pdf: Option<String>,
    pub url_for_landing_page: Option<String>,
    pub license: Option<String>,
    pub is_best: Option<bool>,
}

impl OaLocation {
    pub fn has_pdf_url(&self) -> bool {
        matches!(&self.url_for_pdf, Some(u) if !u.is_empty())
    }
}

/// The in-memory, per-article working object during a batch. Created when
/// the orchestrator reads a catalogue line whose primary identifier is
/// absent from the `ident` index; destroyed only by the Reset operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub id: Uuid,

    pub doi: Option<String>,
    pub pmid: Option<String>,
    pub pmcid: Option<String>,
    #[serde(rename = "istexId")]
    pub istex_id: Option<String>,
    pub ark: Option<String>,
    pub pii: Option<String>,

    pub best_oa_location: Option<OaLocation>,
    #[serde(default)]
    pub alternative_oa_locations: Vec<OaLocation>,
    #[serde(default)]
    pub oa_locations: Vec<OaLocation>,

    /// Opaque enrichment from the metadata lookup service, passed through
    /// unmodified into the dumped entry if the caller wants it.
    pub glutton: Option<Value>,
    /// arXiv metadata sidecar, merged in by the arXiv mirror shortcut.
    pub arxiv: Option<Value>,

    /// Set by the Downloader/Validator once a resource has been confirmed.
    #[serde(default)]
    pub valid_fulltext_pdf: bool,
    #[serde(default)]
    pub valid_fulltext_xml: bool,
    #[serde(default)]
    pub valid_thumbnails: bool,
}

impl Record {
    pub fn new(id: Uuid) -> Self {
        Record {
            id,
            doi: None,
            pmid: None,
            pmcid: None,
            istex_id: None,
            ark: None,
            pii: None,
            best_oa_location: None,
            alternative_oa_locations: Vec::new(),
            oa_locations: Vec::new(),
            glutton: None,
            arxiv: None,
            valid_fulltext_pdf: false,
            valid_fulltext_xml: false,
            valid_thumbnails: false,
        }
    }

    /// The primary identifier used as the key into the `ident` index: DOI
    /// for Unpaywall input, PMCID when it stands in for DOI (PMC input).
    pub fn primary_identifier(&self) -> Option<&str> {
        self.doi.as_deref().or(self.pmcid.as_deref())
    }

    /// Every strong identifier the record currently carries, in the fixed
    /// `StrongIdentifier::ALL` order.
    pub fn strong_identifiers(&self) -> Vec<StrongIdentifier> {
        StrongIdentifier::ALL
            .into_iter()
            .filter(|kind| self.identifier_value(*kind).is_some())
            .collect()
    }

    pub fn identifier_value(&self, kind: StrongIdentifier) -> Option<&str> {
        match kind {
            StrongIdentifier::Doi => self.doi.as_deref(),
            StrongIdentifier::Pmid => self.pmid.as_deref(),
            StrongIdentifier::Pmcid => self.pmcid.as_deref(),
            StrongIdentifier::IstexId => self.istex_id.as_deref(),
            StrongIdentifier::Ark => self.ark.as_deref(),
            StrongIdentifier::Pii => self.pii.as_deref(),
        }
        .filter(|v| !v.is_empty())
    }

    /// Backfill any strong identifier that is still unset from a metadata
    /// lookup response, without overwriting one the catalogue already had.
    pub fn backfill_identifiers_from(&mut self, glutton: &Value) {
        if self.doi.is_none() {
            self.doi = glutton.get("doi").and_then(Value::as_str).map(str::to_owned);
        }
        if self.pmid.is_none() {
            self.pmid = glutton.get("pmid").and_then(Value::as_str).map(str::to_owned);
        }
        if self.pmcid.is_none() {
            self.pmcid = glutton.get("pmcid").and_then(Value::as_str).map(str::to_owned);
        }
        if self.istex_id.is_none() {
            self.istex_id =
                glutton.get("istexId").and_then(Value::as_str).map(str::to_owned);
        }
    }
}
