use std::fmt;

/// Any of the strong identifiers a [`crate::Record`] may carry. DOI is the
/// default primary key; for PMC input PMCID takes its place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrongIdentifier {
    Doi,
    Pmid,
    Pmcid,
    IstexId,
    Ark,
    Pii,
}

impl StrongIdentifier {
    pub const ALL: [StrongIdentifier; 6] = [
        StrongIdentifier::Doi,
        StrongIdentifier::Pmid,
        StrongIdentifier::Pmcid,
        StrongIdentifier::IstexId,
        StrongIdentifier::Ark,
        StrongIdentifier::Pii,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrongIdentifier::Doi => "doi",
            StrongIdentifier::Pmid => "pmid",
            StrongIdentifier::Pmcid => "pmcid",
            StrongIdentifier::IstexId => "istexId",
            StrongIdentifier::Ark => "ark",
            StrongIdentifier::Pii => "pii",
        }
    }
}

impl fmt::Display for StrongIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
