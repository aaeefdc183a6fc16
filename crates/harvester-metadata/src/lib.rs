//! The bibliographic metadata lookup client (§4.3 "Metadata lookup",
//! §6 "Metadata lookup protocol"): queries biblio-glutton by each strong
//! identifier in turn, falling back to the public crossref API by DOI.
//!
//! Grounded on `_biblio_glutton_lookup` in the original: same identifier
//! order (doi, pmid, pmcid, istex_id), same crossref fallback and
//! user-agent policy, same "first 200 response wins" semantics. TLS
//! verification is intentionally skipped to match `requests.get(...,
//! verify=False, ...)`, since many OA mirrors present self-signed or
//! otherwise-invalid certificates.

use reqwest::blocking::Client;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

const LOOKUP_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);

/// Weighted, rotating desktop-browser user agents, matching
/// `_get_random_user_agent`'s {0.2, 0.3, 0.5} distribution.
const USER_AGENTS: &[(&str, f64)] = &[
    ("Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:95.0) Gecko/20100101 Firefox/95.0", 0.2),
    (
        "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/94.0.4606.81 Safari/537.36",
        0.3,
    ),
    (
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/92.0.4515.159 Safari/537.36",
        0.5,
    ),
];

pub fn random_user_agent() -> &'static str {
    use rand::Rng;
    let mut roll: f64 = rand::thread_rng().gen_range(0.0..1.0);
    for (agent, weight) in USER_AGENTS {
        if roll < *weight {
            return agent;
        }
        roll -= weight;
    }
    USER_AGENTS.last().unwrap().0
}

/// Strong identifiers a lookup may be keyed on, in the fixed precedence
/// order the original tries them.
#[derive(Debug, Clone, Default)]
pub struct LookupIdentifiers<'a> {
    pub doi: Option<&'a str>,
    pub pmid: Option<&'a str>,
    pub pmcid: Option<&'a str>,
    pub istex_id: Option<&'a str>,
}

pub struct MetadataClient {
    client: Client,
    biblio_glutton_base: Option<String>,
    crossref_base: Option<String>,
    crossref_email: Option<String>,
}

impl MetadataClient {
    pub fn new(
        biblio_glutton_base: Option<String>,
        crossref_base: Option<String>,
        crossref_email: Option<String>,
    ) -> Result<Self> {
        let client = Client::builder().danger_accept_invalid_certs(true).build()?;
        Ok(MetadataClient { client, biblio_glutton_base, crossref_base, crossref_email })
    }

    /// Looks up metadata by each identifier present in `ids`, in order,
    /// stopping at the first 200 response; falls back to crossref by DOI
    /// if biblio-glutton yielded nothing and a DOI is available.
    pub fn lookup(&self, ids: &LookupIdentifiers<'_>) -> Result<Option<Value>> {
        if let Some(base) = &self.biblio_glutton_base {
            if let Some(doi) = ids.doi.filter(|d| !d.is_empty()) {
                if let Some(value) = self.get_json(self.client.get(base.as_str()).query(&[("doi", doi)]))? {
                    return Ok(Some(value));
                }
            }
            if let Some(pmid) = ids.pmid.filter(|p| !p.is_empty()) {
                if let Some(value) = self.get_json(self.client.get(format!("{base}pmid={pmid}")))? {
                    return Ok(Some(value));
                }
            }
            if let Some(pmcid) = ids.pmcid.filter(|p| !p.is_empty()) {
                if let Some(value) = self.get_json(self.client.get(format!("{base}pmc={pmcid}")))? {
                    return Ok(Some(value));
                }
            }
            if let Some(istex_id) = ids.istex_id.filter(|i| !i.is_empty()) {
                if let Some(value) =
                    self.get_json(self.client.get(format!("{base}istexid={istex_id}")))?
                {
                    return Ok(Some(value));
                }
            }
        }

        if let (Some(crossref_base), Some(doi)) =
            (&self.crossref_base, ids.doi.filter(|d| !d.is_empty()))
        {
            return self.crossref_lookup(crossref_base, doi);
        }

        Ok(None)
    }

    fn get_json(&self, request: reqwest::blocking::RequestBuilder) -> Result<Option<Value>> {
        let response = match request.timeout(LOOKUP_TIMEOUT).send() {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "metadata lookup request failed");
                return Ok(None);
            }
        };
        if response.status().is_success() {
            Ok(response.json().ok())
        } else {
            Ok(None)
        }
    }

    fn crossref_lookup(&self, crossref_base: &str, doi: &str) -> Result<Option<Value>> {
        let user_agent = match &self.crossref_email {
            Some(email) => format!(
                "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:81.0) Gecko/20100101 Firefox/81.0 (mailto:{email})"
            ),
            None => random_user_agent().to_string(),
        };

        let response = match self
            .client
            .get(format!("{}/works/{}", crossref_base.trim_end_matches('/'), doi))
            .header(reqwest::header::USER_AGENT, user_agent)
            .timeout(LOOKUP_TIMEOUT)
            .send()
        {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "crossref lookup failed");
                return Ok(None);
            }
        };

        if !response.status().is_success() {
            return Ok(None);
        }

        let body: Value = match response.json() {
            Ok(b) => b,
            Err(_) => return Ok(None),
        };
        let mut message = body.get("message").cloned().unwrap_or(Value::Null);
        if let Value::Object(ref mut map) = message {
            map.remove("reference");
        }
        Ok(Some(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_user_agent_returns_one_of_the_known_strings() {
        for _ in 0..50 {
            let agent = random_user_agent();
            assert!(USER_AGENTS.iter().any(|(a, _)| *a == agent));
        }
    }

    #[test]
    fn lookup_is_none_when_nothing_configured() {
        let client = MetadataClient::new(None, None, None).unwrap();
        let ids = LookupIdentifiers { doi: Some("10.1/abc"), ..Default::default() };
        assert!(client.lookup(&ids).unwrap().is_none());
    }
}
