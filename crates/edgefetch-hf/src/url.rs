//! URL construction for the hub.
//!
//! Every segment (owner, name, revision, file path component) is
//! percent-encoded on its own; `/` between path components is kept as a
//! structural delimiter.

use url::Url;

use crate::models::HfConfig;

/// Builds canonical manifest and resolve URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointResolver {
    api_base: String,
    hub_base: String,
}

impl EndpointResolver {
    /// Create a resolver from the API base (`https://huggingface.co/api`) and
    /// the hub base (`https://huggingface.co`).
    pub fn parse(api_base: &str, hub_base: &str) -> Result<Self, url::ParseError> {
        let api_base = Url::parse(api_base)?;
        let hub_base = Url::parse(hub_base)?;
        Ok(Self {
            api_base: api_base.as_str().trim_end_matches('/').to_string(),
            hub_base: hub_base.as_str().trim_end_matches('/').to_string(),
        })
    }

    pub(crate) fn from_config(config: &HfConfig) -> Self {
        Self {
            api_base: config.api_base.as_str().trim_end_matches('/').to_string(),
            hub_base: config.hub_base.as_str().trim_end_matches('/').to_string(),
        }
    }

    /// Manifest (recursive tree listing) URL for `model_id` at `revision`.
    pub fn manifest_url(&self, model_id: &str, revision: &str) -> Result<Url, url::ParseError> {
        Url::parse(&format!(
            "{}/models/{}/tree/{}?recursive=true",
            self.api_base,
            encode_path(model_id),
            urlencoding::encode(revision)
        ))
    }

    /// Resolve URL of one file:
    /// `<hub>/<owner>/<repo>/resolve/<revision>/<path>`.
    pub fn file_url(&self, model_id: &str, revision: &str, path: &str) -> String {
        format!(
            "{}/{}/resolve/{}/{}",
            self.hub_base,
            encode_path(model_id),
            urlencoding::encode(revision),
            encode_path(path)
        )
    }
}

/// Percent-encode each `/`-separated segment independently.
fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
