//! OMDb HTTP client.
//!
//! Two calls are made against the API: a title search (`s=`) and an identifier
//! lookup (`i=`). Both return a JSON envelope whose `Response` field is the
//! API's own success flag, independent of the HTTP status. The envelope is
//! turned into an [`ApiOutcome`] instead of trusting which fields are present.

use anyhow::{Context, Result, anyhow};
use image::DynamicImage;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::constants::constants;

/// OMDb's marker for a field that has no value.
pub const NOT_AVAILABLE: &str = "N/A";

/// Used when the API reports failure without an `Error` field.
pub const REJECTED_WITHOUT_REASON: &str = "The movie database rejected the request.";

/// A single search hit.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MovieSummary {
  #[serde(rename = "imdbID")]
  pub imdb_id: String,
  #[serde(rename = "Title")]
  pub title: String,
  #[serde(rename = "Year", default)]
  pub year: String,
  /// Poster URL, or [`NOT_AVAILABLE`].
  #[serde(rename = "Poster", default)]
  pub poster: String,
}

/// The full record returned by an identifier lookup.
///
/// Every field is kept as the API's string; ratings and dates are displayed verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MovieDetails {
  #[serde(rename = "imdbID")]
  pub imdb_id: String,
  #[serde(rename = "Title")]
  pub title: String,
  #[serde(rename = "Year")]
  pub year: String,
  #[serde(rename = "Poster")]
  pub poster: String,
  #[serde(rename = "Plot")]
  pub plot: String,
  #[serde(rename = "Director")]
  pub director: String,
  #[serde(rename = "Actors")]
  pub actors: String,
  #[serde(rename = "Genre")]
  pub genre: String,
  #[serde(rename = "imdbRating")]
  pub imdb_rating: String,
  #[serde(rename = "Released")]
  pub released: String,
}

/// What the API answered, once the transport succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiOutcome<T> {
  /// `Response: "True"` with its payload.
  Found(T),
  /// `Response: "False"` with the API's `Error` message.
  Rejected(String),
}

impl<T> ApiOutcome<T> {
  fn from_flag(flag: &str, error: Option<String>, payload: T) -> Self {
    if flag == "True" {
      ApiOutcome::Found(payload)
    } else {
      ApiOutcome::Rejected(error.unwrap_or_else(|| REJECTED_WITHOUT_REASON.to_string()))
    }
  }
}

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
  #[serde(rename = "Response")]
  response: String,
  #[serde(rename = "Search", default)]
  search: Vec<MovieSummary>,
  #[serde(rename = "Error")]
  error: Option<String>,
}

impl SearchEnvelope {
  fn into_outcome(self) -> ApiOutcome<Vec<MovieSummary>> {
    ApiOutcome::from_flag(&self.response, self.error, self.search)
  }
}

#[derive(Debug, Deserialize)]
struct LookupEnvelope {
  #[serde(rename = "Response")]
  response: String,
  #[serde(rename = "Error")]
  error: Option<String>,
  #[serde(flatten)]
  record: MovieDetails,
}

impl LookupEnvelope {
  fn into_outcome(self) -> ApiOutcome<MovieDetails> {
    ApiOutcome::from_flag(&self.response, self.error, self.record)
  }
}

// --- Client ---

#[derive(Debug, Clone)]
pub struct OmdbClient {
  http: Client,
  base_url: Url,
  api_key: String,
}

impl OmdbClient {
  pub fn new(base_url: &str, api_key: impl Into<String>) -> Result<Self> {
    Self::with_http_client(Client::new(), base_url, api_key)
  }

  pub fn with_http_client(http: Client, base_url: &str, api_key: impl Into<String>) -> Result<Self> {
    let base_url = Url::parse(base_url).with_context(|| format!("Invalid OMDb base URL: {}", base_url))?;
    Ok(Self { http, base_url, api_key: api_key.into() })
  }

  pub fn http_client(&self) -> &Client {
    &self.http
  }

  /// `<base>?s=<query>&apikey=<key>`
  pub fn search_url(&self, query: &str) -> Url {
    let mut url = self.base_url.clone();
    url.query_pairs_mut().append_pair("s", query).append_pair("apikey", &self.api_key);
    url
  }

  /// `<base>?i=<imdb id>&apikey=<key>`
  pub fn lookup_url(&self, imdb_id: &str) -> Url {
    let mut url = self.base_url.clone();
    url.query_pairs_mut().append_pair("i", imdb_id).append_pair("apikey", &self.api_key);
    url
  }

  pub async fn search_by_title(&self, query: &str) -> Result<ApiOutcome<Vec<MovieSummary>>> {
    let envelope: SearchEnvelope = self.get_json(self.search_url(query)).await.context("OMDb title search failed")?;
    Ok(envelope.into_outcome())
  }

  pub async fn lookup_by_id(&self, imdb_id: &str) -> Result<ApiOutcome<MovieDetails>> {
    let envelope: LookupEnvelope = self.get_json(self.lookup_url(imdb_id)).await.context("OMDb lookup failed")?;
    Ok(envelope.into_outcome())
  }

  // Errors are stripped of their URL so the API key never reaches the log.
  async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
    let response = self.http.get(url).send().await.map_err(|e| anyhow!(e.without_url()))?;
    let status = response.status();
    if !status.is_success() {
      return Err(anyhow!("HTTP status {}", status));
    }
    response.json::<T>().await.map_err(|e| anyhow!(e.without_url()).context("Response body was not a valid OMDb envelope"))
  }
}

// --- Posters ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PosterSize {
  Card,
  Detail,
}

/// Resolve a poster field for display, substituting the placeholder for the `N/A` sentinel.
pub fn poster_url(raw: &str, size: PosterSize) -> &str {
  let raw = raw.trim();
  if raw.is_empty() || raw == NOT_AVAILABLE {
    match size {
      PosterSize::Card => constants().card_placeholder_poster.as_str(),
      PosterSize::Detail => constants().detail_placeholder_poster.as_str(),
    }
  } else {
    raw
  }
}

pub async fn fetch_poster(client: &Client, url: &str) -> Result<DynamicImage> {
  let response = client.get(url).send().await.with_context(|| format!("Failed to request poster {}", url))?;
  if !response.status().is_success() {
    return Err(anyhow!("Poster request returned HTTP {} ({})", response.status(), url));
  }
  let bytes = response.bytes().await.with_context(|| format!("Failed to read poster bytes from {}", url))?;
  image::load_from_memory(&bytes).with_context(|| format!("Failed to decode poster image (URL: {})", url))
}
