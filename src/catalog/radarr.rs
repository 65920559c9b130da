//! Radarr v3 API client

use super::{normalize_storage_path, CatalogEntry, EntryId, RemoteCatalog};
use crate::error::Error;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

const RESCAN_COMMAND: &str = "RescanMovie";
const SEARCH_COMMAND: &str = "MoviesSearch";

/// Blocking Radarr client. The API key travels as the `apikey` query parameter.
pub struct RadarrClient {
    base_url: String,
    api_key: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Movie {
    id: EntryId,
    #[serde(default)]
    title: String,
    path: Option<String>,
    #[serde(default)]
    monitored: bool,
}

impl RadarrClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client,
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/api/v3/{}", self.base_url, endpoint)
    }

    fn send(&self, request: RequestBuilder, url: &str) -> Result<Response, Error> {
        let response = request.query(&[("apikey", &self.api_key)]).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Remote {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response)
    }

    fn post_command(&self, body: Value) -> Result<(), Error> {
        let url = self.url("command");
        self.send(self.client.post(&url).json(&body), &url)?;
        Ok(())
    }
}

impl RemoteCatalog for RadarrClient {
    fn find_entry_by_storage_path(&self, path: &Path) -> Result<Option<CatalogEntry>, Error> {
        let url = self.url("movie");
        let movies: Vec<Movie> = self.send(self.client.get(&url), &url)?.json()?;
        let target = normalize_storage_path(path);

        let found = movies.into_iter().find_map(|movie| {
            let storage_path = normalize_storage_path(Path::new(movie.path.as_deref()?));
            (storage_path == target).then(|| CatalogEntry {
                id: movie.id,
                storage_path,
                monitored: movie.monitored,
                title: movie.title,
            })
        });

        debug!(path = %target.display(), found = found.is_some(), "Catalog lookup");
        Ok(found)
    }

    fn set_monitored(&self, id: EntryId) -> Result<(), Error> {
        let url = self.url(&format!("movie/{}", id));
        let mut movie: Value = self.send(self.client.get(&url), &url)?.json()?;

        if movie.get("monitored").and_then(Value::as_bool) == Some(true) {
            debug!(id, "Movie already monitored");
            return Ok(());
        }

        match movie.as_object_mut() {
            Some(fields) => {
                fields.insert("monitored".to_string(), Value::Bool(true));
            }
            None => {
                return Err(Error::UnexpectedResponse {
                    url,
                    message: "movie is not a JSON object".to_string(),
                })
            }
        }
        self.send(self.client.put(&url).json(&movie), &url)?;
        info!(id, "Movie set to monitored");
        Ok(())
    }

    fn trigger_reacquisition(&self, id: EntryId) -> Result<(), Error> {
        self.post_command(json!({ "name": SEARCH_COMMAND, "movieIds": [id] }))?;
        info!(id, "Search queued");
        Ok(())
    }

    fn refresh(&self, id: EntryId) -> Result<(), Error> {
        self.post_command(json!({ "name": RESCAN_COMMAND, "movieId": id }))?;
        debug!(id, "Rescan queued");
        Ok(())
    }
}
