//! Fetches the JSON collections the directory pages are built from.

use std::path::PathBuf;
use std::str::FromStr;

use log::{info, warn};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{Error, Result};

/// Where relative data paths are resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum DataRoot {
    Http(Url),
    Dir(PathBuf),
}

impl FromStr for DataRoot {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.starts_with("http://") || s.starts_with("https://") {
            let base = if s.ends_with('/') {
                s.to_owned()
            } else {
                format!("{s}/")
            };
            let url = Url::parse(&base).map_err(|e| Error::InvalidRoot(format!("{s}: {e}")))?;
            Ok(DataRoot::Http(url))
        } else {
            Ok(DataRoot::Dir(PathBuf::from(s)))
        }
    }
}

pub struct DataLoader {
    root: DataRoot,
    client: reqwest::Client,
}

impl DataLoader {
    pub fn new(root: DataRoot) -> Self {
        DataLoader {
            root,
            client: reqwest::Client::new(),
        }
    }

    pub fn root(&self) -> &DataRoot {
        &self.root
    }

    /// Loads the collection at `path`.
    ///
    /// Fails on a non-success HTTP status, a transport error, a missing file or
    /// a body that is not JSON. A body that parses but is not an array yields
    /// an empty collection. Elements that do not deserialize as `T` are kept
    /// as `None` so positions are preserved.
    pub async fn load<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<Option<T>>> {
        let body = match &self.root {
            DataRoot::Http(base) => {
                let url = base
                    .join(path)
                    .map_err(|e| Error::InvalidRoot(format!("{path}: {e}")))?;
                info!("Fetching {}", url);
                let resp = self.client.get(url).send().await?;
                if !resp.status().is_success() {
                    return Err(Error::Status {
                        path: path.to_owned(),
                        status: resp.status().as_u16(),
                    });
                }
                let text = resp.text().await?;
                parse_json(path, &text)?
            }
            DataRoot::Dir(dir) => {
                let file = dir.join(path);
                info!("Reading {}", file.display());
                let text = tokio::fs::read_to_string(&file).await?;
                parse_json(path, &text)?
            }
        };
        Ok(parse_collection(path, body))
    }
}

fn parse_json(path: &str, text: &str) -> Result<Value> {
    serde_json::from_str(text).map_err(|source| Error::Json {
        path: path.to_owned(),
        source,
    })
}

/// Turns an already parsed JSON document into a collection of records.
pub fn parse_collection<T: DeserializeOwned>(path: &str, body: Value) -> Vec<Option<T>> {
    let Value::Array(items) = body else {
        warn!("{} is not a JSON array, treating as empty", path);
        return Vec::new();
    };
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match serde_json::from_value::<T>(item) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping entry {} of {}: {}", i, path, e);
                None
            }
        })
        .collect()
}
