use crate::errors::StartupError;
use serde_json::Value;
use std::path::Path;
use tokio::fs;

/// Footer links in the order they appear in `link.json`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkRegistry {
    entries: Vec<(String, String)>,
}

impl LinkRegistry {
    pub fn new(entries: Vec<(String, String)>) -> Self {
        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(label, url)| (label.as_str(), url.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, StartupError> {
        let value: Value = serde_json::from_slice(bytes)?;
        let Value::Object(map) = value else {
            return Err(StartupError::LinksNotObject);
        };

        let mut entries = Vec::with_capacity(map.len());
        for (label, url) in map {
            match url {
                Value::String(url) => entries.push((label, url)),
                _ => return Err(StartupError::LinkNotString(label)),
            }
        }
        Ok(Self { entries })
    }
}

pub async fn load_links(path: &Path) -> Result<LinkRegistry, StartupError> {
    let bytes = fs::read(path).await.map_err(|source| StartupError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    LinkRegistry::from_json(&bytes)
}
