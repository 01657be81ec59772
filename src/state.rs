use crate::config::Config;
use crate::errors::StartupError;
use crate::events::{EventBindings, wire_events};
use crate::links::load_links;
use crate::loader::SnapshotLoader;
use crate::models::DirectoryStructure;
use crate::scanner::scan;
use crate::ui::{PageMeta, compose, render_page};
use axum::body::Bytes;
use chrono::Local;
use std::sync::Arc;
use tracing::info;

/// Everything built once at startup. All of it is read-only while serving.
#[derive(Clone)]
pub struct AppState {
    pub page: Bytes,
    pub structure: Arc<DirectoryStructure>,
    pub bindings: Arc<EventBindings>,
    pub loader: Arc<SnapshotLoader>,
}

impl AppState {
    pub fn new(
        page: String,
        structure: DirectoryStructure,
        bindings: EventBindings,
        loader: SnapshotLoader,
    ) -> Self {
        Self {
            page: Bytes::from(page),
            structure: Arc::new(structure),
            bindings: Arc::new(bindings),
            loader: Arc::new(loader),
        }
    }

    pub async fn build(config: &Config) -> Result<Self, StartupError> {
        let links = load_links(&config.links_path()).await?;
        info!(links = links.len(), "loaded footer links");

        let structure = scan(&config.data_dir).map_err(StartupError::Scan)?;
        let loader = SnapshotLoader::new(&config.data_dir);
        let tree = compose(&structure, &loader);
        let bindings = wire_events(&tree);
        info!(selectors = bindings.len(), "composed page");

        let page = render_page(&tree, &links, &PageMeta::new(&config.title, Local::now()));
        Ok(Self::new(page, structure, bindings, loader))
    }
}
