use crate::loader::SnapshotLoader;
use crate::models::{BindingInfo, Table};
use crate::ui::{BindingId, UiTree};
use std::collections::BTreeMap;
use tracing::warn;

/// Handler state for one sub-category selector.
///
/// The `(category, sub_category)` pair is copied in when the binding is made
/// and never changes afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct LoaderBinding {
    category: String,
    sub_category: String,
    options: Vec<String>,
}

impl LoaderBinding {
    pub fn new(
        category: impl Into<String>,
        sub_category: impl Into<String>,
        options: Vec<String>,
    ) -> Self {
        Self {
            category: category.into(),
            sub_category: sub_category.into(),
            options,
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn sub_category(&self) -> &str {
        &self.sub_category
    }

    /// Runs the selector's change event: loads `identifier` from this
    /// binding's own directory.
    pub fn handle(&self, loader: &SnapshotLoader, identifier: &str) -> Table {
        if !self.options.iter().any(|option| option == identifier) {
            warn!(
                category = %self.category,
                sub_category = %self.sub_category,
                identifier,
                "selection is not one of the scanned snapshots"
            );
            return Table::error(format!("unknown snapshot: {identifier}"));
        }
        loader.load(&self.category, &self.sub_category, identifier)
    }
}

#[derive(Debug, Clone, Default)]
pub struct EventBindings {
    bindings: BTreeMap<BindingId, LoaderBinding>,
}

impl EventBindings {
    pub fn get(&self, id: BindingId) -> Option<&LoaderBinding> {
        self.bindings.get(&id)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn describe(&self) -> Vec<BindingInfo> {
        self.bindings
            .iter()
            .map(|(id, binding)| BindingInfo {
                id: *id,
                category: binding.category.clone(),
                sub_category: binding.sub_category.clone(),
                options: binding.options.clone(),
            })
            .collect()
    }
}

/// Attaches a loader binding to every selector in the tree.
pub fn wire_events(tree: &UiTree) -> EventBindings {
    let bindings = tree
        .panels()
        .map(|panel| {
            let binding = LoaderBinding::new(
                panel.category.as_str(),
                panel.sub_category.as_str(),
                panel.selector.options.clone(),
            );
            (panel.binding, binding)
        })
        .collect();
    EventBindings { bindings }
}
