use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// Snapshots discovered under the data root, in display order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectoryStructure {
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub name: String,
    pub sub_categories: Vec<SubCategory>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubCategory {
    pub name: String,
    pub snapshots: Vec<String>,
}

impl DirectoryStructure {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn snapshots(&self, category: &str, sub_category: &str) -> Option<&[String]> {
        self.categories
            .iter()
            .find(|c| c.name == category)?
            .sub_categories
            .iter()
            .find(|s| s.name == sub_category)
            .map(|s| s.snapshots.as_slice())
    }

    pub fn snapshot_count(&self) -> usize {
        self.categories
            .iter()
            .flat_map(|c| &c.sub_categories)
            .map(|s| s.snapshots.len())
            .sum()
    }
}

// Serialized as nested objects so the JSON mirrors the directory layout.
impl Serialize for DirectoryStructure {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.categories.len()))?;
        for category in &self.categories {
            map.serialize_entry(&category.name, &SubCategories(&category.sub_categories))?;
        }
        map.end()
    }
}

struct SubCategories<'a>(&'a [SubCategory]);

impl Serialize for SubCategories<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for sub in self.0 {
            map.serialize_entry(&sub.name, &sub.snapshots)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Cell {
    pub fn display(&self) -> String {
        match self {
            Cell::Null => String::new(),
            Cell::Bool(value) => value.to_string(),
            Cell::Int(value) => value.to_string(),
            Cell::Float(value) if value.is_finite() && value.fract() == 0.0 => {
                format!("{value:.1}")
            }
            Cell::Float(value) => value.to_string(),
            Cell::Text(value) => value.clone(),
        }
    }
}

/// Type inferred for a whole column. Sent alongside the cells so the page
/// can format values the same way the server does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Int,
    Float,
    Bool,
    Text,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<String>,
    #[serde(default)]
    pub kinds: Vec<ColumnKind>,
    pub rows: Vec<Vec<Cell>>,
    /// Set only on tables standing in for a failed load.
    #[serde(default)]
    pub error: bool,
}

pub const ERROR_COLUMN: &str = "error";

impl Table {
    /// One-column, one-row table shown in place of data when a load fails.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            columns: vec![ERROR_COLUMN.to_string()],
            kinds: vec![ColumnKind::Text],
            rows: vec![vec![Cell::Text(message.into())]],
            error: true,
        }
    }

    pub fn is_error(&self) -> bool {
        self.error
    }

    pub fn error_message(&self) -> Option<&str> {
        if !self.is_error() {
            return None;
        }
        match self.rows.first()?.first() {
            Some(Cell::Text(message)) => Some(message),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub identifier: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BindingInfo {
    pub id: usize,
    pub category: String,
    pub sub_category: String,
    pub options: Vec<String>,
}
