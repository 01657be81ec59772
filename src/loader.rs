use crate::models::{Cell, ColumnKind, Table};
use crate::scanner::SNAPSHOT_EXTENSION;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

pub const MISSING_FILE_MESSAGE: &str = "file does not exist";

/// Reads snapshot files under a fixed data root.
///
/// Every call goes back to disk; nothing is cached between loads.
#[derive(Debug, Clone)]
pub struct SnapshotLoader {
    root: PathBuf,
}

impl SnapshotLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Loads `root/category/sub_category/identifier.csv`.
    ///
    /// Never fails: a missing or unparseable file comes back as an error table.
    pub fn load(&self, category: &str, sub_category: &str, identifier: &str) -> Table {
        let Some(path) = self.snapshot_path(category, sub_category, identifier) else {
            warn!(category, sub_category, identifier, "rejected snapshot path");
            return Table::error(MISSING_FILE_MESSAGE);
        };
        if !path.exists() {
            warn!("snapshot {} does not exist", path.display());
            return Table::error(MISSING_FILE_MESSAGE);
        }

        match read_table(&path) {
            Ok(table) => {
                debug!(rows = table.rows.len(), "loaded {}", path.display());
                table
            }
            Err(err) => {
                warn!("failed to parse {}: {err}", path.display());
                Table::error(err.to_string())
            }
        }
    }

    fn snapshot_path(&self, category: &str, sub_category: &str, identifier: &str) -> Option<PathBuf> {
        let file_name = format!("{identifier}{SNAPSHOT_EXTENSION}");
        let mut path = self.root.clone();
        for part in [category, sub_category, file_name.as_str()] {
            if !is_plain_component(part) {
                return None;
            }
            path.push(part);
        }
        if identifier.is_empty() {
            return None;
        }
        Some(path)
    }
}

fn is_plain_component(part: &str) -> bool {
    let mut components = Path::new(part).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(name)), None) if name == part
    )
}

#[derive(Debug, thiserror::Error)]
enum ParseError {
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("no columns to parse from file")]
    NoColumns,
}

fn read_table(path: &Path) -> Result<Table, ParseError> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_path(path)?;
    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if columns.is_empty() {
        return Err(ParseError::NoColumns);
    }

    let mut raw_rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        raw_rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }

    let kinds: Vec<ColumnKind> = (0..columns.len())
        .map(|index| ColumnKind::infer(raw_rows.iter().map(|row| row[index].as_str())))
        .collect();

    let rows = raw_rows
        .into_iter()
        .map(|row| {
            row.into_iter()
                .zip(kinds.iter().copied())
                .map(|(field, kind)| kind.cell(field))
                .collect()
        })
        .collect();

    Ok(Table {
        columns,
        kinds,
        rows,
        error: false,
    })
}

impl ColumnKind {
    /// Narrowest type every non-empty field of the column parses as.
    fn infer<'a>(fields: impl Iterator<Item = &'a str> + Clone) -> Self {
        let mut values = fields.filter(|field| !field.trim().is_empty());
        if values.clone().next().is_none() {
            return ColumnKind::Text;
        }
        if values.clone().all(|v| v.trim().parse::<i64>().is_ok()) {
            ColumnKind::Int
        } else if values.clone().all(|v| v.trim().parse::<f64>().is_ok()) {
            ColumnKind::Float
        } else if values.all(|v| parse_bool(v).is_some()) {
            ColumnKind::Bool
        } else {
            ColumnKind::Text
        }
    }

    fn cell(self, field: String) -> Cell {
        let trimmed = field.trim();
        if trimmed.is_empty() {
            return Cell::Null;
        }
        match self {
            ColumnKind::Int => trimmed.parse().map(Cell::Int).unwrap_or(Cell::Text(field)),
            ColumnKind::Float => trimmed.parse().map(Cell::Float).unwrap_or(Cell::Text(field)),
            ColumnKind::Bool => parse_bool(trimmed).map(Cell::Bool).unwrap_or(Cell::Text(field)),
            ColumnKind::Text => Cell::Text(field),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, body: &[u8]) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, body).unwrap();
    }

    #[test]
    fn load_well_formed_file() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "models/2024/202401.csv",
            b"model,score,rank\nalpha,91.5,1\nbeta,88,2\ngamma,,3\n",
        );

        let table = SnapshotLoader::new(dir.path()).load("models", "2024", "202401");
        assert_eq!(table.columns, vec!["model", "score", "rank"]);
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[0][0], Cell::Text("alpha".into()));
        assert_eq!(table.rows[0][1], Cell::Float(91.5));
        assert_eq!(table.rows[1][1], Cell::Float(88.0));
        assert_eq!(table.rows[2][1], Cell::Null);
        assert_eq!(table.rows[2][2], Cell::Int(3));
        assert_eq!(
            table.kinds,
            vec![ColumnKind::Text, ColumnKind::Float, ColumnKind::Int]
        );
        assert!(!table.is_error());
    }

    #[test]
    fn error_named_column_is_still_data() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a/b/log.csv", b"error
timeout
");

        let table = SnapshotLoader::new(dir.path()).load("a", "b", "log");
        assert!(!table.is_error());
        assert_eq!(table.error_message(), None);
        assert_eq!(table.rows[0][0], Cell::Text("timeout".into()));
    }

    #[test]
    fn header_only_file_has_no_rows() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a/b/empty.csv", b"x,y\n");

        let table = SnapshotLoader::new(dir.path()).load("a", "b", "empty");
        assert_eq!(table.columns, vec!["x", "y"]);
        assert!(table.rows.is_empty());
        assert!(!table.is_error());
    }

    #[test]
    fn bool_columns_are_typed() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a/b/flags.csv", b"open\nTrue\nfalse\n");

        let table = SnapshotLoader::new(dir.path()).load("a", "b", "flags");
        assert_eq!(table.rows[0][0], Cell::Bool(true));
        assert_eq!(table.rows[1][0], Cell::Bool(false));
    }

    #[test]
    fn missing_file_is_error_table() {
        let dir = TempDir::new().unwrap();
        let table = SnapshotLoader::new(dir.path()).load("models", "2024", "missing");
        assert_eq!(table.error_message(), Some(MISSING_FILE_MESSAGE));
        assert_eq!(table.columns.len(), 1);
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn inconsistent_columns_are_error_table() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a/b/bad.csv", b"x,y\n1,2\n3,4,5\n");

        let table = SnapshotLoader::new(dir.path()).load("a", "b", "bad");
        assert!(table.is_error());
        assert_ne!(table.error_message(), Some(MISSING_FILE_MESSAGE));
    }

    #[test]
    fn invalid_utf8_is_error_table() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a/b/bin.csv", b"x,y\n\xff\xfe,1\n");

        let table = SnapshotLoader::new(dir.path()).load("a", "b", "bin");
        assert!(table.is_error());
    }

    #[test]
    fn empty_file_is_error_table() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a/b/blank.csv", b"");

        let table = SnapshotLoader::new(dir.path()).load("a", "b", "blank");
        assert_eq!(table.error_message(), Some("no columns to parse from file"));
    }

    #[test]
    fn stale_identifier_is_error_table() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "models/2024/202402.csv", b"a\n1\n");
        let loader = SnapshotLoader::new(dir.path());
        assert!(!loader.load("models", "2024", "202402").is_error());

        fs::remove_file(dir.path().join("models/2024/202402.csv")).unwrap();
        let table = loader.load("models", "2024", "202402");
        assert_eq!(table.error_message(), Some(MISSING_FILE_MESSAGE));
    }

    #[test]
    fn every_load_rereads_the_file() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a/b/c.csv", b"n\n1\n");
        let loader = SnapshotLoader::new(dir.path());
        assert_eq!(loader.load("a", "b", "c").rows.len(), 1);

        write(dir.path(), "a/b/c.csv", b"n\n1\n2\n");
        assert_eq!(loader.load("a", "b", "c").rows.len(), 2);
    }

    #[test]
    fn path_escapes_are_treated_as_missing() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "secret.csv", b"k\nv\n");
        write(dir.path(), "a/b/ok.csv", b"k\nv\n");
        let loader = SnapshotLoader::new(dir.path().join("a"));

        for (category, sub, id) in [
            ("..", "a", "secret"),
            ("b", "..", "ok"),
            ("b", ".", "ok"),
            ("b", "", "ok"),
            ("b", "x/../", "ok"),
            ("b", "c", "../ok"),
            ("b", "c", ""),
        ] {
            let table = loader.load(category, sub, id);
            assert_eq!(table.error_message(), Some(MISSING_FILE_MESSAGE), "{category}/{sub}/{id}");
        }
    }
}
