use crate::models::{Category, DirectoryStructure, SubCategory};
use std::{fs, io, path::Path};
use tracing::{info, warn};

pub const SNAPSHOT_EXTENSION: &str = ".csv";

/// Walks `root/<category>/<sub_category>/*.csv`.
///
/// A missing root yields an empty structure. Category and sub-category order
/// follows directory enumeration; snapshot ids are sorted ascending.
pub fn scan(root: &Path) -> io::Result<DirectoryStructure> {
    if !root.exists() {
        info!("data directory {} not found, nothing to show", root.display());
        return Ok(DirectoryStructure::default());
    }

    let mut categories = Vec::new();
    for (name, path) in subdirectories(root)? {
        let mut sub_categories = Vec::new();
        for (sub_name, sub_path) in subdirectories(&path)? {
            sub_categories.push(SubCategory {
                name: sub_name,
                snapshots: snapshot_ids(&sub_path)?,
            });
        }
        categories.push(Category {
            name,
            sub_categories,
        });
    }

    let structure = DirectoryStructure { categories };
    info!(
        categories = structure.categories.len(),
        snapshots = structure.snapshot_count(),
        "scanned {}",
        root.display()
    );
    Ok(structure)
}

fn subdirectories(dir: &Path) -> io::Result<Vec<(String, std::path::PathBuf)>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => dirs.push((name, path)),
            Err(raw) => warn!("skipping non utf-8 directory name {raw:?}"),
        }
    }
    Ok(dirs)
}

fn snapshot_ids(dir: &Path) -> io::Result<Vec<String>> {
    let mut ids = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(raw) => {
                warn!("skipping non utf-8 file name {raw:?}");
                continue;
            }
        };
        // A bare `.csv` has no identifier the loader could address.
        let Some(id) = name.strip_suffix(SNAPSHOT_EXTENSION).filter(|id| !id.is_empty()) else {
            continue;
        };
        if entry.path().is_file() {
            ids.push(id.to_string());
        }
    }
    ids.sort();
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "a,b\n1,2\n").unwrap();
    }

    #[test]
    fn scan_missing_root_is_empty() {
        let dir = TempDir::new().unwrap();
        let structure = scan(&dir.path().join("nope")).unwrap();
        assert!(structure.is_empty());
    }

    #[test]
    fn scan_empty_root_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(scan(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn scan_models_example() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "models/2024/202402.csv");
        touch(dir.path(), "models/2024/202401.csv");

        let structure = scan(dir.path()).unwrap();
        assert_eq!(
            serde_json::to_value(&structure).unwrap(),
            serde_json::json!({"models": {"2024": ["202401", "202402"]}})
        );
    }

    #[test]
    fn scan_ignores_loose_files_and_other_extensions() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "link.json");
        touch(dir.path(), "models/readme.txt");
        touch(dir.path(), "models/2024/notes.txt");
        touch(dir.path(), "models/2024/202403.csv");
        touch(dir.path(), "models/2024/202401.csv");
        fs::create_dir_all(dir.path().join("models/2024/folder.csv")).unwrap();

        let structure = scan(dir.path()).unwrap();
        assert_eq!(structure.categories.len(), 1);
        let category = &structure.categories[0];
        assert_eq!(category.sub_categories.len(), 1);
        assert_eq!(
            category.sub_categories[0].snapshots,
            vec!["202401".to_string(), "202403".to_string()]
        );
    }

    #[test]
    fn scan_skips_files_without_a_stem() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "m/s/.csv");
        touch(dir.path(), "m/s/202401.csv");

        let structure = scan(dir.path()).unwrap();
        assert_eq!(
            structure.snapshots("m", "s").map(|ids| ids.to_vec()),
            Some(vec!["202401".to_string()])
        );

        let loader = crate::loader::SnapshotLoader::new(dir.path());
        let tree = crate::ui::compose(&structure, &loader);
        let panel = &tree.tabs[0].panels[0];
        assert_eq!(panel.selector.selected.as_deref(), Some("202401"));
        assert!(!panel.table.is_error());
    }

    #[test]
    fn scan_keeps_empty_sub_categories() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("models/empty")).unwrap();

        let structure = scan(dir.path()).unwrap();
        assert_eq!(structure.snapshots("models", "empty").map(|ids| ids.len()), Some(0));
    }

    #[test]
    fn scan_ids_are_sorted_and_unique() {
        let dir = TempDir::new().unwrap();
        for id in ["b", "a", "c", "aa", "202501", "202412"] {
            touch(dir.path(), &format!("x/y/{id}.csv"));
        }
        touch(dir.path(), "z/w/only.csv");

        let structure = scan(dir.path()).unwrap();
        for category in &structure.categories {
            for sub in &category.sub_categories {
                let mut expected = sub.snapshots.clone();
                expected.sort();
                expected.dedup();
                assert_eq!(sub.snapshots, expected);
            }
        }
        assert_eq!(structure.snapshot_count(), 7);
    }
}
