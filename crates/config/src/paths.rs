//! Legacy path-mapping table.
//!
//! Responsibilities:
//! - Load the two-sheet path workbook (carried as CSV sheet exports) that
//!   maps logical data-type names to filesystem locations.
//! - Derive each row's placement mode once at load time from the MPON/RON
//!   override flags.
//! - Resolve logical names to absolute paths anchored per placement mode.
//!
//! Invariants:
//! - Exactly one placement mode may apply per row; a row with both override
//!   flags set is recorded as ambiguous and fails only when that row is
//!   resolved.
//! - An unmapped logical name is the "not found" sentinel (`Ok(None)`),
//!   never an error.
//! - Missing or unparsable sheet files yield an empty table, logged once.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use crate::constants::{MAIN_FOLDER_SHEET, PATH_TABLE_DIR, SUB_FOLDER_SHEET};
use crate::discover::{above_project_root, volume_root};
use crate::error::ConfigError;

/// How a logical path's base directory is anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementMode {
    /// `base / segment`, resolved relative to the project root.
    ProjectRelative,
    /// Prefixed with the directory one level above the project root
    /// (MPON flag).
    AboveProjectRoot,
    /// Prefixed with the root of the volume containing the project
    /// (RON flag).
    VolumeRoot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowPlacement {
    Mode(PlacementMode),
    /// Both override flags were set on the sheet row.
    Ambiguous,
}

/// One row of the merged path table.
#[derive(Debug, Clone)]
pub struct PathEntry {
    pub logical_name: String,
    /// Category base path joined with the row's relative segment.
    pub relative_segment: PathBuf,
    placement: RowPlacement,
}

impl PathEntry {
    /// The derived placement mode, or `None` for an ambiguous row.
    pub const fn placement_mode(&self) -> Option<PlacementMode> {
        match self.placement {
            RowPlacement::Mode(mode) => Some(mode),
            RowPlacement::Ambiguous => None,
        }
    }

    pub const fn is_ambiguous(&self) -> bool {
        matches!(self.placement, RowPlacement::Ambiguous)
    }
}

#[derive(Debug, Deserialize)]
struct MainFolderRow {
    folder_type: String,
    path: String,
}

#[derive(Debug, Deserialize)]
struct SubFolderRow {
    data_type: String,
    folder_type: String,
    #[serde(default)]
    folder_name: String,
    #[serde(rename = "MPON", default)]
    mpon: Option<String>,
    #[serde(rename = "RON", default)]
    ron: Option<String>,
}

fn flag_set(raw: Option<&str>) -> bool {
    matches!(
        raw.map(str::trim),
        Some("1") | Some("true") | Some("TRUE") | Some("True")
    )
}

/// Logical-name to path lookup backed by the legacy sheet exports.
#[derive(Debug, Clone)]
pub struct PathTable {
    entries: BTreeMap<String, PathEntry>,
    project_root: PathBuf,
    parent_root: PathBuf,
    volume: PathBuf,
}

impl PathTable {
    /// An empty table anchored at `project_root`.
    pub fn empty(project_root: &Path) -> Self {
        Self {
            entries: BTreeMap::new(),
            project_root: project_root.to_path_buf(),
            parent_root: above_project_root(project_root),
            volume: volume_root(project_root),
        }
    }

    /// Load the sheet exports from `config_dir/config_path/`, falling back
    /// to the legacy `project_root/config_path/` layout.
    pub fn load(config_dir: &Path, project_root: &Path) -> Self {
        let mut sheet_dir = config_dir.join(PATH_TABLE_DIR);
        if !sheet_dir.join(SUB_FOLDER_SHEET).exists() {
            // Pre-reorganization checkouts kept the sheets at the root.
            sheet_dir = project_root.join(PATH_TABLE_DIR);
        }

        let mut table = Self::empty(project_root);

        let Some(main_rows) = read_sheet::<MainFolderRow>(&sheet_dir.join(MAIN_FOLDER_SHEET))
        else {
            return table;
        };
        let Some(sub_rows) = read_sheet::<SubFolderRow>(&sheet_dir.join(SUB_FOLDER_SHEET)) else {
            return table;
        };

        let categories: BTreeMap<String, PathBuf> = main_rows
            .into_iter()
            .map(|row| (row.folder_type, PathBuf::from(row.path)))
            .collect();

        for row in sub_rows {
            let Some(base) = categories.get(&row.folder_type) else {
                warn!(
                    logical_name = %row.data_type,
                    category = %row.folder_type,
                    "path table row references an unknown folder category; skipping"
                );
                continue;
            };

            let mpon = flag_set(row.mpon.as_deref());
            let ron = flag_set(row.ron.as_deref());
            let placement = match (mpon, ron) {
                (true, true) => RowPlacement::Ambiguous,
                (true, false) => RowPlacement::Mode(PlacementMode::AboveProjectRoot),
                (false, true) => RowPlacement::Mode(PlacementMode::VolumeRoot),
                (false, false) => RowPlacement::Mode(PlacementMode::ProjectRelative),
            };

            let relative_segment = if row.folder_name.is_empty() {
                base.clone()
            } else {
                base.join(&row.folder_name)
            };

            table.entries.insert(
                row.data_type.clone(),
                PathEntry {
                    logical_name: row.data_type,
                    relative_segment,
                    placement,
                },
            );
        }

        table
    }

    /// Resolve `logical_name` to an absolute path.
    ///
    /// Returns `Ok(None)` when the name has no row, and
    /// `ConfigError::AmbiguousPlacement` when the row carries both override
    /// flags.
    pub fn resolve(&self, logical_name: &str) -> Result<Option<PathBuf>, ConfigError> {
        let Some(entry) = self.entries.get(logical_name) else {
            return Ok(None);
        };
        let anchor = match entry.placement {
            RowPlacement::Ambiguous => {
                return Err(ConfigError::AmbiguousPlacement {
                    logical_name: logical_name.to_string(),
                });
            }
            RowPlacement::Mode(PlacementMode::ProjectRelative) => &self.project_root,
            RowPlacement::Mode(PlacementMode::AboveProjectRoot) => &self.parent_root,
            RowPlacement::Mode(PlacementMode::VolumeRoot) => &self.volume,
        };
        // join() keeps already-absolute segments intact.
        Ok(Some(anchor.join(&entry.relative_segment)))
    }

    pub fn entry(&self, logical_name: &str) -> Option<&PathEntry> {
        self.entries.get(logical_name)
    }

    pub fn logical_names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Read one sheet export; any open or header failure yields `None` with a
/// single warning, malformed records are skipped individually.
fn read_sheet<T: for<'de> Deserialize<'de>>(path: &Path) -> Option<Vec<T>> {
    let mut reader = match csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
    {
        Ok(reader) => reader,
        Err(error) => {
            warn!(path = %path.display(), %error, "path table sheet unavailable; using empty table");
            return None;
        }
    };

    let mut rows = Vec::new();
    for record in reader.deserialize() {
        match record {
            Ok(row) => rows.push(row),
            Err(error) => {
                warn!(path = %path.display(), %error, "skipping malformed path table row");
            }
        }
    }
    Some(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_sheets(dir: &Path, main: &str, sub: &str) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join(MAIN_FOLDER_SHEET), main).unwrap();
        fs::write(dir.join(SUB_FOLDER_SHEET), sub).unwrap();
    }

    fn sample_table(tmp: &TempDir) -> (PathTable, PathBuf) {
        let project_root = tmp.path().join("project");
        let config_dir = project_root.join("config");
        write_sheets(
            &config_dir.join(PATH_TABLE_DIR),
            "folder_type,path\nfactor,output\nshared,data_update\n",
            "data_type,folder_type,folder_name,MPON,RON\n\
             output_factor_exposure,factor,factor_exposure,0,0\n\
             shared_universe,shared,universe,1,0\n\
             volume_cache,factor,cache,0,1\n\
             broken_row,factor,broken,1,1\n",
        );
        (PathTable::load(&config_dir, &project_root), project_root)
    }

    #[test]
    fn test_project_relative_placement() {
        let tmp = TempDir::new().unwrap();
        let (table, project_root) = sample_table(&tmp);
        assert_eq!(
            table.resolve("output_factor_exposure").unwrap(),
            Some(project_root.join("output").join("factor_exposure"))
        );
    }

    #[test]
    fn test_above_project_root_placement() {
        let tmp = TempDir::new().unwrap();
        let (table, project_root) = sample_table(&tmp);
        assert_eq!(
            table.resolve("shared_universe").unwrap(),
            Some(
                project_root
                    .parent()
                    .unwrap()
                    .join("data_update")
                    .join("universe")
            )
        );
    }

    #[test]
    fn test_volume_root_placement() {
        let tmp = TempDir::new().unwrap();
        let (table, project_root) = sample_table(&tmp);
        let resolved = table.resolve("volume_cache").unwrap().unwrap();
        assert_eq!(
            resolved,
            volume_root(&project_root).join("output").join("cache")
        );
        assert!(resolved.is_absolute());
    }

    #[test]
    fn test_ambiguous_row_errors_only_when_resolved() {
        let tmp = TempDir::new().unwrap();
        let (table, _) = sample_table(&tmp);

        // Other rows still work.
        assert!(table.resolve("output_factor_exposure").unwrap().is_some());

        let err = table.resolve("broken_row").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::AmbiguousPlacement { ref logical_name } if logical_name == "broken_row"
        ));
    }

    #[test]
    fn test_unknown_name_is_not_found_sentinel() {
        let tmp = TempDir::new().unwrap();
        let (table, _) = sample_table(&tmp);
        assert_eq!(table.resolve("nonexistent_key_12345").unwrap(), None);
    }

    #[test]
    fn test_missing_sheets_yield_empty_table() {
        let tmp = TempDir::new().unwrap();
        let project_root = tmp.path().join("project");
        fs::create_dir_all(&project_root).unwrap();
        let table = PathTable::load(&project_root.join("config"), &project_root);
        assert!(table.is_empty());
        assert_eq!(table.resolve("anything").unwrap(), None);
    }

    #[test]
    fn test_legacy_sheet_location_is_probed() {
        let tmp = TempDir::new().unwrap();
        let project_root = tmp.path().join("project");
        write_sheets(
            &project_root.join(PATH_TABLE_DIR),
            "folder_type,path\nfactor,output\n",
            "data_type,folder_type,folder_name,MPON,RON\nout,factor,exposure,0,0\n",
        );
        let table = PathTable::load(&project_root.join("config"), &project_root);
        assert_eq!(
            table.resolve("out").unwrap(),
            Some(project_root.join("output").join("exposure"))
        );
    }

    #[test]
    fn test_unknown_category_rows_are_skipped() {
        let tmp = TempDir::new().unwrap();
        let project_root = tmp.path().join("project");
        let config_dir = project_root.join("config");
        write_sheets(
            &config_dir.join(PATH_TABLE_DIR),
            "folder_type,path\nfactor,output\n",
            "data_type,folder_type,folder_name,MPON,RON\n\
             good,factor,exposure,0,0\n\
             orphan,missing_category,x,0,0\n",
        );
        let table = PathTable::load(&config_dir, &project_root);
        assert_eq!(table.len(), 1);
        assert_eq!(table.resolve("orphan").unwrap(), None);
    }

    #[test]
    fn test_empty_segment_uses_category_base() {
        let tmp = TempDir::new().unwrap();
        let project_root = tmp.path().join("project");
        let config_dir = project_root.join("config");
        write_sheets(
            &config_dir.join(PATH_TABLE_DIR),
            "folder_type,path\ntimeseries,output/timeseries\n",
            "data_type,folder_type,folder_name,MPON,RON\noutput_timeseries,timeseries,,0,0\n",
        );
        let table = PathTable::load(&config_dir, &project_root);
        assert_eq!(
            table.resolve("output_timeseries").unwrap(),
            Some(project_root.join("output/timeseries"))
        );
    }
}
