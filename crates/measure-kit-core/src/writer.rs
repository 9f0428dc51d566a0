//! Artifact writer - lays out an execution project on disk
//!
//! ```text
//! <root>/
//!   package.json
//!   index.js              (only when the entry-point library was found)
//!   vsmap.json
//!   elm/<Library>.json
//!   cql/<Library>.cql     (only for libraries that ship CQL source)
//!   patient-bundle.json
//!   measure-bundle.json
//! ```
//!
//! Existing directories are reused and existing files overwritten. A source
//! bundle that already sits at its destination (a re-run over a previous
//! output) is left in place.

use crate::error::MeasureKitError;
use crate::project::ExecutionProject;
use crate::result::Result;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const VALUE_SET_MAP_FILE: &str = "vsmap.json";
pub const PACKAGE_JSON_FILE: &str = "package.json";
pub const INDEX_JS_FILE: &str = "index.js";
pub const PATIENT_BUNDLE_FILE: &str = "patient-bundle.json";
pub const MEASURE_BUNDLE_FILE: &str = "measure-bundle.json";
pub const ELM_DIR: &str = "elm";
pub const CQL_DIR: &str = "cql";

/// Statistics for the file writing phase
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteStats {
    /// Number of files written (including copied bundles)
    pub files_written: usize,
    /// Total bytes written
    pub bytes_written: usize,
    pub libraries: usize,
    pub value_sets: usize,
    pub codes: usize,
    /// ELM file name substituted into index.js
    pub entry_point: Option<String>,
}

impl WriteStats {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, bytes: usize) {
        self.files_written += 1;
        self.bytes_written += bytes;
    }
}

impl fmt::Display for WriteStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} files written ({} bytes), {} libraries, {} value sets, {} codes",
            self.files_written, self.bytes_written, self.libraries, self.value_sets, self.codes
        )?;
        if let Some(entry) = &self.entry_point {
            write!(f, ", entry point {entry}")?;
        }
        Ok(())
    }
}

/// Input bundles copied verbatim into the project
#[derive(Debug, Clone)]
pub struct SourceBundles {
    pub measure_bundle: PathBuf,
    pub patient_bundle: PathBuf,
}

/// Writes an [`ExecutionProject`] below a root directory
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    root: PathBuf,
    clean: bool,
}

impl ArtifactWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            clean: false,
        }
    }

    /// Remove the root directory before writing
    pub fn with_clean(mut self, clean: bool) -> Self {
        self.clean = clean;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write every project file and copy the source bundles
    pub fn write_project(
        &self,
        project: &ExecutionProject,
        sources: &SourceBundles,
    ) -> Result<WriteStats> {
        self.check_sources(sources)?;

        if self.clean && self.root.exists() {
            debug!("Cleaning {}", self.root.display());
            fs::remove_dir_all(&self.root).map_err(|e| MeasureKitError::io_error(&self.root, e))?;
        }

        let elm_dir = self.root.join(ELM_DIR);
        let cql_dir = self.root.join(CQL_DIR);
        for dir in [&self.root, &elm_dir, &cql_dir] {
            fs::create_dir_all(dir).map_err(|e| MeasureKitError::io_error(dir, e))?;
        }

        let mut stats = WriteStats::new();

        let vs_map = project
            .terminology
            .to_json_string()
            .map_err(|e| MeasureKitError::template_error(e.to_string()))?;
        self.write_file(&self.root.join(VALUE_SET_MAP_FILE), &vs_map, &mut stats)?;
        stats.value_sets = project.terminology.len();
        stats.codes = project.terminology.code_count();

        self.write_file(
            &self.root.join(PACKAGE_JSON_FILE),
            &project.package_json,
            &mut stats,
        )?;

        for library in &project.libraries {
            let artifact = &library.artifact;
            self.write_file(
                &elm_dir.join(artifact.elm_file_name()),
                &artifact.compiled_logic,
                &mut stats,
            )?;
            if let Some(cql) = &artifact.source_logic {
                self.write_file(&cql_dir.join(artifact.cql_file_name()), cql, &mut stats)?;
            }
            stats.libraries += 1;
        }

        if let Some(index_js) = &project.index_js {
            self.write_file(&self.root.join(INDEX_JS_FILE), index_js, &mut stats)?;
            stats.entry_point = project
                .entry_point()
                .map(|entry| entry.artifact.elm_file_name());
        }

        self.copy_file(
            &sources.patient_bundle,
            &self.root.join(PATIENT_BUNDLE_FILE),
            &mut stats,
        )?;
        self.copy_file(
            &sources.measure_bundle,
            &self.root.join(MEASURE_BUNDLE_FILE),
            &mut stats,
        )?;

        Ok(stats)
    }

    /// Refuse to clean a root that holds one of the input bundles
    fn check_sources(&self, sources: &SourceBundles) -> Result<()> {
        if !self.clean || !self.root.exists() {
            return Ok(());
        }
        let root = canonical(&self.root)?;
        for source in [&sources.measure_bundle, &sources.patient_bundle] {
            if canonical(source)?.starts_with(&root) {
                return Err(MeasureKitError::config_error(format!(
                    "Refusing to clean {}: input bundle {} is inside it",
                    self.root.display(),
                    source.display()
                )));
            }
        }
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str, stats: &mut WriteStats) -> Result<()> {
        debug!("Writing {}", path.display());
        fs::write(path, content).map_err(|e| MeasureKitError::io_error(path, e))?;
        stats.record(content.len());
        Ok(())
    }

    fn copy_file(&self, from: &Path, to: &Path, stats: &mut WriteStats) -> Result<()> {
        if to.exists() && canonical(from)? == canonical(to)? {
            debug!("{} is already in place", to.display());
            return Ok(());
        }
        debug!("Copying {} -> {}", from.display(), to.display());
        let bytes = fs::copy(from, to).map_err(|e| MeasureKitError::io_error(from, e))?;
        stats.record(bytes as usize);
        Ok(())
    }
}

fn canonical(path: &Path) -> Result<PathBuf> {
    path.canonicalize().map_err(|e| MeasureKitError::io_error(path, e))
}
