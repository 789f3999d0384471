use crate::core::models::topology::BondOrder;
use crate::core::utils::identifiers::normalize_atom_name;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock, PoisonError};
use thiserror::Error;
use tracing::{debug, info};

pub const AMINO_ACIDS_FILE: &str = "amino_acids.txt";
pub const OTHER_RESIDUES_FILE: &str = "other_residues.txt";

const BUNDLED_AMINO_ACIDS: &str = include_str!("../../../data/amino_acids.txt");
const BUNDLED_OTHER_RESIDUES: &str = include_str!("../../../data/other_residues.txt");

static BUNDLED_STORE: OnceLock<ResidueTemplateStore> = OnceLock::new();

/// A known intra-residue bond, expressed with normalized atom names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateBond {
    pub atom1: String,
    pub atom2: String,
    pub order: BondOrder,
}

pub type TemplateTable = HashMap<String, Vec<TemplateBond>>;

#[derive(Debug, Error)]
pub enum TemplateLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Malformed template record in '{origin}' at line {line}: {reason}")]
    Parse {
        origin: String,
        line: usize,
        reason: String,
    },
}

/// Where the records of one template tier come from.
#[derive(Debug, Clone)]
pub enum TemplateSource {
    File(PathBuf),
    Text {
        label: String,
        content: Cow<'static, str>,
    },
}

impl TemplateSource {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    pub fn text(label: &str, content: impl Into<Cow<'static, str>>) -> Self {
        Self::Text {
            label: label.to_string(),
            content: content.into(),
        }
    }

    fn load(&self) -> Result<TemplateTable, TemplateLoadError> {
        match self {
            Self::File(path) => {
                let content =
                    std::fs::read_to_string(path).map_err(|e| TemplateLoadError::Io {
                        path: path.to_string_lossy().to_string(),
                        source: e,
                    })?;
                parse_templates(&content, &path.to_string_lossy())
            }
            Self::Text { label, content } => parse_templates(content, label),
        }
    }
}

impl fmt::Display for TemplateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Text { label, .. } => write!(f, "{}", label),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tier {
    Base,
    Extended,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base => write!(f, "base"),
            Self::Extended => write!(f, "extended"),
        }
    }
}

/// Parses residue bond templates.
///
/// Each record is a line naming the residue followed by `atom1 atom2 order` lines; a blank
/// line (or the end of input) closes the record. Atom names are normalized on the way in.
/// A residue named twice accumulates the bonds of both records.
pub fn parse_templates(content: &str, origin: &str) -> Result<TemplateTable, TemplateLoadError> {
    let mut table = TemplateTable::new();
    let mut current: Option<String> = None;

    for (line_num, line) in content.lines().enumerate() {
        let line_num = line_num + 1;
        let trimmed = line.trim();

        if trimmed.is_empty() {
            current = None;
            continue;
        }

        if current.is_none() {
            let residue = trimmed.to_ascii_uppercase();
            table.entry(residue.clone()).or_default();
            current = Some(residue);
            continue;
        }

        let parse_error = |reason: String| TemplateLoadError::Parse {
            origin: origin.to_string(),
            line: line_num,
            reason,
        };

        let mut fields = trimmed.split_whitespace();
        let (Some(atom1), Some(atom2), Some(order_str)) =
            (fields.next(), fields.next(), fields.next())
        else {
            return Err(parse_error(format!(
                "expected '<atom1> <atom2> <bond_order>', found '{}'",
                trimmed
            )));
        };

        let order = order_str
            .parse::<BondOrder>()
            .map_err(|e| parse_error(e.to_string()))?;

        if let Some(bonds) = current.as_ref().and_then(|r| table.get_mut(r)) {
            bonds.push(TemplateBond {
                atom1: normalize_atom_name(atom1),
                atom2: normalize_atom_name(atom2),
                order,
            });
        }
    }

    Ok(table)
}

/// Residue bond templates, loaded lazily from two tiers of sources.
///
/// The base tier (standard amino acids) is parsed on the first lookup. The extended tier
/// ("other residues") is parsed only when a lookup misses the base tier. Each tier is parsed
/// at most once per store even under concurrent first use; a failed load is not cached, so
/// a later lookup retries it. Once loaded, tables are read without locking.
#[derive(Debug)]
pub struct ResidueTemplateStore {
    base_source: TemplateSource,
    extended_source: TemplateSource,
    base: OnceLock<TemplateTable>,
    extended: OnceLock<TemplateTable>,
    init_lock: Mutex<()>,
}

impl ResidueTemplateStore {
    pub fn new(base_source: TemplateSource, extended_source: TemplateSource) -> Self {
        Self {
            base_source,
            extended_source,
            base: OnceLock::new(),
            extended: OnceLock::new(),
            init_lock: Mutex::new(()),
        }
    }

    /// Creates a store backed by the template data embedded in the library.
    pub fn with_bundled_data() -> Self {
        Self::new(
            TemplateSource::text(AMINO_ACIDS_FILE, BUNDLED_AMINO_ACIDS),
            TemplateSource::text(OTHER_RESIDUES_FILE, BUNDLED_OTHER_RESIDUES),
        )
    }

    /// Creates a store reading `amino_acids.txt` and `other_residues.txt` from `dir`.
    ///
    /// Files are opened on first use, not here.
    pub fn from_dir(dir: &Path) -> Self {
        Self::new(
            TemplateSource::file(dir.join(AMINO_ACIDS_FILE)),
            TemplateSource::file(dir.join(OTHER_RESIDUES_FILE)),
        )
    }

    /// The process-wide store built from the bundled data.
    pub fn bundled() -> &'static ResidueTemplateStore {
        BUNDLED_STORE.get_or_init(Self::with_bundled_data)
    }

    /// Looks up the template bonds of a residue.
    ///
    /// # Return
    ///
    /// `Ok(None)` when neither tier knows the residue; this is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateLoadError`] if a tier that has to be consulted cannot be loaded.
    pub fn lookup(&self, residue_name: &str) -> Result<Option<&[TemplateBond]>, TemplateLoadError> {
        let key = residue_name.trim().to_ascii_uppercase();

        if let Some(bonds) = self.tier(Tier::Base)?.get(&key) {
            return Ok(Some(bonds));
        }

        Ok(self.tier(Tier::Extended)?.get(&key).map(Vec::as_slice))
    }

    /// Loads the base tier now, so an unreadable source surfaces before any molecule is touched.
    pub fn preload_base(&self) -> Result<(), TemplateLoadError> {
        self.tier(Tier::Base).map(|_| ())
    }

    pub fn is_base_loaded(&self) -> bool {
        self.base.get().is_some()
    }

    pub fn is_extended_loaded(&self) -> bool {
        self.extended.get().is_some()
    }

    fn tier(&self, tier: Tier) -> Result<&TemplateTable, TemplateLoadError> {
        let (cell, source) = match tier {
            Tier::Base => (&self.base, &self.base_source),
            Tier::Extended => (&self.extended, &self.extended_source),
        };

        if let Some(table) = cell.get() {
            return Ok(table);
        }

        let _guard = self
            .init_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        // Another caller may have finished the load while we waited for the lock.
        if let Some(table) = cell.get() {
            return Ok(table);
        }

        debug!(%tier, %source, "Loading residue templates.");
        let table = source.load()?;
        info!(
            %tier,
            residues = table.len(),
            "Loaded residue templates from {}.",
            source
        );

        Ok(cell.get_or_init(|| table))
    }
}

impl Default for ResidueTemplateStore {
    fn default() -> Self {
        Self::with_bundled_data()
    }
}
