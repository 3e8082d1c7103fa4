//! Loads network definitions from disk and resolves item names.
//!
//! Provides format detection (RON/JSON/TOML), file discovery, and the
//! deserialization and name-resolution helpers used by [`load_network`].

use crate::schema::*;
use logistics_core::id::ProviderId;
use logistics_core::item::{ItemIdentity, ItemQuantity};
use logistics_request::{Network, NetworkError, Recipe, ResolverConfig};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur during data loading.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// A required data file was not found in the given directory.
    #[error("required file '{file}' not found in {dir}")]
    MissingRequired { file: String, dir: PathBuf },

    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// Two files with the same base name but different formats exist.
    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// An item name could not be resolved.
    #[error("unresolved item reference '{name}' in {file}")]
    UnresolvedRef { file: PathBuf, name: String },

    /// A duplicate item name was found.
    #[error("duplicate name '{name}' in {file}")]
    DuplicateName { file: PathBuf, name: String },

    /// The definitions parsed but do not form a valid network.
    #[error("invalid network in {file}: {source}")]
    Network {
        file: PathBuf,
        #[source]
        source: NetworkError,
    },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported data file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// File discovery
// ===========================================================================

/// Scan a directory for a data file with the given base name (without extension).
///
/// Returns `Ok(None)` if no file is found, or `Err(ConflictingFormats)` if
/// multiple formats exist for the same base name.
pub fn find_data_file(dir: &Path, base_name: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let extensions = ["ron", "toml", "json"];
    let mut found: Option<PathBuf> = None;

    for ext in &extensions {
        let candidate = dir.join(format!("{base_name}.{ext}"));
        if candidate.exists() {
            if let Some(ref existing) = found {
                return Err(DataLoadError::ConflictingFormats {
                    a: existing.clone(),
                    b: candidate,
                });
            }
            found = Some(candidate);
        }
    }

    Ok(found)
}

/// Like [`find_data_file`], but returns an error if no file is found.
pub fn require_data_file(dir: &Path, base_name: &str) -> Result<PathBuf, DataLoadError> {
    find_data_file(dir, base_name)?.ok_or_else(|| DataLoadError::MissingRequired {
        file: base_name.to_string(),
        dir: dir.to_path_buf(),
    })
}

// ===========================================================================
// Deserialization
// ===========================================================================

/// Parse `content` according to `format`. `file` is only used in errors.
pub fn deserialize_str<T: DeserializeOwned>(
    content: &str,
    format: Format,
    file: &Path,
) -> Result<T, DataLoadError> {
    let parse_err = |detail: String| DataLoadError::Parse {
        file: file.to_path_buf(),
        detail,
    };
    match format {
        Format::Ron => ron::from_str(content).map_err(|e| parse_err(e.to_string())),
        Format::Json => serde_json::from_str(content).map_err(|e| parse_err(e.to_string())),
        Format::Toml => toml::from_str(content).map_err(|e| parse_err(e.to_string())),
    }
}

/// Read a file and deserialize it according to its format (detected from extension).
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    deserialize_str(&content, format, path)
}

// ===========================================================================
// Name resolution helpers
// ===========================================================================

/// Look up an item name, returning an `UnresolvedRef` error if not found.
pub fn resolve_name<'a, V>(
    map: &'a HashMap<String, V>,
    name: &str,
    file: &Path,
) -> Result<&'a V, DataLoadError> {
    map.get(name).ok_or_else(|| DataLoadError::UnresolvedRef {
        file: file.to_path_buf(),
        name: name.to_string(),
    })
}

/// Check whether a name already exists in a map, returning a `DuplicateName`
/// error if so.
pub fn check_duplicate<V>(
    map: &HashMap<String, V>,
    name: &str,
    file: &Path,
) -> Result<(), DataLoadError> {
    if map.contains_key(name) {
        Err(DataLoadError::DuplicateName {
            file: file.to_path_buf(),
            name: name.to_string(),
        })
    } else {
        Ok(())
    }
}

// ===========================================================================
// Network assembly
// ===========================================================================

/// A network built from a definition file, plus the names it declared.
#[derive(Debug, Clone)]
pub struct LoadedNetwork {
    pub network: Network,
    pub items: HashMap<String, ItemIdentity>,
    pub resolver: ResolverConfig,
}

impl LoadedNetwork {
    /// Look up a declared item by name.
    pub fn item(&self, name: &str) -> Option<ItemIdentity> {
        self.items.get(name).copied()
    }
}

/// Load `network.{ron,toml,json}` from `dir`.
pub fn load_network_dir(dir: &Path) -> Result<LoadedNetwork, DataLoadError> {
    let path = require_data_file(dir, "network")?;
    load_network(&path)
}

/// Load and resolve a single network definition file.
pub fn load_network(path: &Path) -> Result<LoadedNetwork, DataLoadError> {
    let data: NetworkData = deserialize_file(path)?;
    let loaded = build_network(data, path)?;
    tracing::debug!(
        file = %path.display(),
        items = loaded.items.len(),
        "loaded network definition"
    );
    Ok(loaded)
}

/// Resolve parsed definitions into a [`Network`]. `file` is only used in errors.
pub fn build_network(data: NetworkData, file: &Path) -> Result<LoadedNetwork, DataLoadError> {
    let mut items = HashMap::new();
    for item in &data.items {
        check_duplicate(&items, &item.name, file)?;
        items.insert(
            item.name.clone(),
            ItemIdentity::new(item.kind, item.variant, item.tag),
        );
    }

    let stack = |(name, quantity): &(String, u32)| -> Result<ItemQuantity, DataLoadError> {
        Ok(resolve_name(&items, name, file)?.stack(*quantity))
    };
    let invalid = |source: NetworkError| DataLoadError::Network {
        file: file.to_path_buf(),
        source,
    };

    let mut network = Network::new();
    for supplier in &data.suppliers {
        let id = ProviderId(supplier.id);
        network.add_supplier(id).map_err(invalid)?;
        for entry in &supplier.stock {
            network.add_stock(id, stack(entry)?).map_err(invalid)?;
        }
    }
    for crafter in &data.crafters {
        let id = ProviderId(crafter.id);
        network.add_crafter(id).map_err(invalid)?;
        for recipe in &crafter.recipes {
            let recipe = Recipe {
                output: stack(&recipe.output)?,
                ingredients: recipe
                    .ingredients
                    .iter()
                    .map(stack)
                    .collect::<Result<Vec<_>, _>>()?,
            };
            network.add_recipe(id, recipe).map_err(invalid)?;
        }
    }

    Ok(LoadedNetwork {
        network,
        items,
        resolver: data.resolver.unwrap_or_default(),
    })
}

// ===========================================================================
// Tests
// ===========================================================================
