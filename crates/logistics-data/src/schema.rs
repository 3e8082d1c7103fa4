//! Serde structs for network definition files.
//!
//! Items are declared once by name; suppliers and crafters refer to them by
//! that name. Quantities use the short tuple form `("name", count)`.

use logistics_request::ResolverConfig;
use serde::Deserialize;

/// Top-level contents of a `network.{ron,toml,json}` file.
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkData {
    pub items: Vec<ItemData>,
    #[serde(default)]
    pub suppliers: Vec<SupplierData>,
    #[serde(default)]
    pub crafters: Vec<CrafterData>,
    #[serde(default)]
    pub resolver: Option<ResolverConfig>,
}

/// A named item identity.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemData {
    pub name: String,
    pub kind: u32,
    #[serde(default)]
    pub variant: u32,
    #[serde(default)]
    pub tag: u32,
}

/// A supplier and the items it starts with.
#[derive(Debug, Clone, Deserialize)]
pub struct SupplierData {
    pub id: u32,
    #[serde(default)]
    pub stock: Vec<(String, u32)>,
}

/// A crafter and the recipes it runs.
#[derive(Debug, Clone, Deserialize)]
pub struct CrafterData {
    pub id: u32,
    #[serde(default)]
    pub recipes: Vec<RecipeData>,
}

/// One recipe: per craft, `ingredients` in and `output` out.
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeData {
    pub output: (String, u32),
    #[serde(default)]
    pub ingredients: Vec<(String, u32)>,
}
