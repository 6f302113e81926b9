//! Region reference data for the origin and destination dropdowns

use std::collections::HashSet;
use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// States and union territories of India, in dropdown order.
const INDIA_STATES_AND_UTS: &[(&str, &str)] = &[
    ("Andhra Pradesh", "AP"),
    ("Arunachal Pradesh", "AR"),
    ("Assam", "AS"),
    ("Bihar", "BR"),
    ("Chhattisgarh", "CG"),
    ("Goa", "GA"),
    ("Gujarat", "GJ"),
    ("Haryana", "HR"),
    ("Himachal Pradesh", "HP"),
    ("Jharkhand", "JH"),
    ("Karnataka", "KA"),
    ("Kerala", "KL"),
    ("Madhya Pradesh", "MP"),
    ("Maharashtra", "MH"),
    ("Manipur", "MN"),
    ("Meghalaya", "ML"),
    ("Mizoram", "MZ"),
    ("Nagaland", "NL"),
    ("Odisha", "OD"),
    ("Punjab", "PB"),
    ("Rajasthan", "RJ"),
    ("Sikkim", "SK"),
    ("Tamil Nadu", "TN"),
    ("Telangana", "TS"),
    ("Tripura", "TR"),
    ("Uttar Pradesh", "UP"),
    ("Uttarakhand", "UK"),
    ("West Bengal", "WB"),
    ("Andaman and Nicobar Islands", "AN"),
    ("Chandigarh", "CH"),
    ("Dadra and Nagar Haveli and Daman and Diu", "DH"),
    ("Delhi", "DL"),
    ("Jammu and Kashmir", "JK"),
    ("Ladakh", "LA"),
    ("Lakshadweep", "LD"),
    ("Puducherry", "PY"),
];

/// An administrative region (state or union territory)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Region {
    pub name: String,
    pub code: String,
}

impl Region {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum RegionError {
    #[error("failed to read region file: {0}")]
    Io(#[from] std::io::Error),
    #[error("region file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("region list is empty")]
    Empty,
    #[error("region at index {0} has a blank name or code")]
    Blank(usize),
    #[error("duplicate region code '{0}'")]
    DuplicateCode(String),
}

/// Ordered, read-only list of regions.
///
/// Loaded once at startup and handed to the state; nothing mutates it
/// afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct RegionList(Vec<Region>);

impl RegionList {
    /// Validate and wrap a list of regions.
    pub fn new(regions: Vec<Region>) -> Result<Self, RegionError> {
        if regions.is_empty() {
            return Err(RegionError::Empty);
        }
        {
            let mut codes = HashSet::with_capacity(regions.len());
            for (index, region) in regions.iter().enumerate() {
                if region.name.trim().is_empty() || region.code.trim().is_empty() {
                    return Err(RegionError::Blank(index));
                }
                if !codes.insert(region.code.as_str()) {
                    return Err(RegionError::DuplicateCode(region.code.clone()));
                }
            }
        }
        Ok(Self(regions))
    }

    /// The built-in list of Indian states and union territories.
    pub fn india() -> Self {
        Self(
            INDIA_STATES_AND_UTS
                .iter()
                .map(|(name, code)| Region::new(*name, *code))
                .collect(),
        )
    }

    pub fn from_json_str(json: &str) -> Result<Self, RegionError> {
        let regions: Vec<Region> = serde_json::from_str(json)?;
        Self::new(regions)
    }

    /// Load a JSON array of `{ "name", "code" }` records.
    pub async fn load(path: &Path) -> Result<Self, RegionError> {
        let json = tokio::fs::read_to_string(path).await?;
        let regions = Self::from_json_str(&json)?;
        tracing::info!(path = %path.display(), count = regions.iter().count(), "loaded region list");
        Ok(regions)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Region> {
        self.0.iter()
    }

    /// Regions whose name contains `query` (case-insensitive) or whose code
    /// equals it. An empty query matches everything.
    pub fn matching(&self, query: &str) -> Vec<&Region> {
        let query = query.trim();
        if query.is_empty() {
            return self.0.iter().collect();
        }
        let needle = query.to_lowercase();
        self.0
            .iter()
            .filter(|r| {
                r.name.to_lowercase().contains(&needle) || r.code.eq_ignore_ascii_case(query)
            })
            .collect()
    }
}

impl Default for RegionList {
    fn default() -> Self {
        Self::india()
    }
}
