use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DatasetError, QueryError};

// ---------------------------------------------------------------------------
// LaunchSite – the closed set of known launch locations
// ---------------------------------------------------------------------------

/// One of the four known launch sites.
///
/// `id()` is the selector identifier handed in by the presentation layer,
/// `label()` is the name used in the launch tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LaunchSite {
    #[serde(rename = "ccafs_lc")]
    CcafsLc40,
    #[serde(rename = "ccafs_slc")]
    CcafsSlc40,
    #[serde(rename = "ksc_lc")]
    KscLc39a,
    #[serde(rename = "vafb_scl")]
    VafbSlc4e,
}

impl LaunchSite {
    pub const ALL: [LaunchSite; 4] = [
        LaunchSite::CcafsLc40,
        LaunchSite::CcafsSlc40,
        LaunchSite::KscLc39a,
        LaunchSite::VafbSlc4e,
    ];

    pub fn id(self) -> &'static str {
        match self {
            LaunchSite::CcafsLc40 => "ccafs_lc",
            LaunchSite::CcafsSlc40 => "ccafs_slc",
            LaunchSite::KscLc39a => "ksc_lc",
            LaunchSite::VafbSlc4e => "vafb_scl",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LaunchSite::CcafsLc40 => "CCAFS LC-40",
            LaunchSite::CcafsSlc40 => "CCAFS SLC-40",
            LaunchSite::KscLc39a => "KSC LC-39A",
            LaunchSite::VafbSlc4e => "VAFB SLC-4E",
        }
    }

    /// Match either the identifier or the label, ignoring ASCII case.
    pub fn lookup(text: &str) -> Option<Self> {
        let text = text.trim();
        Self::ALL
            .into_iter()
            .find(|s| s.id().eq_ignore_ascii_case(text) || s.label().eq_ignore_ascii_case(text))
    }
}

impl fmt::Display for LaunchSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for LaunchSite {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::lookup(s).ok_or_else(|| QueryError::InvalidSelector(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Outcome – binary launch result, serialized as 1 / 0
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Outcome {
    Failure,
    Success,
}

impl Outcome {
    pub fn is_success(self) -> bool {
        self == Outcome::Success
    }
}

impl From<Outcome> for u8 {
    fn from(outcome: Outcome) -> u8 {
        match outcome {
            Outcome::Failure => 0,
            Outcome::Success => 1,
        }
    }
}

impl TryFrom<u8> for Outcome {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Outcome::Failure),
            1 => Ok(Outcome::Success),
            other => Err(format!("launch outcome must be 0 or 1, got {other}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Query inputs
// ---------------------------------------------------------------------------

/// Which launches a query covers: every site, or exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SiteSelector {
    #[default]
    All,
    Site(LaunchSite),
}

impl SiteSelector {
    pub fn matches(self, site: LaunchSite) -> bool {
        match self {
            SiteSelector::All => true,
            SiteSelector::Site(wanted) => wanted == site,
        }
    }
}

impl From<LaunchSite> for SiteSelector {
    fn from(site: LaunchSite) -> Self {
        SiteSelector::Site(site)
    }
}

impl FromStr for SiteSelector {
    type Err = QueryError;

    /// `ALL` (any case) or a site identifier / label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(SiteSelector::All);
        }
        s.parse::<LaunchSite>().map(SiteSelector::Site)
    }
}

impl fmt::Display for SiteSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SiteSelector::All => f.write_str("ALL"),
            SiteSelector::Site(site) => f.write_str(site.id()),
        }
    }
}

/// Closed payload-mass interval `[min_kg, max_kg]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PayloadRange {
    pub min_kg: f64,
    pub max_kg: f64,
}

impl PayloadRange {
    pub fn new(min_kg: f64, max_kg: f64) -> Result<Self, QueryError> {
        let range = PayloadRange { min_kg, max_kg };
        range.validate()?;
        Ok(range)
    }

    /// Both bounds finite and non-negative, `min_kg <= max_kg`.
    pub fn validate(&self) -> Result<(), QueryError> {
        let bound_ok = |v: f64| v.is_finite() && v >= 0.0;
        if bound_ok(self.min_kg) && bound_ok(self.max_kg) && self.min_kg <= self.max_kg {
            Ok(())
        } else {
            Err(QueryError::InvalidRange {
                min_kg: self.min_kg,
                max_kg: self.max_kg,
            })
        }
    }

    /// Inclusive on both ends.
    pub fn contains(&self, mass_kg: f64) -> bool {
        self.min_kg <= mass_kg && mass_kg <= self.max_kg
    }
}

// ---------------------------------------------------------------------------
// LaunchRecord – one row of the launch table
// ---------------------------------------------------------------------------

/// A single historical launch attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchRecord {
    pub site: LaunchSite,
    pub payload_mass_kg: f64,
    pub booster_version_category: String,
    pub outcome: Outcome,
}

impl LaunchRecord {
    pub fn new(
        site: LaunchSite,
        payload_mass_kg: f64,
        booster_version_category: impl Into<String>,
        outcome: Outcome,
    ) -> Self {
        LaunchRecord {
            site,
            payload_mass_kg,
            booster_version_category: booster_version_category.into(),
            outcome,
        }
    }
}

// ---------------------------------------------------------------------------
// LaunchDataset – the complete, validated table
// ---------------------------------------------------------------------------

/// Ordered, validated launch records. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct LaunchDataset {
    records: Vec<LaunchRecord>,
}

impl LaunchDataset {
    /// Check the schema contract and take ownership of the records.
    ///
    /// Site and outcome are already constrained by their types; only the
    /// payload mass needs a runtime check.
    pub fn new(records: Vec<LaunchRecord>) -> Result<Self, DatasetError> {
        for (row, rec) in records.iter().enumerate() {
            if !rec.payload_mass_kg.is_finite() || rec.payload_mass_kg < 0.0 {
                return Err(DatasetError::InvalidPayload {
                    row,
                    value: rec.payload_mass_kg,
                });
            }
        }
        Ok(LaunchDataset { records })
    }

    pub fn records(&self) -> &[LaunchRecord] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Observed minimum and maximum payload mass, `None` when empty.
    pub fn payload_bounds(&self) -> Option<(f64, f64)> {
        self.records.iter().fold(None, |acc, rec| {
            let m = rec.payload_mass_kg;
            Some(match acc {
                None => (m, m),
                Some((lo, hi)) => (f64::min(lo, m), f64::max(hi, m)),
            })
        })
    }

    /// Distinct sites that appear in the dataset.
    pub fn sites(&self) -> BTreeSet<LaunchSite> {
        self.records.iter().map(|r| r.site).collect()
    }

    /// Distinct booster version categories, sorted.
    pub fn booster_categories(&self) -> BTreeSet<&str> {
        self.records
            .iter()
            .map(|r| r.booster_version_category.as_str())
            .collect()
    }
}
