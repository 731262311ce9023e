//! Taxonomic ranks, specimen records and the record table.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Normalised tokens that mean "rank not recorded".
pub const SENTINEL_TOKENS: [&str; 3] = ["", "nan", "none"];

/// Taxonomic rank, ordered from outermost to innermost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rank {
    Family,
    Subfamily,
    Tribe,
    Genus,
    Species,
}

impl Rank {
    pub const ALL: [Rank; 5] = [
        Rank::Family,
        Rank::Subfamily,
        Rank::Tribe,
        Rank::Genus,
        Rank::Species,
    ];

    /// Position of this rank in [`Rank::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// All ranks from `Family` down to and including `leaf`.
    pub fn down_to(leaf: Rank) -> &'static [Rank] {
        &Self::ALL[..=leaf.index()]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Rank::Family => "family",
            Rank::Subfamily => "subfamily",
            Rank::Tribe => "tribe",
            Rank::Genus => "genus",
            Rank::Species => "species",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rank {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Rank::ALL
            .into_iter()
            .find(|rank| rank.as_str() == wanted)
            .ok_or_else(|| {
                format!(
                    "unknown rank '{}', expected one of: {}",
                    s,
                    Rank::ALL.iter().join(", ")
                )
            })
    }
}

/// Normalise a raw cell into a taxon value.
///
/// Lowercases, drops all whitespace, and maps the sentinel tokens to `None`.
/// `"Heliconius Erato"` → `Some("heliconiuserato")`, `" NaN "` → `None`.
pub fn parse_taxon(raw: &str) -> Option<String> {
    let normalised: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect();
    if SENTINEL_TOKENS.contains(&normalised.as_str()) {
        None
    } else {
        Some(normalised)
    }
}

/// One specimen row: the taxon value at every rank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonRecord {
    pub family: Option<String>,
    pub subfamily: Option<String>,
    pub tribe: Option<String>,
    pub genus: Option<String>,
    pub species: Option<String>,
}

impl TaxonRecord {
    /// Build a record from raw cells in rank order, normalising each.
    pub fn from_raw(
        family: &str,
        subfamily: &str,
        tribe: &str,
        genus: &str,
        species: &str,
    ) -> Self {
        Self {
            family: parse_taxon(family),
            subfamily: parse_taxon(subfamily),
            tribe: parse_taxon(tribe),
            genus: parse_taxon(genus),
            species: parse_taxon(species),
        }
    }

    pub fn get(&self, rank: Rank) -> Option<&str> {
        match rank {
            Rank::Family => self.family.as_deref(),
            Rank::Subfamily => self.subfamily.as_deref(),
            Rank::Tribe => self.tribe.as_deref(),
            Rank::Genus => self.genus.as_deref(),
            Rank::Species => self.species.as_deref(),
        }
    }

    pub fn set(&mut self, rank: Rank, value: Option<String>) {
        match rank {
            Rank::Family => self.family = value,
            Rank::Subfamily => self.subfamily = value,
            Rank::Tribe => self.tribe = value,
            Rank::Genus => self.genus = value,
            Rank::Species => self.species = value,
        }
    }

    /// Nearest recorded value strictly above `rank`, searching upward to `Family`.
    pub fn nearest_ancestor(&self, rank: Rank) -> Option<&str> {
        Rank::ALL[..rank.index()]
            .iter()
            .rev()
            .find_map(|&above| self.get(above))
    }
}

/// Ordered, already materialised specimen table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordTable {
    rows: Vec<TaxonRecord>,
}

impl RecordTable {
    pub fn new(rows: Vec<TaxonRecord>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[TaxonRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct values at `rank`, sentinel included, in first-appearance order.
    pub fn distinct(&self, rank: Rank) -> Vec<Option<&str>> {
        self.rows.iter().map(|row| row.get(rank)).unique().collect()
    }

    /// Rows whose value at `rank` equals `value` (sentinel-aware).
    pub fn rows_where<'a>(
        &'a self,
        rank: Rank,
        value: Option<&'a str>,
    ) -> impl Iterator<Item = &'a TaxonRecord> + 'a {
        self.rows.iter().filter(move |row| row.get(rank) == value)
    }

    /// Distinct recorded (non-sentinel) family names.
    pub fn families(&self) -> Vec<&str> {
        self.distinct(Rank::Family).into_iter().flatten().collect()
    }

    /// Keep only the rows whose value at `rank` is `value`.
    pub fn retain(&self, rank: Rank, value: &str) -> RecordTable {
        let wanted = parse_taxon(value);
        RecordTable::new(
            self.rows_where(rank, wanted.as_deref())
                .cloned()
                .collect(),
        )
    }

    /// Split the table by the recorded values at `rank`; sentinel rows are dropped.
    pub fn segment_by(&self, rank: Rank) -> BTreeMap<String, RecordTable> {
        let mut segments: BTreeMap<String, Vec<TaxonRecord>> = BTreeMap::new();
        for row in &self.rows {
            if let Some(value) = row.get(rank) {
                segments.entry(value.to_string()).or_default().push(row.clone());
            }
        }
        segments
            .into_iter()
            .map(|(value, rows)| (value, RecordTable::new(rows)))
            .collect()
    }
}

impl FromIterator<TaxonRecord> for RecordTable {
    fn from_iter<I: IntoIterator<Item = TaxonRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
