use std::fmt;

use serde::{ser::SerializeMap, Serialize, Serializer};
use strum_macros::{AsRefStr, Display, EnumIter};

use crate::error::{Result, SoundnessError};

/// Label of the synthetic entry holding the minimum over all other entries.
pub const TOTAL_LABEL: &str = "total";

/// Identifies the proximity-gaps regime a security table was computed under.
///
/// The derived order (UDR < JBR < CBR) is the order used in reports.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    AsRefStr,
    EnumIter,
    Serialize,
)]
pub enum RegimeId {
    #[strum(serialize = "UDR")]
    #[serde(rename = "UDR")]
    UniqueDecoding,
    #[strum(serialize = "JBR")]
    #[serde(rename = "JBR")]
    JohnsonBound,
    #[strum(serialize = "CBR")]
    #[serde(rename = "CBR")]
    CapacityBound,
}

/// Round-by-round security levels: an ordered mapping from a round/phase label to bits of
/// security. An entry `k` means the error of that round is at most `2^{-k}`.
///
/// Entries can only be appended. Once [SecurityTable::seal] has been called the table carries a
/// [TOTAL_LABEL] entry equal to the minimum of all other entries, and no further entries can be
/// added.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SecurityTable {
    entries: Vec<(String, u32)>,
    total: Option<u32>,
}

impl SecurityTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, label: impl Into<String>, bits: u32) -> Result<()> {
        let label = label.into();
        if self.total.is_some() || label == TOTAL_LABEL || self.get(&label).is_some() {
            return Err(SoundnessError::DuplicateLabel(label));
        }
        self.entries.push((label, bits));
        Ok(())
    }

    /// Appends all entries of `other`, preserving their order. `other` must not be sealed.
    pub fn extend(&mut self, other: SecurityTable) -> Result<()> {
        if other.total.is_some() {
            return Err(SoundnessError::DuplicateLabel(TOTAL_LABEL.to_string()));
        }
        for (label, bits) in other.entries {
            self.insert(label, bits)?;
        }
        Ok(())
    }

    /// Computes the `total` entry. Sealing an empty table is a modeling bug.
    pub fn seal(mut self) -> Result<Self> {
        if self.total.is_some() {
            return Err(SoundnessError::DuplicateLabel(TOTAL_LABEL.to_string()));
        }
        let total = self
            .entries
            .iter()
            .map(|(_, bits)| *bits)
            .min()
            .ok_or_else(|| {
                SoundnessError::invalid(
                    "SecurityTable",
                    "entries",
                    0,
                    "nothing to take the minimum of",
                )
            })?;
        self.total = Some(total);
        Ok(self)
    }

    pub fn get(&self, label: &str) -> Option<u32> {
        if label == TOTAL_LABEL {
            return self.total;
        }
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, bits)| *bits)
    }

    /// The minimum over all entries, available after [SecurityTable::seal].
    pub fn total(&self) -> Option<u32> {
        self.total
    }

    /// Iterates over all entries in insertion order, the `total` entry last.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.entries
            .iter()
            .map(|(label, bits)| (label.as_str(), *bits))
            .chain(self.total.map(|total| (TOTAL_LABEL, total)))
    }

    /// Number of entries, including `total` once sealed.
    pub fn len(&self) -> usize {
        self.entries.len() + usize::from(self.total.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Serialize for SecurityTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (label, bits) in self.iter() {
            map.serialize_entry(label, &bits)?;
        }
        map.end()
    }
}

impl fmt::Display for SecurityTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
        for (label, bits) in self.iter() {
            writeln!(f, "  {label:<width$} : {bits}")?;
        }
        Ok(())
    }
}
