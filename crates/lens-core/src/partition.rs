//! Date partitions and object keys
//!
//! A [`Partition`] is a `YYYY-MM-DD` label. Labels are zero-padded, so the
//! lexical order of the label is also the chronological order, and that is the
//! order `Ord` exposes.

use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

const PARTITION_FORMAT: &str = "%Y-%m-%d";

/// Date-labelled grouping key in the object store
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Partition(String);

impl Partition {
    /// Parse a partition label, rejecting anything that is not a calendar date
    pub fn parse(label: impl AsRef<str>) -> Result<Self> {
        let label = label.as_ref().trim();
        // chrono accepts unpadded fields, which would break lexical ordering
        if label.len() != 10 {
            return Err(Error::InvalidPartition(label.to_string()));
        }
        NaiveDate::parse_from_str(label, PARTITION_FORMAT)
            .map_err(|_| Error::InvalidPartition(label.to_string()))?;
        Ok(Self(label.to_string()))
    }

    /// Partition for a calendar date
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.format(PARTITION_FORMAT).to_string())
    }

    /// The raw label
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The calendar date this partition is labelled with
    pub fn date(&self) -> NaiveDate {
        // The label was validated on construction.
        NaiveDate::parse_from_str(&self.0, PARTITION_FORMAT).unwrap_or_default()
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Partition {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(value)
    }
}

impl From<Partition> for String {
    fn from(partition: Partition) -> Self {
        partition.0
    }
}

/// Location of one stored object: its partition plus its filename
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectKey {
    /// Partition the object lives in
    pub partition: Partition,
    /// Filename within the partition
    pub name: String,
}

impl ObjectKey {
    /// Create a new object key
    pub fn new(partition: Partition, name: impl Into<String>) -> Self {
        Self {
            partition,
            name: name.into(),
        }
    }

    /// Path of the object relative to the store root
    pub fn path(&self) -> String {
        format!("{}/{}", self.partition, self.name)
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.partition, self.name)
    }
}
