//! Named media buckets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The buckets media is stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    /// Garment photos uploaded with a product.
    Products,
    /// Reference photos of fashion models.
    Models,
    /// Generated try-on images.
    Processed,
}

impl Bucket {
    pub const ALL: [Bucket; 3] = [Bucket::Products, Bucket::Models, Bucket::Processed];

    pub fn as_str(self) -> &'static str {
        match self {
            Bucket::Products => "products",
            Bucket::Models => "models",
            Bucket::Processed => "processed",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Bucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Bucket::ALL
            .into_iter()
            .find(|b| b.as_str() == s)
            .ok_or_else(|| format!("Unknown bucket '{s}'. Expected one of: products, models, processed"))
    }
}
