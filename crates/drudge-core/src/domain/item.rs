//! Items: the things loot sorting moves around.

use std::fmt;
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

use super::ids::ItemId;

/// A volume in millilitres.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Volume(u32);

impl Volume {
    pub const ZERO: Volume = Volume(0);

    pub const fn ml(ml: u32) -> Self {
        Self(ml)
    }

    pub const fn liters(l: u32) -> Self {
        Self(l * 1000)
    }

    pub fn as_ml(self) -> u32 {
        self.0
    }
}

impl Add for Volume {
    type Output = Volume;

    fn add(self, rhs: Volume) -> Volume {
        Volume(self.0.saturating_add(rhs.0))
    }
}

/// Saturates at zero: free volume never goes negative.
impl Sub for Volume {
    type Output = Volume;

    fn sub(self, rhs: Volume) -> Volume {
        Volume(self.0.saturating_sub(rhs.0))
    }
}

impl std::iter::Sum for Volume {
    fn sum<I: Iterator<Item = Volume>>(iter: I) -> Volume {
        iter.fold(Volume::ZERO, |acc, v| acc + v)
    }
}

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ml", self.0)
    }
}

/// An item or a stack of identical items.
///
/// `unit_volume` is per piece; [`Item::volume`] accounts for the stack size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,

    /// Free-form category ("food", "clothing", ...); selects category loot zones.
    #[serde(default)]
    pub category: String,

    pub unit_volume: Volume,

    #[serde(default = "one")]
    pub count: u32,

    /// Loose liquids cannot be picked up and are never hauled.
    #[serde(default)]
    pub liquid: bool,

    #[serde(default)]
    pub favorite: bool,
}

fn one() -> u32 {
    1
}

impl Item {
    pub fn new(name: impl Into<String>, unit_volume: Volume) -> Self {
        Self {
            id: ItemId::generate(),
            name: name.into(),
            category: String::new(),
            unit_volume,
            count: 1,
            liquid: false,
            favorite: false,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count.max(1);
        self
    }

    pub fn as_liquid(mut self) -> Self {
        self.liquid = true;
        self
    }

    pub fn as_favorite(mut self) -> Self {
        self.favorite = true;
        self
    }

    /// A copy with a fresh identity, for spawning several equal items.
    pub fn duplicate(&self) -> Self {
        Self {
            id: ItemId::generate(),
            ..self.clone()
        }
    }

    pub fn volume(&self) -> Volume {
        Volume::ml(self.unit_volume.as_ml().saturating_mul(self.count))
    }
}
