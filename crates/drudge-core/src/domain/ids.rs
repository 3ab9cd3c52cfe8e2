//! Domain identifiers (strongly-typed IDs).
//!
//! ULID を `Id<T>` で包み、`T` はゼロサイズのマーカー型として使います。
//! マーカーは実行時には存在せず、`ItemId` と `ActorId` の取り違えを
//! コンパイル時に防ぐためだけのものです。
//!
//! ## ULID を使う理由
//! - 生成順でソートできる
//! - 調整なしで生成できる（セーブ/ロードを跨いでもアイテム ID が衝突しない）

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;
use ulid::Ulid;

/// IdMarker は各 ID 型のマーカー trait
///
/// Display 用のプレフィックス（"item-", "actor-"）を提供します。
pub trait IdMarker: Send + Sync + 'static {
    fn prefix() -> &'static str;
}

/// Generic id type.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id<T: IdMarker> {
    ulid: Ulid,
    _marker: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    pub fn from_ulid(ulid: Ulid) -> Self {
        Self {
            ulid,
            _marker: PhantomData,
        }
    }

    /// Mint a fresh id.
    pub fn generate() -> Self {
        Self::from_ulid(Ulid::new())
    }

    pub fn as_ulid(&self) -> Ulid {
        self.ulid
    }
}

impl<T: IdMarker> From<Ulid> for Id<T> {
    fn from(ulid: Ulid) -> Self {
        Self::from_ulid(ulid)
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", T::prefix(), self.ulid)
    }
}

// ULID 文字列そのものとしてシリアライズする（マーカーはデータを持たない）
impl<T: IdMarker> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.ulid.serialize(serializer)
    }
}

impl<'de, T: IdMarker> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ulid::deserialize(deserializer).map(Self::from_ulid)
    }
}

// ========================================
// Markers
// ========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Item {}

impl IdMarker for Item {
    fn prefix() -> &'static str {
        "item-"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Actor {}

impl IdMarker for Actor {
    fn prefix() -> &'static str {
        "actor-"
    }
}

/// Identifier of a single item (or stack) lying on the map or in cargo.
pub type ItemId = Id<Item>;

/// Identifier of an acting entity (avatar or NPC).
pub type ActorId = Id<Actor>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_distinct_types() {
        let ulid1 = Ulid::new();
        let ulid2 = Ulid::new();

        let item = ItemId::from_ulid(ulid1);
        let actor = ActorId::from_ulid(ulid2);

        assert_eq!(item.as_ulid(), ulid1);
        assert_eq!(actor.as_ulid(), ulid2);

        assert!(item.to_string().starts_with("item-"));
        assert!(actor.to_string().starts_with("actor-"));
        // let _: ItemId = actor; // <- does not compile
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = ItemId::generate();
        let b = ItemId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn ids_serialize_as_plain_ulid_strings() {
        let id = ItemId::generate();

        let serialized = serde_json::to_string(&id).unwrap();
        assert_eq!(serialized, format!("\"{}\"", id.as_ulid()));

        let deserialized: ItemId = serde_json::from_str(&serialized).unwrap();
        assert_eq!(id, deserialized);
    }

    #[test]
    fn phantom_data_does_not_consume_memory() {
        use std::mem::size_of;
        assert_eq!(size_of::<ItemId>(), size_of::<Ulid>());
        assert_eq!(size_of::<ActorId>(), 16);
    }
}
