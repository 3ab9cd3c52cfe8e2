//! TaskRegistry - kind 文字列からデコーダへの対応表
//!
//! ロード時にだけ参照されます。リフレクションは使わず、
//! `register::<T>()` で型ごとのデコード関数ポインタを登録します。

use std::collections::HashMap;

use serde_json::Value;

use super::task::{Activity, DynActivity, TypedActivity};
use crate::activities::{Aim, Dig, Hacking, MigrationCancel, MoveLoot, OpenGate, Travel};
use crate::domain::{CodecError, RegistryError};

/// 型消去されたデコード関数
pub type DecodeFn = fn(Value) -> Result<Box<dyn DynActivity>, serde_json::Error>;

fn decode_boxed<T: Activity>(data: Value) -> Result<Box<dyn DynActivity>, serde_json::Error> {
    Ok(Box::new(TypedActivity::new(T::decode(data)?)))
}

/// TaskRegistry は Activity 型を登録・管理
///
/// # 使用例
/// ```ignore
/// let mut registry = TaskRegistry::new();
/// registry.register::<Dig>()?;
///
/// let decode = registry.get("ACT_DIG").unwrap();
/// ```
#[derive(Debug, Clone, Default)]
pub struct TaskRegistry {
    decoders: HashMap<String, DecodeFn>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self {
            decoders: HashMap::new(),
        }
    }

    /// Every task kind this crate ships.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        // Distinct kinds, so registration cannot collide.
        for (kind, decode) in builtin_decoders() {
            registry.decoders.insert(kind.to_string(), decode);
        }
        registry
    }

    pub fn register<T: Activity>(&mut self) -> Result<(), RegistryError> {
        let kind = T::KIND.to_string();
        if self.decoders.contains_key(&kind) {
            return Err(RegistryError::AlreadyRegistered(kind));
        }
        self.decoders.insert(kind, decode_boxed::<T>);
        Ok(())
    }

    pub fn get(&self, kind: &str) -> Option<DecodeFn> {
        self.decoders.get(kind).copied()
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.decoders.contains_key(kind)
    }

    /// Registered kinds, alphabetically.
    pub fn registered_kinds(&self) -> Vec<String> {
        let mut kinds: Vec<String> = self.decoders.keys().cloned().collect();
        kinds.sort();
        kinds
    }

    pub fn decode(&self, kind: &str, data: Value) -> Result<Box<dyn DynActivity>, CodecError> {
        let decode = self
            .get(kind)
            .ok_or_else(|| CodecError::UnknownKind(kind.to_string()))?;
        Ok(decode(data)?)
    }
}

fn builtin_decoders() -> [(&'static str, DecodeFn); 7] {
    [
        (Aim::KIND, decode_boxed::<Aim> as DecodeFn),
        (Dig::KIND, decode_boxed::<Dig> as DecodeFn),
        (Hacking::KIND, decode_boxed::<Hacking> as DecodeFn),
        (MigrationCancel::KIND, decode_boxed::<MigrationCancel> as DecodeFn),
        (MoveLoot::KIND, decode_boxed::<MoveLoot> as DecodeFn),
        (OpenGate::KIND, decode_boxed::<OpenGate> as DecodeFn),
        (Travel::KIND, decode_boxed::<Travel> as DecodeFn),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typed::task::tests::Countdown;
    use serde_json::json;

    #[test]
    fn register_and_get() {
        let mut registry = TaskRegistry::new();
        registry.register::<Countdown>().unwrap();

        assert!(registry.get(Countdown::KIND).is_some());
        assert!(registry.get(Dig::KIND).is_none());
    }

    #[test]
    fn double_registration_is_rejected() {
        let mut registry = TaskRegistry::new();
        registry.register::<Countdown>().unwrap();
        let result = registry.register::<Countdown>();
        assert!(matches!(result, Err(RegistryError::AlreadyRegistered(kind)) if kind == "TEST_COUNTDOWN"));
    }

    #[test]
    fn builtin_kinds_are_sorted() {
        let registry = TaskRegistry::with_builtin();
        assert_eq!(
            registry.registered_kinds(),
            vec![
                "ACT_AIM",
                "ACT_DIG",
                "ACT_HACKING",
                "ACT_MIGRATION_CANCEL",
                "ACT_MOVE_LOOT",
                "ACT_OPEN_GATE",
                "ACT_TRAVEL",
            ]
        );
    }

    #[test]
    fn builtin_registry_still_accepts_new_kinds() {
        let mut registry = TaskRegistry::with_builtin();
        registry.register::<Countdown>().unwrap();
        assert!(matches!(
            registry.register::<MoveLoot>(),
            Err(RegistryError::AlreadyRegistered(_))
        ));
    }

    #[test]
    fn decode_unknown_kind() {
        let registry = TaskRegistry::with_builtin();
        let err = registry.decode("ACT_BOGUS", json!({})).unwrap_err();
        assert!(matches!(err, CodecError::UnknownKind(kind) if kind == "ACT_BOGUS"));
    }

    #[test]
    fn decode_builds_the_registered_type() {
        let mut registry = TaskRegistry::new();
        registry.register::<Countdown>().unwrap();
        let activity = registry
            .decode(Countdown::KIND, json!({ "budget": 10, "turns": 2, "label": "x" }))
            .unwrap();
        assert_eq!(activity.kind(), "TEST_COUNTDOWN");
    }
}
