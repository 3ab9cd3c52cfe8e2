//! Message port - プレイヤー向けのメッセージ出力

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Info,
    Good,
    Bad,
    Warning,
    /// Something heard rather than seen.
    Sound,
}

pub trait MessageLog {
    fn add_msg(&mut self, kind: MessageKind, text: String);
}
