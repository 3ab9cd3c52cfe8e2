//! Errors - エラー型
//!
//! タスク自体はエラーを外に出さない（前提条件の欠如は abort で表現する）。
//! ここにあるのは登録と永続化の境界で起きるエラーだけです。

/// RegistryError は TaskRegistry の操作エラー
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Decoder for task kind '{0}' is already registered")]
    AlreadyRegistered(String),
}

/// CodecError はタスクの保存形式を読み書きする際のエラー
///
/// 未知の kind は `decode_task` の中で回復され（ログを出して捨てる）、
/// 呼び出し側まで上がってくることはありません。
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("no decoder registered for task kind '{0}'")]
    UnknownKind(String),

    #[error("persisted task is missing field '{0}'")]
    MissingField(&'static str),

    #[error("persisted task must be a JSON object or null")]
    Malformed,

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}
