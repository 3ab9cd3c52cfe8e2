//! Typed - 型付き Task API
//!
//! kind 文字列の typo を型で排除し、永続化との対応付けを静的に保証します。
//!
//! # 二層構造
//! - **表層（Typed）**: `Activity` trait - 型安全
//! - **内部（Dyn）**: `DynActivity` trait - object-safe, type erasure
//!
//! # 構成
//! - `context`: ライフサイクル呼び出しに渡すコンテキスト
//! - `task`: `Activity` / `DynActivity` / `Task`
//! - `registry`: kind → デコード関数
//! - `codec`: `{"actor_type", "actor_data"}` 形式との変換

pub mod codec;
pub mod context;
pub mod registry;
pub mod task;

pub use self::codec::{decode_backlog, decode_task, encode_backlog, encode_task, restore_task};
pub use self::context::TaskContext;
pub use self::registry::{DecodeFn, TaskRegistry};
pub use self::task::{Activity, DynActivity, Task, TypedActivity};
