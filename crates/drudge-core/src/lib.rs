//! drudge-core
//!
//! Core building blocks for turn-based, resumable actor tasks.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（point, ids, item, actor, effort, outcome, config, errors）
//! - **ports**: ワールドへの抽象化レイヤー（MapAccess, ZoneQuery, PathFinder, MessageLog）
//! - **typed**: 型付き Task API（Activity trait, Task, TaskRegistry, codec）
//! - **activities**: 具体的なタスク（MoveLoot, Travel, Dig, Aim, ...）
//! - **app**: ターン進行（EngineBuilder, Scheduler, ActorStatus）
//! - **impls**: 実装（GridWorld, Scenario など開発用）

pub mod activities;
pub mod app;
pub mod domain;
pub mod impls;
pub mod ports;
pub mod typed;
