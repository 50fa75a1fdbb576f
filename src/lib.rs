//! Item Code Matcher
//!
//! コストシート（xlsx）とアイテムマスタを読み込み、
//! `itemcode-core` で照合した結果をブックとして書き出すCLI側の実装。

pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod progress;
pub mod reader;
