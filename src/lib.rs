//! CodeSage CLI
//!
//! 画像をアップロードしてAI生成らしさの判定と抽出テキストを表示する。

pub mod cli;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod http;
pub mod report;
pub mod scanner;
pub mod session;
