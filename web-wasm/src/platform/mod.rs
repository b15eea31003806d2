//! ブラウザAPIの実装
//!
//! common のトレイト（CameraDevice / SelectedFile / HttpClient / Clipboard / ShareSheet）を
//! web-sys で実装する。

pub mod camera;
pub mod fetch;
pub mod files;
pub mod share;

use codesage_common::DEFAULT_API_URL;
use wasm_bindgen::{JsCast, JsValue};

/// 解析APIのベースURL（ビルド時の CODESAGE_API_URL）
pub fn api_url() -> &'static str {
    option_env!("CODESAGE_API_URL")
        .filter(|url| !url.trim().is_empty())
        .unwrap_or(DEFAULT_API_URL)
}

/// JSエラーの name（DOMException / Error）
pub fn error_name(value: &JsValue) -> Option<String> {
    if let Some(dom) = value.dyn_ref::<web_sys::DomException>() {
        return Some(dom.name());
    }
    js_sys::Reflect::get(value, &JsValue::from_str("name"))
        .ok()
        .and_then(|name| name.as_string())
}

/// JSエラーの表示用メッセージ
pub fn error_message(value: &JsValue) -> String {
    if let Some(dom) = value.dyn_ref::<web_sys::DomException>() {
        return dom.message();
    }
    if let Some(text) = value.as_string() {
        return text;
    }
    js_sys::Reflect::get(value, &JsValue::from_str("message"))
        .ok()
        .and_then(|message| message.as_string())
        .unwrap_or_else(|| format!("{:?}", value))
}

pub fn navigator() -> Option<web_sys::Navigator> {
    web_sys::window().map(|w| w.navigator())
}

/// コンソールへエラー出力
pub fn log_error(context: &str, message: &str) {
    web_sys::console::error_2(&JsValue::from_str(context), &JsValue::from_str(message));
}
