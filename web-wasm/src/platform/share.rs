//! navigator.clipboard / navigator.share
//!
//! どちらも未対応ブラウザがあるため Reflect で存在を確認してから呼ぶ。

use super::{error_message, error_name, navigator};
use codesage_common::{Clipboard, ShareError, ShareSheet};
use serde::Serialize;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

#[derive(Serialize)]
struct ShareData<'a> {
    title: &'a str,
    text: &'a str,
}

/// `target[name](...args)` を呼び、Promiseなら待つ
async fn call_method(target: &JsValue, name: &str, arg: &JsValue) -> Result<JsValue, JsValue> {
    let function: js_sys::Function = js_sys::Reflect::get(target, &JsValue::from_str(name))?
        .dyn_into()
        .map_err(|_| JsValue::from_str(&format!("{} is not supported", name)))?;

    let returned = function.call1(target, arg)?;
    match returned.dyn_into::<js_sys::Promise>() {
        Ok(promise) => JsFuture::from(promise).await,
        Err(value) => Ok(value),
    }
}

fn has_method(target: &JsValue, name: &str) -> bool {
    js_sys::Reflect::get(target, &JsValue::from_str(name))
        .map(|value| value.is_function())
        .unwrap_or(false)
}

/// 共有失敗の分類（AbortError はユーザーのキャンセル）
pub fn classify_share_error(name: Option<&str>, message: String) -> ShareError {
    match name {
        Some("AbortError") => ShareError::Cancelled,
        _ => ShareError::Failed(message),
    }
}

pub struct BrowserClipboard;

impl Clipboard for BrowserClipboard {
    async fn write_text(&self, text: &str) -> Result<(), String> {
        let navigator = navigator().ok_or("navigator is not available")?;
        let clipboard = js_sys::Reflect::get(&navigator, &JsValue::from_str("clipboard"))
            .map_err(|e| error_message(&e))?;
        if clipboard.is_undefined() {
            return Err("clipboard is not available".into());
        }

        call_method(&clipboard, "writeText", &JsValue::from_str(text))
            .await
            .map(|_| ())
            .map_err(|e| error_message(&e))
    }
}

pub struct BrowserShareSheet;

impl ShareSheet for BrowserShareSheet {
    fn is_available(&self) -> bool {
        navigator().map(|n| has_method(&n, "share")).unwrap_or(false)
    }

    async fn share(&self, title: &str, text: &str) -> Result<(), ShareError> {
        let navigator = navigator().ok_or_else(|| ShareError::Failed("navigator is not available".into()))?;
        let data = serde_wasm_bindgen::to_value(&ShareData { title, text })
            .map_err(|e| ShareError::Failed(e.to_string()))?;

        call_method(&navigator, "share", &data)
            .await
            .map(|_| ())
            .map_err(|e| classify_share_error(error_name(&e).as_deref(), error_message(&e)))
    }
}
