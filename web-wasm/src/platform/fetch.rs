//! fetch + FormData によるマルチパート送信

use super::error_message;
use codesage_common::{Error, HttpClient, HttpResponse, MultipartForm, Result};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, FormData, Request, RequestInit, RequestMode, Response};

pub struct FetchHttp;

fn to_form_data(form: &MultipartForm) -> std::result::Result<FormData, JsValue> {
    let form_data = FormData::new()?;

    for part in &form.parts {
        let bytes = js_sys::Uint8Array::from(part.bytes.as_slice());
        let sequence = js_sys::Array::of1(&bytes);

        let options = BlobPropertyBag::new();
        options.set_type(&part.mime_type);
        let blob = Blob::new_with_u8_array_sequence_and_options(&sequence, &options)?;

        form_data.append_with_blob_and_filename(&part.field, &blob, &part.file_name)?;
    }

    Ok(form_data)
}

impl HttpClient for FetchHttp {
    async fn post_multipart(&self, url: &str, form: MultipartForm) -> Result<HttpResponse> {
        let transport = |e: JsValue| Error::transport(error_message(&e));

        let body = to_form_data(&form).map_err(transport)?;

        // Content-Type（boundary付き）はブラウザが設定する
        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_mode(RequestMode::Cors);
        opts.set_body(&body);

        let request = Request::new_with_str_and_init(url, &opts).map_err(transport)?;
        request.headers().set("Accept", "application/json").map_err(transport)?;

        let window = web_sys::window().ok_or_else(|| Error::transport("window is not available"))?;
        let response: Response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(transport)?
            .dyn_into()
            .map_err(transport)?;

        let text = JsFuture::from(response.text().map_err(transport)?)
            .await
            .map_err(transport)?;

        Ok(HttpResponse {
            status: response.status(),
            status_text: response.status_text(),
            body: text.as_string().unwrap_or_default(),
        })
    }
}
