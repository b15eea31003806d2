//! getUserMedia によるカメラ
//!
//! プレビュー用の `<video id="camera-preview">` はカメラ画面に常に置かれている前提。

use super::{error_message, error_name, navigator};
use codesage_common::{CameraDevice, CameraStream, Error, FacingMode, Image, PermissionState, Result};
use serde::Serialize;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    CanvasRenderingContext2d, HtmlCanvasElement, HtmlVideoElement, MediaStream, MediaStreamConstraints,
    MediaStreamTrack,
};

pub const VIDEO_ID: &str = "camera-preview";

/// スナップショットのJPEG品質
const JPEG_QUALITY: f64 = 0.8;

#[derive(Serialize)]
struct PermissionDescriptor {
    name: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VideoConstraints {
    facing_mode: &'static str,
}

/// getUserMedia の失敗を分類する
///
/// NotAllowedError / SecurityError は権限拒否、それ以外はデバイスの問題。
pub fn map_media_error(name: &str, message: &str) -> Error {
    match name {
        "NotAllowedError" | "SecurityError" => Error::Permission(message.to_string()),
        _ => Error::Device(if message.is_empty() { name.to_string() } else { message.to_string() }),
    }
}

pub fn media_error(value: &JsValue) -> Error {
    map_media_error(&error_name(value).unwrap_or_default(), &error_message(value))
}

fn find_video() -> Result<HtmlVideoElement> {
    web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(VIDEO_ID))
        .and_then(|el| el.dyn_into::<HtmlVideoElement>().ok())
        .ok_or_else(|| Error::Device("camera preview is not mounted".into()))
}

pub struct BrowserCamera;

impl CameraDevice for BrowserCamera {
    type Stream = BrowserStream;

    async fn query_permission(&self) -> Result<PermissionState> {
        let unsupported = |e: JsValue| Error::Device(error_message(&e));

        let permissions = navigator()
            .ok_or_else(|| Error::Device("navigator is not available".into()))?
            .permissions()
            .map_err(unsupported)?;

        let descriptor = serde_wasm_bindgen::to_value(&PermissionDescriptor { name: "camera" })
            .map_err(|e| Error::Device(e.to_string()))?;
        let descriptor: js_sys::Object = descriptor.unchecked_into();

        let status = JsFuture::from(permissions.query(&descriptor).map_err(unsupported)?)
            .await
            .map_err(unsupported)?;
        let status: web_sys::PermissionStatus = status.dyn_into().map_err(unsupported)?;

        Ok(match status.state() {
            web_sys::PermissionState::Granted => PermissionState::Granted,
            web_sys::PermissionState::Denied => PermissionState::Denied,
            _ => PermissionState::Prompt,
        })
    }

    async fn open_stream(&self, facing: FacingMode) -> Result<BrowserStream> {
        let video = find_video()?;

        let media_devices = navigator()
            .ok_or_else(|| Error::Device("navigator is not available".into()))?
            .media_devices()
            .map_err(|e| media_error(&e))?;

        let constraints = MediaStreamConstraints::new();
        let video_constraints = serde_wasm_bindgen::to_value(&VideoConstraints {
            facing_mode: facing.as_constraint(),
        })
        .map_err(|e| Error::Device(e.to_string()))?;
        constraints.set_video(&video_constraints);

        let promise = media_devices
            .get_user_media_with_constraints(&constraints)
            .map_err(|e| media_error(&e))?;
        let stream: MediaStream = JsFuture::from(promise)
            .await
            .map_err(|e| media_error(&e))?
            .dyn_into()
            .map_err(|e| media_error(&e))?;

        video.set_src_object(Some(&stream));
        // autoplay属性があるので失敗しても表示はされる
        if let Ok(play) = video.play() {
            let _ = JsFuture::from(play).await;
        }

        Ok(BrowserStream { stream, video })
    }
}

pub struct BrowserStream {
    stream: MediaStream,
    video: HtmlVideoElement,
}

impl CameraStream for BrowserStream {
    fn snapshot(&self) -> Result<Image> {
        let (width, height) = (self.video.video_width(), self.video.video_height());
        if width == 0 || height == 0 {
            return Err(Error::Device("camera has no frame yet".into()));
        }

        let device = |e: JsValue| Error::Device(error_message(&e));

        let canvas: HtmlCanvasElement = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| Error::Device("document is not available".into()))?
            .create_element("canvas")
            .map_err(device)?
            .dyn_into()
            .map_err(|_| Error::Device("failed to create canvas".into()))?;
        canvas.set_width(width);
        canvas.set_height(height);

        let context: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .map_err(device)?
            .ok_or_else(|| Error::Device("2d context is not available".into()))?
            .dyn_into()
            .map_err(|_| Error::Device("2d context is not available".into()))?;

        context
            .draw_image_with_html_video_element_and_dw_and_dh(&self.video, 0.0, 0.0, width as f64, height as f64)
            .map_err(device)?;

        let data_url = canvas
            .to_data_url_with_type_and_encoder_options("image/jpeg", &JsValue::from_f64(JPEG_QUALITY))
            .map_err(device)?;

        Image::from_data_url(&data_url)
            .map(|image| image.with_file_name(format!("capture-{}.jpg", js_sys::Date::now() as u64)))
            .ok_or_else(|| Error::Device("failed to encode snapshot".into()))
    }

    fn stop(&mut self) {
        for track in self.stream.get_tracks().iter() {
            if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
                track.stop();
            }
        }
        self.video.set_src_object(None);
    }
}
