//! ファイル選択・ドロップされたFile

use super::error_message;
use codesage_common::{Error, Result, SelectedFile};
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, FileList};

pub struct BrowserFile {
    file: File,
    name: String,
    mime_type: String,
}

impl BrowserFile {
    pub fn new(file: File) -> Self {
        Self {
            name: file.name(),
            mime_type: file.type_(),
            file,
        }
    }
}

impl SelectedFile for BrowserFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn mime_type(&self) -> &str {
        &self.mime_type
    }

    async fn read(&self) -> Result<Vec<u8>> {
        let buffer = JsFuture::from(self.file.array_buffer())
            .await
            .map_err(|e| Error::Validation(format!("Failed to read {}: {}", self.name, error_message(&e))))?;
        Ok(js_sys::Uint8Array::new(&buffer).to_vec())
    }
}

/// FileList を選択順のVecに変換
pub fn files_from_list(list: &FileList) -> Vec<BrowserFile> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .map(BrowserFile::new)
        .collect()
}
