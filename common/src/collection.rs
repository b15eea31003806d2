//! 画像コレクション
//!
//! 挿入順 = 表示順 = 送信順。解析結果とはインデックスだけで対応付けるため、
//! 要素をその場で書き換える操作は持たない。

use crate::types::Image;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageCollection {
    images: Vec<Image>,
}

impl ImageCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, image: Image) {
        self.images.push(image);
    }

    /// バッチをまとめて追加（部分的な追加は起こらない）
    pub fn append_batch(&mut self, batch: Vec<Image>) {
        self.images.extend(batch);
    }

    /// 指定位置の画像を削除。範囲外なら何もしない
    pub fn remove(&mut self, index: usize) -> Option<Image> {
        if index < self.images.len() {
            Some(self.images.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.images.clear();
    }

    pub fn get(&self, index: usize) -> Option<&Image> {
        self.images.get(index)
    }

    pub fn as_slice(&self) -> &[Image] {
        &self.images
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Image> {
        self.images.iter()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

impl<'a> IntoIterator for &'a ImageCollection {
    type Item = &'a Image;
    type IntoIter = std::slice::Iter<'a, Image>;

    fn into_iter(self) -> Self::IntoIter {
        self.images.iter()
    }
}

impl From<Vec<Image>> for ImageCollection {
    fn from(images: Vec<Image>) -> Self {
        Self { images }
    }
}
