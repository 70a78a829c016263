use async_trait::async_trait;
use bytes::Bytes;

use super::traits::ImageDecoder;
use super::types::ImageInfo;

/// Decoder used until a real barcode or OCR backend is wired in
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDecoder;

#[async_trait]
impl ImageDecoder for NoopDecoder {
    async fn decode(&self, _image: &Bytes, info: &ImageInfo) -> Option<String> {
        tracing::debug!(
            format = %info.format,
            width = info.width,
            height = info.height,
            "No image decoder configured, image yields no identifier"
        );
        None
    }
}
