use image::{ImageFormat, ImageReader, Limits};
use std::io::Cursor;

use super::traits::{ImageValidationError, ImageValidator};
use super::types::ImageInfo;
use crate::config::ImageConfig;

pub const JPEG_EOI: [u8; 2] = [0xFF, 0xD9];
pub const PNG_IEND: [u8; 12] = [
    0x00, 0x00, 0x00, 0x00, b'I', b'E', b'N', b'D', 0xAE, 0x42, 0x60, 0x82,
];
pub const GIF_TRAILER: u8 = 0x3B;

/// Validator that decodes the upload with the `image` crate under the
/// configured limits.
///
/// The JPEG, PNG and GIF decoders tolerate missing trailing data, so those
/// formats must also end with their end-of-image marker. BMP, TIFF and WebP
/// decoding fails on its own when bytes are missing.
#[derive(Debug, Clone)]
pub struct DecodingValidator {
    max_width: u32,
    max_height: u32,
    max_alloc: u64,
}

impl DecodingValidator {
    pub fn new(max_width: u32, max_height: u32, max_alloc: u64) -> Self {
        Self {
            max_width,
            max_height,
            max_alloc,
        }
    }

    pub fn from_config(config: &ImageConfig) -> Self {
        Self::new(config.max_width, config.max_height, config.max_alloc.as_u64())
    }

    fn limits(&self) -> Limits {
        let mut limits = Limits::default();
        limits.max_image_width = Some(self.max_width);
        limits.max_image_height = Some(self.max_height);
        limits.max_alloc = Some(self.max_alloc);
        limits
    }
}

impl Default for DecodingValidator {
    fn default() -> Self {
        Self::from_config(&ImageConfig::default())
    }
}

impl ImageValidator for DecodingValidator {
    fn validate(&self, bytes: &[u8]) -> Result<ImageInfo, ImageValidationError> {
        if bytes.is_empty() {
            return Err(ImageValidationError::Empty);
        }

        let mut reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
        let format = reader.format().ok_or(ImageValidationError::UnknownFormat)?;
        check_end_marker(format, bytes)?;
        reader.limits(self.limits());

        let img = reader.decode()?;
        let (width, height) = (img.width(), img.height());
        if width == 0 || height == 0 {
            return Err(ImageValidationError::ZeroDimensions);
        }

        Ok(ImageInfo {
            format: format!("{:?}", format),
            width,
            height,
        })
    }
}

fn check_end_marker(format: ImageFormat, bytes: &[u8]) -> Result<(), ImageValidationError> {
    let complete = match format {
        ImageFormat::Jpeg => bytes.ends_with(&JPEG_EOI),
        ImageFormat::Png => bytes.ends_with(&PNG_IEND),
        ImageFormat::Gif => bytes.last() == Some(&GIF_TRAILER),
        _ => true,
    };

    if complete {
        Ok(())
    } else {
        Err(ImageValidationError::Truncated(format!("{:?}", format)))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};

    pub(crate) fn encode(format: ImageFormat, width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 7) as u8, (y * 11) as u8, ((x + y) * 3) as u8])
        });
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, format).unwrap();
        buf.into_inner()
    }

    pub(crate) fn sample_png() -> Vec<u8> {
        encode(ImageFormat::Png, 32, 32)
    }

    #[test]
    fn accepts_png() {
        let info = DecodingValidator::default().validate(&sample_png()).unwrap();
        assert_eq!(info.format, "Png");
        assert_eq!((info.width, info.height), (32, 32));
    }

    #[test]
    fn accepts_jpeg_and_bmp() {
        let validator = DecodingValidator::default();
        let jpeg = validator.validate(&encode(ImageFormat::Jpeg, 16, 8)).unwrap();
        assert_eq!(jpeg.format, "Jpeg");
        assert_eq!((jpeg.width, jpeg.height), (16, 8));

        let bmp = validator.validate(&encode(ImageFormat::Bmp, 5, 3)).unwrap();
        assert_eq!(bmp.format, "Bmp");
    }

    #[test]
    fn rejects_empty_payload() {
        let err = DecodingValidator::default().validate(&[]).unwrap_err();
        assert!(matches!(err, ImageValidationError::Empty));
    }

    #[test]
    fn rejects_non_image_bytes() {
        let err = DecodingValidator::default()
            .validate(b"definitely not an image")
            .unwrap_err();
        assert!(matches!(err, ImageValidationError::UnknownFormat));
    }

    const ALL_FORMATS: [ImageFormat; 6] = [
        ImageFormat::Png,
        ImageFormat::Jpeg,
        ImageFormat::Gif,
        ImageFormat::Bmp,
        ImageFormat::WebP,
        ImageFormat::Tiff,
    ];

    fn assert_rejects_truncated(format: ImageFormat) {
        let validator = DecodingValidator::default();
        let full = encode(format, 64, 64);
        assert!(validator.validate(&full).is_ok(), "{:?} full image rejected", format);

        for cut in [full.len() / 2, full.len() - 2] {
            let result = validator.validate(&full[..cut]);
            assert!(
                result.is_err(),
                "{:?} cut to {} of {} bytes was accepted",
                format,
                cut,
                full.len()
            );
        }
    }

    #[test]
    fn rejects_truncated_png() {
        assert_rejects_truncated(ImageFormat::Png);
    }

    #[test]
    fn rejects_truncated_jpeg() {
        assert_rejects_truncated(ImageFormat::Jpeg);
    }

    #[test]
    fn rejects_truncated_gif() {
        assert_rejects_truncated(ImageFormat::Gif);
    }

    #[test]
    fn rejects_truncated_bmp() {
        assert_rejects_truncated(ImageFormat::Bmp);
    }

    #[test]
    fn rejects_truncated_webp() {
        assert_rejects_truncated(ImageFormat::WebP);
    }

    #[test]
    fn rejects_truncated_tiff() {
        assert_rejects_truncated(ImageFormat::Tiff);
    }

    #[test]
    fn accepts_every_enabled_format() {
        let validator = DecodingValidator::default();
        for format in ALL_FORMATS {
            let info = validator.validate(&encode(format, 64, 64)).unwrap();
            assert_eq!((info.width, info.height), (64, 64), "{:?}", format);
        }
    }

    #[test]
    fn missing_end_marker_reports_truncation() {
        let jpeg = encode(ImageFormat::Jpeg, 64, 64);
        let err = DecodingValidator::default()
            .validate(&jpeg[..jpeg.len() - 2])
            .unwrap_err();

        assert!(matches!(err, ImageValidationError::Truncated(ref f) if f == "Jpeg"));
        assert_eq!(err.to_string(), "Jpeg data is truncated (missing end marker)");
    }

    #[test]
    fn rejects_images_over_dimension_limit() {
        let validator = DecodingValidator::new(8, 8, 64 * 1024 * 1024);
        let err = validator.validate(&sample_png()).unwrap_err();
        assert!(matches!(err, ImageValidationError::Decode(_)));
    }
}
