use std::io::Cursor;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use image::{ImageFormat, ImageReader, RgbaImage};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageInputError {
    #[error("not an image")]
    NotAnImage,
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("image header unreadable: {0}")]
    Header(String),
    #[error("image could not be decoded: {0}")]
    Decode(#[from] image::ImageError),
}

/// Formats the image crate is built to decode here. Anything else is
/// treated as "not an image" so it never reaches the annotator.
pub const SUPPORTED_FORMATS: [ImageFormat; 5] = [
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Gif,
    ImageFormat::WebP,
    ImageFormat::Bmp,
];

/// File extensions of [`SUPPORTED_FORMATS`], for file pickers.
pub fn supported_extensions() -> Vec<&'static str> {
    SUPPORTED_FORMATS
        .iter()
        .flat_map(|f| f.extensions_str().iter().copied())
        .collect()
}

/// An already-encoded image (PNG, JPEG, ...) plus its mime type.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for EncodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncodedImage")
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl EncodedImage {
    pub fn png(bytes: Vec<u8>) -> Self {
        Self {
            mime_type: "image/png".to_string(),
            bytes,
        }
    }

    /// Accepts raw file bytes. Anything that is not one of
    /// [`SUPPORTED_FORMATS`] is rejected; callers treat that as "no file
    /// accepted".
    pub fn from_file_bytes(bytes: Vec<u8>) -> Result<Self, ImageInputError> {
        let format = image::guess_format(&bytes).map_err(|_| ImageInputError::NotAnImage)?;
        if !SUPPORTED_FORMATS.contains(&format) {
            return Err(ImageInputError::NotAnImage);
        }
        Ok(Self {
            mime_type: format.to_mime_type().to_string(),
            bytes,
        })
    }

    /// Accepts either a bare base64 payload or a full data URI.
    pub fn from_base64(text: &str) -> Result<Self, ImageInputError> {
        let bytes = BASE64_STANDARD.decode(strip_data_uri_prefix(text).trim())?;
        Self::from_file_bytes(bytes)
    }

    pub fn to_base64(&self) -> String {
        BASE64_STANDARD.encode(&self.bytes)
    }

    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.to_base64())
    }

    /// Lossless PNG of an in-memory raster.
    pub fn encode_png(img: &RgbaImage) -> Result<Self, image::ImageError> {
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png)?;
        Ok(Self::png(out.into_inner()))
    }

    /// Full decode to 8-bit RGBA at native size.
    pub fn decode_rgba(&self) -> Result<RgbaImage, ImageInputError> {
        let reader = ImageReader::new(Cursor::new(&self.bytes))
            .with_guessed_format()
            .map_err(|e| ImageInputError::Header(e.to_string()))?;
        Ok(reader.decode()?.to_rgba8())
    }

    /// Native pixel size, read from the header only.
    pub fn dimensions(&self) -> Result<(u32, u32), ImageInputError> {
        ImageReader::new(Cursor::new(&self.bytes))
            .with_guessed_format()
            .map_err(|e| ImageInputError::Header(e.to_string()))?
            .into_dimensions()
            .map_err(|e| ImageInputError::Header(e.to_string()))
    }
}

/// "data:image/png;base64,AAAA" -> "AAAA". Text without a comma is returned as is.
pub fn strip_data_uri_prefix(text: &str) -> &str {
    match text.split_once(',') {
        Some((_, payload)) => payload,
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn tiny_png() -> Vec<u8> {
        let img = RgbaImage::from_pixel(3, 2, Rgba([1, 2, 3, 255]));
        EncodedImage::encode_png(&img).unwrap().bytes
    }

    #[test]
    fn strip_prefix_only_touches_data_uris() {
        assert_eq!(strip_data_uri_prefix("data:image/png;base64,QUJD"), "QUJD");
        assert_eq!(strip_data_uri_prefix("QUJD"), "QUJD");
    }

    #[test]
    fn data_uri_and_bare_payload_decode_identically() {
        let image = EncodedImage::png(tiny_png());
        let from_uri = EncodedImage::from_base64(&image.to_data_uri()).unwrap();
        let from_bare = EncodedImage::from_base64(&image.to_base64()).unwrap();
        assert_eq!(from_uri, image);
        assert_eq!(from_bare, image);
        assert_eq!(from_uri.dimensions().unwrap(), (3, 2));
    }

    #[test]
    fn png_encoding_is_lossless() {
        let mut img = RgbaImage::from_pixel(4, 4, Rgba([9, 9, 9, 255]));
        img.put_pixel(1, 2, Rgba([200, 100, 50, 128]));
        let decoded = EncodedImage::encode_png(&img).unwrap().decode_rgba().unwrap();
        assert_eq!(decoded, img);
    }

    #[test]
    fn non_image_bytes_are_rejected() {
        let err = EncodedImage::from_file_bytes(b"hello, not a picture".to_vec()).unwrap_err();
        assert!(matches!(err, ImageInputError::NotAnImage));
    }

    #[test]
    fn recognised_but_unsupported_formats_are_rejected() {
        let tiff = b"II*\0\x08\0\0\0rest-of-a-tiff".to_vec();
        assert_eq!(image::guess_format(&tiff).unwrap(), ImageFormat::Tiff);
        assert!(matches!(
            EncodedImage::from_file_bytes(tiff),
            Err(ImageInputError::NotAnImage)
        ));

        let ico = vec![0, 0, 1, 0, 1, 0, 16, 16, 0, 0];
        assert!(matches!(
            EncodedImage::from_file_bytes(ico),
            Err(ImageInputError::NotAnImage)
        ));
    }

    #[test]
    fn picker_extensions_cover_supported_formats() {
        let exts = supported_extensions();
        for ext in ["png", "jpg", "jpeg", "gif", "webp", "bmp"] {
            assert!(exts.contains(&ext), "missing {}", ext);
        }
        assert!(!exts.contains(&"tiff"));
    }
}
