//! S3-backed artifact store.
//!
//! Re-encodes the generated image as JPEG at a configured quality before
//! upload (the provider's PNGs are large, and chat clients only need a
//! preview), then serves it through a CDN-style public base URL.

use std::io::Cursor;

use aws_config::BehaviorVersion;
use aws_sdk_s3::primitives::ByteStream;
use image::codecs::jpeg::JpegEncoder;
use tracing::debug;
use uuid::Uuid;

use super::ArtifactStore;
use super::error::UploadError;

pub struct S3Store {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_base_url: String,
    jpeg_quality: u8,
}

impl S3Store {
    /// Create a store using ambient AWS credentials and the given region.
    pub async fn new(
        region: String,
        bucket: String,
        public_base_url: String,
        jpeg_quality: u8,
    ) -> Self {
        let region = aws_sdk_s3::config::Region::new(region);
        let aws_cfg = aws_config::defaults(BehaviorVersion::latest())
            .region(region)
            .load()
            .await;
        Self {
            client: aws_sdk_s3::Client::new(&aws_cfg),
            bucket,
            public_base_url,
            jpeg_quality,
        }
    }

    /// Object key: the hint with spaces collapsed to underscores plus a
    /// random tag, so repeated prompts never collide.
    fn object_key(naming_hint: &str) -> String {
        let stem = naming_hint.replace(' ', "_");
        format!("{stem}_{}.jpeg", Uuid::new_v4().simple())
    }
}

impl ArtifactStore for S3Store {
    async fn upload(&self, image: &[u8], naming_hint: &str) -> Result<String, UploadError> {
        let jpeg = recompress_jpeg(image, self.jpeg_quality)?;
        let key = Self::object_key(naming_hint);
        debug!(
            "uploading {} bytes to s3://{}/{key}",
            jpeg.len(),
            self.bucket
        );
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type("image/jpeg")
            .body(ByteStream::from(jpeg))
            .send()
            .await
            .map_err(|err| UploadError::Backend(err.to_string()))?;
        Ok(format!(
            "{}/{key}",
            self.public_base_url.trim_end_matches('/')
        ))
    }
}

/// Decode `bytes` and re-encode as RGB JPEG at `quality`.
pub(crate) fn recompress_jpeg(bytes: &[u8], quality: u8) -> Result<Vec<u8>, UploadError> {
    let decoded = image::load_from_memory(bytes)?.to_rgb8();
    let mut out = Cursor::new(Vec::new());
    decoded.write_with_encoder(JpegEncoder::new_with_quality(&mut out, quality))?;
    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbaImage};

    fn sample_png() -> Vec<u8> {
        let img = RgbaImage::from_fn(8, 8, |x, y| {
            image::Rgba([(x * 32) as u8, (y * 32) as u8, 128, 255])
        });
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn recompress_produces_jpeg() {
        let jpeg = recompress_jpeg(&sample_png(), 50).unwrap();
        // JPEG start-of-image marker.
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
        image::load_from_memory_with_format(&jpeg, ImageFormat::Jpeg).unwrap();
    }

    #[test]
    fn recompress_rejects_garbage() {
        let err = recompress_jpeg(b"not an image", 50).unwrap_err();
        assert!(matches!(err, UploadError::Encode(_)));
    }

    #[test]
    fn object_key_replaces_spaces_and_is_unique() {
        let a = S3Store::object_key("a cat wearing a hat");
        let b = S3Store::object_key("a cat wearing a hat");
        assert!(a.starts_with("a_cat_wearing_a_hat_"));
        assert!(a.ends_with(".jpeg"));
        assert_ne!(a, b);
    }
}
