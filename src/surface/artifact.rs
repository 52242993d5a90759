//! Encoded image produced from the signature raster.

use anyhow::{Context, Result};
use base64::Engine;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbaImage};
use sha2::{Digest, Sha256};
use std::fmt;

/// PNG encoding of the raster at the moment a stroke was closed.
#[derive(Clone, PartialEq, Eq)]
pub struct Artifact {
    png: Vec<u8>,
    width: u32,
    height: u32,
}

impl Artifact {
    pub fn encode(image: &RgbaImage) -> Result<Self> {
        let (width, height) = image.dimensions();
        let mut png = Vec::new();
        PngEncoder::new(&mut png)
            .write_image(image.as_raw(), width, height, ExtendedColorType::Rgba8)
            .with_context(|| format!("Failed to encode {}x{} signature as PNG", width, height))?;
        Ok(Self { png, width, height })
    }

    pub fn png_bytes(&self) -> &[u8] {
        &self.png
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// `data:` URL suitable for embedding the image directly.
    pub fn data_url(&self) -> String {
        format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(&self.png)
        )
    }

    /// Lowercase hex SHA-256 of the PNG bytes.
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(&self.png);
        digest.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

impl fmt::Debug for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Artifact")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("png_len", &self.png.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_encoded_png_decodes_to_same_pixels() {
        let mut image = RgbaImage::new(12, 6);
        image.put_pixel(3, 2, Rgba([0, 0, 0, 255]));

        let artifact = Artifact::encode(&image).expect("encode");
        assert_eq!((artifact.width(), artifact.height()), (12, 6));

        let decoded = image::load_from_memory(artifact.png_bytes())
            .expect("decode")
            .to_rgba8();
        assert_eq!(decoded, image);
    }

    #[test]
    fn test_data_url_and_fingerprint() {
        let artifact = Artifact::encode(&RgbaImage::new(4, 4)).expect("encode");
        assert!(artifact.data_url().starts_with("data:image/png;base64,iVBOR"));
        assert_eq!(artifact.fingerprint().len(), 64);
        assert_eq!(
            artifact.fingerprint(),
            Artifact::encode(&RgbaImage::new(4, 4)).unwrap().fingerprint()
        );
    }

    #[test]
    fn test_empty_raster_fails_to_encode() {
        assert!(Artifact::encode(&RgbaImage::new(0, 200)).is_err());
    }
}
