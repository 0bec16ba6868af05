use std::fs;
use std::io::Cursor;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::io::Reader as ImageReader;
use reqwest::blocking::Client;
use vca_application::{ApplicationError, ImageDecoder};
use vca_domain::{Bitmap, ImageReference};

use crate::pack_rgb;

/// Resolves a report's image reference to bytes and decodes them at natural size.
#[derive(Debug, Clone, Default)]
pub struct ImageCrateDecoder {
    client: Client,
}

impl ImageCrateDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    fn fetch(&self, reference: &ImageReference) -> Result<Vec<u8>, ApplicationError> {
        match reference {
            ImageReference::DataUrl { payload, .. } => {
                let compact: String = payload
                    .chars()
                    .filter(|ch| !ch.is_ascii_whitespace())
                    .collect();
                STANDARD
                    .decode(compact)
                    .map_err(|error| ApplicationError::Decode(format!("invalid base64: {error}")))
            }
            ImageReference::Remote(url) => {
                let response = self
                    .client
                    .get(url)
                    .send()
                    .and_then(|response| response.error_for_status())
                    .map_err(|error| ApplicationError::Transport(error.to_string()))?;
                let bytes = response
                    .bytes()
                    .map_err(|error| ApplicationError::Transport(error.to_string()))?;
                Ok(bytes.to_vec())
            }
            ImageReference::Local(path) => fs::read(path).map_err(|error| {
                ApplicationError::Io(format!("failed to read {}: {error}", path.display()))
            }),
        }
    }
}

impl ImageDecoder for ImageCrateDecoder {
    fn decode(&self, reference: &ImageReference) -> Result<Bitmap, ApplicationError> {
        let bytes = self.fetch(reference)?;
        tracing::debug!(image = %reference, bytes = bytes.len(), "report image fetched");
        decode_bitmap(&bytes)
    }
}

pub fn decode_bitmap(bytes: &[u8]) -> Result<Bitmap, ApplicationError> {
    let image = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|error| ApplicationError::Decode(error.to_string()))?
        .decode()
        .map_err(|error| ApplicationError::Decode(error.to_string()))?;
    let source = image.to_rgb8();
    if source.width() == 0 || source.height() == 0 {
        return Err(ApplicationError::Decode("empty image dimensions".to_string()));
    }

    let pixels = source
        .pixels()
        .map(|pixel| {
            let [red, green, blue] = pixel.0;
            pack_rgb(red, green, blue)
        })
        .collect();
    Ok(Bitmap::new(source.width(), source.height(), pixels)?)
}
