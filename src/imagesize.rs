use crate::types::Dimensions;
use image::io::Reader as ImageReader;
use std::io::Cursor;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImageSizeError {
    #[error("could not guess image format: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

/// Reads width and height from the image header. Pixel data is not decoded.
pub fn read_dimensions(bytes: &[u8]) -> Result<Dimensions, ImageSizeError> {
    let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    let (width, height) = reader.into_dimensions()?;
    Ok(Dimensions { width, height })
}
