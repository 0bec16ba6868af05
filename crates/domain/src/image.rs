use crate::DomainError;

/// Decoded image at its natural size, one `0x00RRGGBB` value per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl Bitmap {
    pub fn new(width: u32, height: u32, pixels: Vec<u32>) -> Result<Self, DomainError> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(DomainError::BitmapSize {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn filled(width: u32, height: u32, color: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_pixel_count() {
        assert!(matches!(
            Bitmap::new(2, 2, vec![0; 3]),
            Err(DomainError::BitmapSize {
                expected: 4,
                actual: 3,
                ..
            })
        ));
    }

    #[test]
    fn pixel_lookup_is_row_major() {
        let bitmap = Bitmap::new(2, 2, vec![1, 2, 3, 4]).expect("bitmap");
        assert_eq!(bitmap.pixel(1, 0), Some(2));
        assert_eq!(bitmap.pixel(0, 1), Some(3));
        assert_eq!(bitmap.pixel(2, 0), None);
    }
}
