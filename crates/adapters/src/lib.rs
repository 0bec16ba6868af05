pub mod canvas;
pub mod fs;
pub mod http;
pub mod presenters;

mod alerts;
mod decode;

pub use alerts::ConsoleAlerts;
pub use canvas::{glyph_cells, PixelCanvas};
pub use decode::{decode_bitmap, ImageCrateDecoder};
pub use fs::FsFileSource;
pub use http::{parse_report, HttpComparisonClient, DEFAULT_SERVICE_URL};
pub use presenters::{present_damage_row, present_report, present_selection};

pub(crate) fn pack_rgb(red: u8, green: u8, blue: u8) -> u32 {
    ((red as u32) << 16) | ((green as u32) << 8) | (blue as u32)
}

pub(crate) fn unpack_rgb(pixel: u32) -> [u8; 3] {
    [
        ((pixel >> 16) & 0xFF) as u8,
        ((pixel >> 8) & 0xFF) as u8,
        (pixel & 0xFF) as u8,
    ]
}
