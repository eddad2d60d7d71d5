use image::{ImageBuffer, Rgb};
use thiserror::Error;

use crate::config::Region;

/// Snapshot decoded into 16-bit RGB.
pub type RasterImage = ImageBuffer<Rgb<u16>, Vec<u16>>;

pub const MAX_CHANNEL_VALUE: f64 = u16::MAX as f64;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SampleError {
    #[error("region {region:?} does not fit inside a {width}x{height} image")]
    RegionOutOfBounds {
        region: Region,
        width: u32,
        height: u32,
    },
}

#[derive(Debug, Default, Clone, Copy)]
struct ChannelTotals {
    red: u64,
    green: u64,
    blue: u64,
    count: u64,
}

fn channel_totals(image: &RasterImage, region: Region) -> Result<ChannelTotals, SampleError> {
    let (width, height) = image.dimensions();
    if region.is_empty() || !region.fits_within(width, height) {
        return Err(SampleError::RegionOutOfBounds {
            region,
            width,
            height,
        });
    }

    let mut totals = ChannelTotals::default();
    for y in region.y..region.y + region.height {
        for x in region.x..region.x + region.width {
            let [r, g, b] = image.get_pixel(x, y).0;
            totals.red += u64::from(r);
            totals.green += u64::from(g);
            totals.blue += u64::from(b);
        }
    }
    totals.count = region.pixel_count();
    Ok(totals)
}

/// Mean of R+G+B over the region, divided by three.
pub fn average_brightness(image: &RasterImage, region: Region) -> Result<f64, SampleError> {
    let totals = channel_totals(image, region)?;
    let sum = totals.red + totals.green + totals.blue;
    Ok(sum as f64 / (totals.count * 3) as f64)
}

/// Mean red minus mean green over the region.
pub fn red_green_differential(image: &RasterImage, region: Region) -> Result<f64, SampleError> {
    let totals = channel_totals(image, region)?;
    let count = totals.count as f64;
    Ok(totals.red as f64 / count - totals.green as f64 / count)
}
