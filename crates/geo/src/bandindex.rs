use std::num::NonZeroUsize;

/// Raster bands are numbered starting from 1, index 0 can not be represented.
pub type BandIndex = NonZeroUsize;

pub const FIRST_BAND: BandIndex = NonZeroUsize::MIN;

/// Offset of the band in the band-sequential data of a raster with `band_size` cells per band
pub(crate) fn band_offset(band: BandIndex, band_size: usize) -> usize {
    (band.get() - 1) * band_size
}
