use crate::{ArrayDataType, Nodata};

// Type requirements for data in rasters
pub trait RasterNum:
    Copy
    + Nodata
    + num::Num
    + num::NumCast
    + num::Bounded
    + std::cmp::PartialOrd
    + std::fmt::Debug
    + Default
    + bytemuck::Pod
    + Send
    + Sync
    + 'static
{
    const TYPE: ArrayDataType;

    /// Integer types never interpolate, they are always resampled using the nearest value
    #[inline]
    fn is_float() -> bool {
        Self::TYPE.is_floating_point()
    }

    /// Checks the value against the raster nodata value, NaN is always nodata for floating point types
    #[inline]
    fn is_nodata_value(self, nodata: Option<Self>) -> bool {
        self.is_nan() || nodata.is_some_and(|nod| self == nod)
    }
}

macro_rules! impl_raster_num {
    ( $t:ident, $raster_type:ident ) => {
        impl RasterNum for $t {
            const TYPE: ArrayDataType = ArrayDataType::$raster_type;
        }
    };
}

impl_raster_num!(i8, Int8);
impl_raster_num!(u8, Uint8);
impl_raster_num!(i16, Int16);
impl_raster_num!(u16, Uint16);
impl_raster_num!(i32, Int32);
impl_raster_num!(u32, Uint32);
impl_raster_num!(i64, Int64);
impl_raster_num!(u64, Uint64);
impl_raster_num!(f32, Float32);
impl_raster_num!(f64, Float64);
