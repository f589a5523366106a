use num::ToPrimitive;

/// Sentinel used for cells without data when the raster does not define a nodata value.
///
/// Floating point types use NaN, unsigned integers their maximum and signed integers their minimum value.
pub trait Nodata: ToPrimitive + PartialEq + Sized + Copy {
    const NODATA: Self;

    /// Always false for integer types
    fn is_nan(self) -> bool;

    #[inline]
    fn is_nodata(self) -> bool {
        self.is_nan() || self == Self::NODATA
    }
}

macro_rules! impl_nodata {
    ( $t:ty, $sentinel:expr, $is_nan:expr ) => {
        impl Nodata for $t {
            const NODATA: $t = $sentinel;

            #[inline]
            fn is_nan(self) -> bool {
                $is_nan(self)
            }
        }
    };
}

impl_nodata!(u8, u8::MAX, |_| false);
impl_nodata!(u16, u16::MAX, |_| false);
impl_nodata!(u32, u32::MAX, |_| false);
impl_nodata!(u64, u64::MAX, |_| false);
impl_nodata!(i8, i8::MIN, |_| false);
impl_nodata!(i16, i16::MIN, |_| false);
impl_nodata!(i32, i32::MIN, |_| false);
impl_nodata!(i64, i64::MIN, |_| false);
impl_nodata!(f32, f32::NAN, f32::is_nan);
impl_nodata!(f64, f64::NAN, f64::is_nan);
