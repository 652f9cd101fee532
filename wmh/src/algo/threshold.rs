use super::error::{Result, WmhError};
use super::mask::{BinaryMask, IntensityVolume};

/// 将连续值统计图按阈值`thr`二值化：严格大于`thr`的体素为1，其余（包括`NaN`）为0。
///
/// # Errors
///
/// `thr`不是有限浮点数时返回`WmhError::NonFiniteThreshold`。
pub fn threshold(volume: &IntensityVolume, thr: f64) -> Result<BinaryMask> {
    if !thr.is_finite() {
        return Err(WmhError::NonFiniteThreshold(thr));
    }
    Ok(BinaryMask::from_array_unchecked(
        volume.mapv(|v| u8::from(v > thr)),
    ))
}
