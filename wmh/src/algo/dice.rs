use super::error::{ensure_same_shape, Result, WmhError};
use super::mask::BinaryMask;

/// 两个掩膜逐体素的重叠计数。
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct OverlapCounts {
    /// 两个掩膜均为1。
    pub both: usize,
    /// 只有第一个掩膜为1。
    pub only_first: usize,
    /// 只有第二个掩膜为1。
    pub only_second: usize,
}

impl OverlapCounts {
    pub fn tally(first: &BinaryMask, second: &BinaryMask) -> Result<Self> {
        ensure_same_shape("dice", first.view().shape(), second.view().shape())?;
        let mut counts = Self::default();
        for (&a, &b) in first.view().iter().zip(second.view().iter()) {
            match (a, b) {
                (1, 1) => counts.both += 1,
                (1, _) => counts.only_first += 1,
                (_, 1) => counts.only_second += 1,
                _ => (),
            }
        }
        Ok(counts)
    }

    /// 只有一个掩膜为1的体素个数。
    #[inline]
    pub fn disagree(&self) -> usize {
        self.only_first + self.only_second
    }

    #[inline]
    pub fn first_total(&self) -> usize {
        self.both + self.only_first
    }

    #[inline]
    pub fn second_total(&self) -> usize {
        self.both + self.only_second
    }

    /// `2*agree / (2*agree + disagree)`。两个掩膜都为空时分母为零，返回`WmhError::DegenerateDice`。
    pub fn dice(&self) -> Result<f64> {
        let agree2 = 2 * self.both;
        let denom = agree2 + self.disagree();
        if denom == 0 {
            return Err(WmhError::DegenerateDice);
        }
        Ok(agree2 as f64 / denom as f64)
    }
}

/// 计算两个掩膜的Dice相似系数，取值在[0, 1]内。
///
/// # Errors
///
/// - 形状不一致：`WmhError::ShapeMismatch`。
/// - 两个掩膜都为空：`WmhError::DegenerateDice`。
pub fn dice(first: &BinaryMask, second: &BinaryMask) -> Result<f64> {
    OverlapCounts::tally(first, second)?.dice()
}
