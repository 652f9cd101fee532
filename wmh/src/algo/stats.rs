use super::dice::OverlapCounts;
use super::error::Result;
use super::mask::BinaryMask;

/// 一对掩膜的体素统计，对应报表中的一行。
#[derive(Clone, Debug, PartialEq)]
pub struct PairStats {
    /// 受试者与检查日期标识，如`M0001_20180101`。
    pub id: String,
    /// 第一个掩膜的体素数。
    pub wmh_1: usize,
    /// 第二个掩膜的体素数。
    pub wmh_2: usize,
    /// 两个掩膜共有的体素数。
    pub common: usize,
    pub only_1: usize,
    pub only_2: usize,
    pub dice: f64,
}

impl PairStats {
    /// 统计一对掩膜。
    ///
    /// # Errors
    ///
    /// 与[`dice`](super::dice::dice)相同：形状不一致，或两个掩膜都为空。
    pub fn measure(id: impl Into<String>, first: &BinaryMask, second: &BinaryMask) -> Result<Self> {
        let counts = OverlapCounts::tally(first, second)?;
        Ok(Self {
            id: id.into(),
            wmh_1: counts.first_total(),
            wmh_2: counts.second_total(),
            common: counts.both,
            only_1: counts.only_first,
            only_2: counts.only_second,
            dice: counts.dice()?,
        })
    }
}
