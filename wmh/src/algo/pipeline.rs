use super::error::Result;
use super::mask::IntensityVolume;
use super::reconcile::{Reconciler, Reconciliation};
use super::stats::PairStats;
use super::threshold::threshold;

/// 一对统计图从阈值化到校正的完整结果。
#[derive(Clone, Debug)]
pub struct CorrectedPair {
    pub reconciliation: Reconciliation,
    /// 校正前（直接阈值化）的统计。
    pub original: PairStats,
    /// 校正后的统计。
    pub corrected: PairStats,
}

/// 阈值化 -> 校正 -> 前后两次统计。
pub fn correct_pair(
    reconciler: &Reconciler,
    thr: f64,
    id: &str,
    maps: (&IntensityVolume, &IntensityVolume),
) -> Result<CorrectedPair> {
    let mask1 = threshold(maps.0, thr)?;
    let mask2 = threshold(maps.1, thr)?;
    let original = PairStats::measure(id, &mask1, &mask2)?;
    let reconciliation = reconciler.reconcile(thr, maps, (&mask1, &mask2))?;
    let (out1, out2) = &reconciliation.masks;
    let corrected = PairStats::measure(id, out1, out2)?;
    Ok(CorrectedPair {
        reconciliation,
        original,
        corrected,
    })
}
