//! 两次扫描WMH掩膜的一致性校正。
//!
//! 整个过程是一条由不可变中间量组成的流水线：
//!
//! 1. 第一次区域分类`RegionMask(mask1, mask2)`，得到两掩膜的重叠区域；
//! 2. 用重叠区域内两张统计图的均值重新标定阈值；
//! 3. 均值较高的一次扫描视为质量较好（`better`），另一次为`worse`；
//! 4. `better`独有区域中，`worse`统计图超过新阈值的体素并入`worse`掩膜；
//! 5. 用`(better, 校正后的worse)`重新分类；
//! 6. 新重叠区域膨胀一个体素得到外壳，外壳中只属于`worse`的体素并入`better`掩膜；
//! 7. 按照(第一次, 第二次)的顺序返回。
//!
//! 两个掩膜都只会增加体素，不会删除。

use super::error::{ensure_same_shape, Result, WmhError};
use super::mask::{BinaryMask, IntensityVolume, Visit};
use super::morph::border_shell;
use super::params::ReconcileParams;
use super::region::{Region, RegionMask};
use ndarray::Zip;
use serde::Deserialize;
use tracing::debug;

/// 两次扫描在重叠区域内均值完全相等时，判定哪一次质量较好。
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// 均值相等时第一次扫描较好。
    PreferFirst,
    /// 均值相等时第二次扫描较好（只有`mean1 > mean2`时第一次才较好）。
    #[default]
    PreferSecond,
}

impl TieBreak {
    /// 按照重叠区域均值返回质量较好的一次扫描。
    pub fn rank(self, mean_first: f64, mean_second: f64) -> Visit {
        if mean_first > mean_second {
            Visit::First
        } else if mean_first < mean_second {
            Visit::Second
        } else {
            match self {
                TieBreak::PreferFirst => Visit::First,
                TieBreak::PreferSecond => Visit::Second,
            }
        }
    }
}

/// 阈值重新标定的结果。
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Recalibration {
    /// 重叠区域内第一次扫描统计图的均值。
    pub mean_first: f64,
    /// 重叠区域内第二次扫描统计图的均值。
    pub mean_second: f64,
    /// 截断后的基线阈值。
    pub base_threshold: f64,
    /// `|mean_first - mean_second|`。
    pub divergence: f64,
    /// 最终使用的阈值`max(base_threshold, thr - divergence)`。
    pub threshold: f64,
}

impl Recalibration {
    /// 由输入阈值与两个重叠区域均值推导新阈值。
    pub fn derive(thr: f64, mean_first: f64, mean_second: f64, params: &ReconcileParams) -> Self {
        let base_threshold =
            params.clamp_base(params.mean_scale * mean_first.min(mean_second) - params.mean_offset);
        let divergence = (mean_first - mean_second).abs();
        Self {
            mean_first,
            mean_second,
            base_threshold,
            divergence,
            threshold: base_threshold.max(thr - divergence),
        }
    }
}

/// 一次校正的完整结果。
#[derive(Clone, Debug)]
pub struct Reconciliation {
    /// 校正后的(第一次, 第二次)掩膜。
    pub masks: (BinaryMask, BinaryMask),
    pub recalibration: Recalibration,
    /// 被判定为质量较好的一次扫描。
    pub better: Visit,
    /// 两个掩膜各自新增的体素个数。
    pub added: (usize, usize),
}

/// 掩膜校正器。不持有任何跨调用的可变状态，可以在线程间自由复制。
#[derive(Copy, Clone, Debug, Default)]
pub struct Reconciler {
    params: ReconcileParams,
}

impl Reconciler {
    /// # Errors
    ///
    /// 参数不合法时返回`WmhError::InvalidParams`。
    pub fn new(params: ReconcileParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    #[inline]
    pub fn params(&self) -> &ReconcileParams {
        &self.params
    }

    /// 校正两次扫描的掩膜。`maps`与`masks`的下标0、1分别对应第一次、第二次扫描。
    ///
    /// # Errors
    ///
    /// - `thr`不是有限值：`WmhError::NonFiniteThreshold`；
    /// - 任意两个输入形状不一致：`WmhError::ShapeMismatch`；
    /// - 两掩膜没有重叠体素：`WmhError::EmptyOverlap`；
    /// - 重叠区域内均值不是有限值：`WmhError::NonFiniteOverlapMean`。
    pub fn reconcile(
        &self,
        thr: f64,
        maps: (&IntensityVolume, &IntensityVolume),
        masks: (&BinaryMask, &BinaryMask),
    ) -> Result<Reconciliation> {
        if !thr.is_finite() {
            return Err(WmhError::NonFiniteThreshold(thr));
        }
        let shape = maps.0.shape();
        ensure_same_shape("map1/map2", shape, maps.1.shape())?;
        ensure_same_shape("map1/mask1", shape, masks.0.view().shape())?;
        ensure_same_shape("map1/mask2", shape, masks.1.view().shape())?;

        let regions = RegionMask::classify(masks.0, masks.1)?;
        let (mean_first, mean_second) = overlap_means(&regions, maps)?;
        let recalibration = Recalibration::derive(thr, mean_first, mean_second, &self.params);
        let better = self.params.tie_break.rank(mean_first, mean_second);
        let worse = better.other();
        debug!(
            mean_first,
            mean_second,
            base_threshold = recalibration.base_threshold,
            new_threshold = recalibration.threshold,
            better = ?better,
            "阈值重新标定完成"
        );

        let better_mask = better.pick(masks);
        let worse_mask = worse.pick(masks);
        let worse_map = worse.pick(maps);

        let corrected_worse = correct_worse(
            &regions,
            better,
            worse_map,
            worse_mask,
            recalibration.threshold,
        );
        let corrected_better = self.correct_better(better_mask, &corrected_worse)?;

        debug_assert!(corrected_worse.is_superset_of(worse_mask)?);
        debug_assert!(corrected_better.is_superset_of(better_mask)?);

        let added_better = corrected_better.count() - better_mask.count();
        let added_worse = corrected_worse.count() - worse_mask.count();
        let (masks, added) = match better {
            Visit::First => (
                (corrected_better, corrected_worse),
                (added_better, added_worse),
            ),
            Visit::Second => (
                (corrected_worse, corrected_better),
                (added_worse, added_better),
            ),
        };
        Ok(Reconciliation {
            masks,
            recalibration,
            better,
            added,
        })
    }

    /// 第5、6步：按`(better, worse)`重新分类，新重叠区域外壳上只属于`worse`的体素并入`better`。
    fn correct_better(&self, better: &BinaryMask, worse: &BinaryMask) -> Result<BinaryMask> {
        let regions = RegionMask::classify(better, worse)?;
        let overlap = regions.select(Region::Both);
        let shell = border_shell(
            &overlap,
            self.params.connectivity,
            self.params.dilation_iterations,
        )?;
        let worse_only = regions.select(Region::OnlySecond);
        let data = Zip::from(better.view())
            .and(shell.view())
            .and(worse_only.view())
            .map_collect(|&b, &s, &w| b | (s & w));
        Ok(BinaryMask::from_array_unchecked(data))
    }
}

/// 重叠区域内两张统计图的均值。
fn overlap_means(
    regions: &RegionMask,
    maps: (&IntensityVolume, &IntensityVolume),
) -> Result<(f64, f64)> {
    let both = Region::Both.code();
    let mut count = 0usize;
    let (mut sum_first, mut sum_second) = (0.0f64, 0.0f64);
    Zip::from(regions.codes())
        .and(maps.0)
        .and(maps.1)
        .for_each(|&c, &a, &b| {
            if c == both {
                count += 1;
                sum_first += a;
                sum_second += b;
            }
        });
    if count == 0 {
        return Err(WmhError::EmptyOverlap);
    }
    let means = (sum_first / count as f64, sum_second / count as f64);
    for (visit, mean) in [(1, means.0), (2, means.1)] {
        if !mean.is_finite() {
            return Err(WmhError::NonFiniteOverlapMean { visit, mean });
        }
    }
    Ok(means)
}

/// 第4步：`better`独有区域中，`worse`统计图严格大于`thr`的体素并入`worse`掩膜。
fn correct_worse(
    regions: &RegionMask,
    better: Visit,
    worse_map: &IntensityVolume,
    worse_mask: &BinaryMask,
    thr: f64,
) -> BinaryMask {
    let exclusive = Region::exclusive(better).code();
    let data = Zip::from(regions.codes())
        .and(worse_map)
        .and(worse_mask.view())
        .map_collect(|&c, &v, &m| m | u8::from(c == exclusive && v > thr));
    BinaryMask::from_array_unchecked(data)
}

/// 使用默认参数校正两次扫描的掩膜，返回(第一次, 第二次)的校正结果。
pub fn reconcile(
    thr: f64,
    maps: (&IntensityVolume, &IntensityVolume),
    masks: (&BinaryMask, &BinaryMask),
) -> Result<(BinaryMask, BinaryMask)> {
    Reconciler::default()
        .reconcile(thr, maps, masks)
        .map(|r| r.masks)
}
