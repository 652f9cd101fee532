use super::error::{Result, WmhError};
use super::morph::Connectivity;
use super::reconcile::TieBreak;
use serde::Deserialize;

/// 校正算法使用的常量，取自原始部署时标定的数值。
pub mod consts {
    /// 生成初始掩膜的默认z-score阈值。
    pub const DEFAULT_THRESHOLD: f64 = 3.0;

    /// 基线阈值 = `MEAN_SCALE * min(mean1, mean2) - MEAN_OFFSET`。
    pub const MEAN_SCALE: f64 = 0.6;

    /// 见[`MEAN_SCALE`]。
    pub const MEAN_OFFSET: f64 = 0.3;

    /// 基线阈值下限。
    pub const MIN_BASE_THRESHOLD: f64 = 1.5;

    /// 基线阈值上限。
    pub const MAX_BASE_THRESHOLD: f64 = 3.0;

    /// 重叠区域的膨胀次数。
    pub const DILATION_ITERATIONS: usize = 1;
}

use consts::*;

/// 掩膜校正的全部可调参数。缺省字段取[`consts`]中的数值，可以从TOML等格式反序列化。
#[derive(Copy, Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReconcileParams {
    pub mean_scale: f64,
    pub mean_offset: f64,
    pub min_base_threshold: f64,
    pub max_base_threshold: f64,
    pub dilation_iterations: usize,
    pub connectivity: Connectivity,
    pub tie_break: TieBreak,
}

impl Default for ReconcileParams {
    fn default() -> Self {
        Self {
            mean_scale: MEAN_SCALE,
            mean_offset: MEAN_OFFSET,
            min_base_threshold: MIN_BASE_THRESHOLD,
            max_base_threshold: MAX_BASE_THRESHOLD,
            dilation_iterations: DILATION_ITERATIONS,
            connectivity: Connectivity::default(),
            tie_break: TieBreak::default(),
        }
    }
}

impl ReconcileParams {
    pub fn validate(&self) -> Result<()> {
        let finite = [
            ("mean_scale", self.mean_scale),
            ("mean_offset", self.mean_offset),
            ("min_base_threshold", self.min_base_threshold),
            ("max_base_threshold", self.max_base_threshold),
        ];
        if let Some((name, v)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(WmhError::InvalidParams(format!("`{name}`不是有限值: {v}")));
        }
        if self.min_base_threshold > self.max_base_threshold {
            return Err(WmhError::InvalidParams(format!(
                "基线阈值下限{}大于上限{}",
                self.min_base_threshold, self.max_base_threshold
            )));
        }
        if self.dilation_iterations == 0 {
            return Err(WmhError::InvalidParams("膨胀次数至少为1".into()));
        }
        Ok(())
    }

    /// 按照上下限截断基线阈值。
    #[inline]
    pub fn clamp_base(&self, base: f64) -> f64 {
        base.clamp(self.min_base_threshold, self.max_base_threshold)
    }
}
