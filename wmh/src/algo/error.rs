use thiserror::Error;

/// 掩膜校正过程中可能出现的错误。所有错误都直接返回给调用者，核心算法不做任何恢复或重试。
#[derive(Debug, Error, Clone, PartialEq)]
pub enum WmhError {
    /// 两个应当对齐的数组形状不一致。
    #[error("`{what}`形状不一致: {left:?} vs {right:?}")]
    ShapeMismatch {
        what: &'static str,
        left: Vec<usize>,
        right: Vec<usize>,
    },
    /// 两个掩膜没有任何重叠体素，无法基于重叠区域均值重新标定阈值。
    #[error("两个掩膜没有重叠区域，无法重新标定阈值")]
    EmptyOverlap,
    /// 重叠区域内统计图取值含有`NaN`或无穷，均值无意义。
    #[error("重叠区域内第{visit}次扫描的均值不是有限值: {mean}")]
    NonFiniteOverlapMean { visit: usize, mean: f64 },
    /// 两个掩膜均为空，Dice系数分母为零。
    #[error("两个掩膜均为空，Dice系数无定义")]
    DegenerateDice,
    /// 掩膜中出现了0和1以外的取值。
    #[error("掩膜在{index:?}处取值为{value}，不是二值")]
    NonBinary {
        value: f64,
        index: (usize, usize, usize),
    },
    /// 阈值不是有限浮点数。
    #[error("阈值必须是有限浮点数，实际为{0}")]
    NonFiniteThreshold(f64),
    /// 校正参数不合法。
    #[error("校正参数不合法: {0}")]
    InvalidParams(String),
}

pub type Result<T> = std::result::Result<T, WmhError>;

/// 检查两个数组形状是否一致。
#[inline]
pub(crate) fn ensure_same_shape(what: &'static str, left: &[usize], right: &[usize]) -> Result<()> {
    if left == right {
        Ok(())
    } else {
        Err(WmhError::ShapeMismatch {
            what,
            left: left.to_vec(),
            right: right.to_vec(),
        })
    }
}
