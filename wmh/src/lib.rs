//! 两次扫描白质高信号(WMH)掩膜的一致性校正。
//!
//! 核心算法位于[`algo`]：阈值化、Dice系数、以及基于重叠区域重新标定阈值的掩膜校正。

pub mod algo;
pub mod prelude;
