//! 三维二值形态学。

use super::error::Result;
use super::iter::VoxelIter;
use super::mask::BinaryMask;
use super::voxel::Offset3;
use serde::Deserialize;

/// 膨胀所用的结构元素（邻域）。
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Connectivity {
    /// 6-邻域（共面）。
    #[default]
    Face,
    /// 18-邻域（共面或共边）。
    Edge,
    /// 26-邻域（共面、共边或共顶点）。
    Vertex,
}

impl Connectivity {
    /// 允许非零的坐标分量个数上限。
    #[inline]
    fn rank(self) -> usize {
        match self {
            Connectivity::Face => 1,
            Connectivity::Edge => 2,
            Connectivity::Vertex => 3,
        }
    }

    /// 邻域中的体素个数（不含中心）。
    #[inline]
    pub fn neighbor_count(self) -> usize {
        match self {
            Connectivity::Face => 6,
            Connectivity::Edge => 18,
            Connectivity::Vertex => 26,
        }
    }

    /// 邻域体素相对于中心的全部位移。
    pub fn offsets(self) -> Vec<Offset3> {
        let mut offsets = Vec::with_capacity(self.neighbor_count());
        for di in -1..=1_isize {
            for dj in -1..=1_isize {
                for dk in -1..=1_isize {
                    let nonzero = [di, dj, dk].iter().filter(|&&d| d != 0).count();
                    if nonzero != 0 && nonzero <= self.rank() {
                        offsets.push((di, dj, dk));
                    }
                }
            }
        }
        offsets
    }
}

/// 对`mask`进行`iterations`次二值膨胀。体数据以外的体素视为背景，不会被写入。
pub fn dilate(mask: &BinaryMask, connectivity: Connectivity, iterations: usize) -> BinaryMask {
    let offsets = connectivity.offsets();
    let shape = mask.shape();
    let mut current = mask.as_array().clone();
    for _ in 0..iterations {
        let mut next = current.clone();
        for voxel in VoxelIter::new(shape) {
            if current[voxel.to_tuple()] == 0 {
                continue;
            }
            for n in voxel.neighbors(shape, &offsets) {
                next[n.to_tuple()] = 1;
            }
        }
        current = next;
    }
    BinaryMask::from_array_unchecked(current)
}

/// 膨胀结果减去原区域，得到包围`region`的外壳。
pub fn border_shell(
    region: &BinaryMask,
    connectivity: Connectivity,
    iterations: usize,
) -> Result<BinaryMask> {
    dilate(region, connectivity, iterations).difference(region)
}
