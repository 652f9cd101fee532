use super::voxel::{Shape3, Voxel};

/// 按行优先顺序（`k`变化最快）枚举形状为`shape`的体数据中所有体素坐标。
pub struct VoxelIter {
    cur: Voxel,
    shape: Shape3,
}

impl VoxelIter {
    #[inline]
    pub fn new(shape: Shape3) -> Self {
        Self {
            cur: Voxel::new(0, 0, 0),
            shape,
        }
    }
}

impl Iterator for VoxelIter {
    type Item = Voxel;

    fn next(&mut self) -> Option<Self::Item> {
        let (i_len, j_len, k_len) = self.shape;
        if self.cur.i >= i_len || j_len == 0 || k_len == 0 {
            return None;
        }
        let ret = self.cur;
        if self.cur.k + 1 < k_len {
            self.cur.k += 1;
        } else if self.cur.j + 1 < j_len {
            self.cur.k = 0;
            self.cur.j += 1;
        } else {
            self.cur.k = 0;
            self.cur.j = 0;
            self.cur.i += 1;
        }
        Some(ret)
    }
}
