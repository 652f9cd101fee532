/// 代表一个三维体素坐标(i, j, k)索引，不负责边界检查。
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Voxel {
    pub i: usize,
    pub j: usize,
    pub k: usize,
}

/// 三维体数据的形状`(i_len, j_len, k_len)`。
pub type Shape3 = (usize, usize, usize);

/// 相对位移。
pub type Offset3 = (isize, isize, isize);

impl Voxel {
    #[inline]
    pub fn new(i: usize, j: usize, k: usize) -> Self {
        Self { i, j, k }
    }

    #[inline]
    pub fn to_tuple(self) -> (usize, usize, usize) {
        (self.i, self.j, self.k)
    }

    /// 判断是否在`shape`范围内。
    #[inline]
    pub fn is_within(self, shape: Shape3) -> bool {
        self.i < shape.0 && self.j < shape.1 && self.k < shape.2
    }

    /// 按`delta`平移。若结果越界（包括小于零），返回`None`。
    #[inline]
    pub fn offset(self, delta: Offset3, shape: Shape3) -> Option<Voxel> {
        let moved = Voxel::new(
            self.i.checked_add_signed(delta.0)?,
            self.j.checked_add_signed(delta.1)?,
            self.k.checked_add_signed(delta.2)?,
        );
        moved.is_within(shape).then_some(moved)
    }

    /// 按照`offsets`枚举在`shape`范围内的邻域体素。
    pub fn neighbors<'a>(
        self,
        shape: Shape3,
        offsets: &'a [Offset3],
    ) -> impl Iterator<Item = Voxel> + 'a {
        offsets.iter().filter_map(move |&d| self.offset(d, shape))
    }
}

impl From<(usize, usize, usize)> for Voxel {
    #[inline]
    fn from(v: (usize, usize, usize)) -> Self {
        Voxel::new(v.0, v.1, v.2)
    }
}

#[cfg(test)]
mod tests {
    use super::Voxel;

    #[test]
    fn test_offset_inside() {
        let v = Voxel::new(1, 1, 1);
        assert_eq!(v.offset((-1, 0, 1), (3, 3, 3)), Some(Voxel::new(0, 1, 2)));
    }

    #[test]
    fn test_offset_clipped_at_both_ends() {
        let v = Voxel::new(0, 2, 0);
        assert_eq!(v.offset((-1, 0, 0), (3, 3, 3)), None);
        assert_eq!(v.offset((0, 1, 0), (3, 3, 3)), None);
    }

    #[test]
    fn test_neighbors_of_corner() {
        let offsets = [(1, 0, 0), (-1, 0, 0), (0, 1, 0), (0, -1, 0), (0, 0, 1), (0, 0, -1)];
        let n: Vec<_> = Voxel::new(0, 0, 0).neighbors((2, 2, 2), &offsets).collect();
        assert_eq!(
            n,
            vec![Voxel::new(1, 0, 0), Voxel::new(0, 1, 0), Voxel::new(0, 0, 1)]
        );
    }
}
