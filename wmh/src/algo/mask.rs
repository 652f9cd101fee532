use super::error::{ensure_same_shape, Result, WmhError};
use super::voxel::Shape3;
use ndarray::{Array3, ArrayView3, Zip};

/// 一次扫描的连续值WMH统计图（逐体素的z-score）。载入后只读。
pub type IntensityVolume = Array3<f64>;

/// 两次扫描中的哪一次。`First`对应下标0，`Second`对应下标1。
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Visit {
    First,
    Second,
}

impl Visit {
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Visit::First => 0,
            Visit::Second => 1,
        }
    }

    #[inline]
    pub fn other(self) -> Self {
        match self {
            Visit::First => Visit::Second,
            Visit::Second => Visit::First,
        }
    }

    /// 从一对值中选出属于本次扫描的那个。
    #[inline]
    pub fn pick<T>(self, pair: (T, T)) -> T {
        match self {
            Visit::First => pair.0,
            Visit::Second => pair.1,
        }
    }
}

/// 二值病灶掩膜。所有体素取值恒为0或1。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BinaryMask {
    data: Array3<u8>,
}

impl BinaryMask {
    /// 全零掩膜。
    #[inline]
    pub fn zeros(shape: Shape3) -> Self {
        Self {
            data: Array3::zeros(shape),
        }
    }

    /// 由`u8`数组构造掩膜。任何0和1以外的取值都会返回`WmhError::NonBinary`。
    pub fn from_array(data: Array3<u8>) -> Result<Self> {
        if let Some((index, &value)) = data.indexed_iter().find(|&(_, &v)| v > 1) {
            return Err(WmhError::NonBinary {
                value: value as f64,
                index,
            });
        }
        Ok(Self { data })
    }

    /// 由浮点数组（例如从NIfTI文件读入的掩膜）构造掩膜，取值必须严格为0.0或1.0。
    pub fn from_volume(volume: &Array3<f64>) -> Result<Self> {
        if let Some((index, &value)) = volume
            .indexed_iter()
            .find(|&(_, &v)| v != 0.0 && v != 1.0)
        {
            return Err(WmhError::NonBinary { value, index });
        }
        Ok(Self {
            data: volume.mapv(|v| u8::from(v == 1.0)),
        })
    }

    /// 调用者保证`data`只含0和1。
    #[inline]
    pub(crate) fn from_array_unchecked(data: Array3<u8>) -> Self {
        debug_assert!(data.iter().all(|&v| v <= 1));
        Self { data }
    }

    #[inline]
    pub fn shape(&self) -> Shape3 {
        self.data.dim()
    }

    #[inline]
    pub fn view(&self) -> ArrayView3<'_, u8> {
        self.data.view()
    }

    #[inline]
    pub fn as_array(&self) -> &Array3<u8> {
        &self.data
    }

    #[inline]
    pub fn into_array(self) -> Array3<u8> {
        self.data
    }

    /// 掩膜中值为1的体素个数。
    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&v| v == 1).count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.iter().all(|&v| v == 0)
    }

    /// 判断`index`处体素是否属于掩膜。越界时返回`None`。
    #[inline]
    pub fn get(&self, index: (usize, usize, usize)) -> Option<bool> {
        self.data.get(index).map(|&v| v == 1)
    }

    /// 并集。
    pub fn union(&self, other: &BinaryMask) -> Result<BinaryMask> {
        ensure_same_shape("union", self.data.shape(), other.data.shape())?;
        let data = Zip::from(&self.data)
            .and(&other.data)
            .map_collect(|&a, &b| a | b);
        Ok(Self::from_array_unchecked(data))
    }

    /// 差集`self AND NOT other`。
    pub fn difference(&self, other: &BinaryMask) -> Result<BinaryMask> {
        ensure_same_shape("difference", self.data.shape(), other.data.shape())?;
        let data = Zip::from(&self.data)
            .and(&other.data)
            .map_collect(|&a, &b| a & !b & 1);
        Ok(Self::from_array_unchecked(data))
    }

    /// 判断`self`是否包含`other`中的所有体素。
    pub fn is_superset_of(&self, other: &BinaryMask) -> Result<bool> {
        Ok(other.difference(self)?.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_from_array_rejects_non_binary() {
        let data = array![[[0u8, 1], [2, 0]]];
        assert_eq!(
            BinaryMask::from_array(data).unwrap_err(),
            WmhError::NonBinary {
                value: 2.0,
                index: (0, 1, 0),
            }
        );
    }

    #[test]
    fn test_from_volume() {
        let vol = array![[[0.0, 1.0], [1.0, 0.0]]];
        let mask = BinaryMask::from_volume(&vol).unwrap();
        assert_eq!(mask.count(), 2);
        assert_eq!(mask.get((0, 0, 1)), Some(true));
        assert_eq!(mask.get((0, 1, 1)), Some(false));
        assert_eq!(mask.get((1, 0, 0)), None);

        let vol = array![[[0.0, 0.5]]];
        assert!(matches!(
            BinaryMask::from_volume(&vol),
            Err(WmhError::NonBinary { .. })
        ));
    }

    #[test]
    fn test_union_and_difference() {
        let a = BinaryMask::from_array(array![[[1u8, 1, 0, 0]]]).unwrap();
        let b = BinaryMask::from_array(array![[[0u8, 1, 1, 0]]]).unwrap();
        assert_eq!(a.union(&b).unwrap().into_array(), array![[[1u8, 1, 1, 0]]]);
        assert_eq!(
            a.difference(&b).unwrap().into_array(),
            array![[[1u8, 0, 0, 0]]]
        );
        assert!(a.union(&b).unwrap().is_superset_of(&a).unwrap());
        assert!(!a.is_superset_of(&b).unwrap());
    }

    #[test]
    fn test_shape_mismatch() {
        let a = BinaryMask::zeros((2, 2, 1));
        let b = BinaryMask::zeros((2, 1, 2));
        assert!(matches!(
            a.union(&b),
            Err(WmhError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_visit_pick() {
        assert_eq!(Visit::First.pick(("a", "b")), "a");
        assert_eq!(Visit::Second.pick(("a", "b")), "b");
        assert_eq!(Visit::First.other(), Visit::Second);
        assert_eq!(Visit::Second.index(), 1);
    }
}
