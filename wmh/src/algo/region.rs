use super::error::{ensure_same_shape, Result};
use super::mask::{BinaryMask, Visit};
use super::voxel::Shape3;
use ndarray::{Array3, ArrayView3, Zip};

/// 区域编码：`first + 2 * second`。
#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Region {
    Neither = 0,
    OnlyFirst = 1,
    OnlySecond = 2,
    Both = 3,
}

impl Region {
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    #[inline]
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Region::Neither),
            1 => Some(Region::OnlyFirst),
            2 => Some(Region::OnlySecond),
            3 => Some(Region::Both),
            _ => None,
        }
    }

    /// 只属于`visit`的区域。
    #[inline]
    pub fn exclusive(visit: Visit) -> Self {
        match visit {
            Visit::First => Region::OnlyFirst,
            Visit::Second => Region::OnlySecond,
        }
    }
}

/// 逐体素记录其属于哪个（哪些）掩膜。仅作为校正过程的中间量，不会被持久化。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegionMask {
    codes: Array3<u8>,
}

impl RegionMask {
    /// 按照`first + 2 * second`对两个掩膜的每个体素分类。
    pub fn classify(first: &BinaryMask, second: &BinaryMask) -> Result<Self> {
        ensure_same_shape("region", first.view().shape(), second.view().shape())?;
        let codes = Zip::from(first.view())
            .and(second.view())
            .map_collect(|&a, &b| a + 2 * b);
        Ok(Self { codes })
    }

    #[inline]
    pub fn shape(&self) -> Shape3 {
        self.codes.dim()
    }

    #[inline]
    pub fn codes(&self) -> ArrayView3<'_, u8> {
        self.codes.view()
    }

    /// `index`处体素的区域。越界时返回`None`。
    #[inline]
    pub fn region_at(&self, index: (usize, usize, usize)) -> Option<Region> {
        self.codes.get(index).copied().and_then(Region::from_code)
    }

    /// 取出属于`region`的所有体素，作为掩膜返回。
    pub fn select(&self, region: Region) -> BinaryMask {
        let code = region.code();
        BinaryMask::from_array_unchecked(self.codes.mapv(|c| u8::from(c == code)))
    }

    /// 属于`region`的体素个数。
    pub fn count(&self, region: Region) -> usize {
        let code = region.code();
        self.codes.iter().filter(|&&c| c == code).count()
    }

    /// 是否至少有一个体素两个掩膜都包含。
    #[inline]
    pub fn has_overlap(&self) -> bool {
        self.codes.iter().any(|&c| c == Region::Both.code())
    }
}
