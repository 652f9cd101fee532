//! 体数据读写：NIfTI(`.nii`/`.nii.gz`)与npy。

use anyhow::{bail, Context, Result};
use ndarray::{Array3, Axis, Ix3};
use nifti::writer::WriterOptions;
use nifti::{IntoNdArray, NiftiHeader, NiftiObject, ReaderOptions};
use std::path::Path;
use wmh::prelude::{BinaryMask, IntensityVolume};

/// 按文件扩展名区分的体数据格式。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum VolumeFormat {
    Nifti,
    Npy,
}

impl VolumeFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        if name.ends_with(".nii") || name.ends_with(".nii.gz") {
            Ok(VolumeFormat::Nifti)
        } else if name.ends_with(".npy") {
            Ok(VolumeFormat::Npy)
        } else {
            bail!("无法识别的体数据格式: `{}`", path.display())
        }
    }
}

/// 载入后的统计图。NIfTI文件会保留其头信息，以便写出掩膜时沿用同一空间坐标。
pub struct Volume {
    pub data: IntensityVolume,
    pub header: Option<NiftiHeader>,
}

pub fn read_volume(path: &Path) -> Result<Volume> {
    match VolumeFormat::from_path(path)? {
        VolumeFormat::Nifti => {
            let (data, header) = read_nifti(path)?;
            Ok(Volume {
                data,
                header: Some(header),
            })
        }
        VolumeFormat::Npy => {
            let data: Array3<f64> = ndarray_npy::read_npy(path)
                .with_context(|| format!("无法读取npy文件`{}`", path.display()))?;
            Ok(Volume { data, header: None })
        }
    }
}

/// 读取二值掩膜。npy掩膜以`u8`保存；NIfTI掩膜可以是任意数值类型，但取值必须为0或1。
pub fn read_mask(path: &Path) -> Result<BinaryMask> {
    let mask = match VolumeFormat::from_path(path)? {
        VolumeFormat::Nifti => BinaryMask::from_volume(&read_nifti(path)?.0),
        VolumeFormat::Npy => {
            let data: Array3<u8> = ndarray_npy::read_npy(path)
                .with_context(|| format!("无法读取npy文件`{}`", path.display()))?;
            BinaryMask::from_array(data)
        }
    };
    mask.with_context(|| format!("`{}`不是二值掩膜", path.display()))
}

/// 写出掩膜。写NIfTI时若给出`reference`，沿用其头信息（数据类型改为`u8`）；`.gz`后缀自动压缩。
pub fn write_mask(path: &Path, mask: &BinaryMask, reference: Option<&NiftiHeader>) -> Result<()> {
    match VolumeFormat::from_path(path)? {
        VolumeFormat::Nifti => {
            let mut options = WriterOptions::new(path);
            if let Some(header) = reference {
                options = options.reference_header(header);
            }
            options
                .write_nifti(mask.as_array())
                .with_context(|| format!("无法写入NIfTI文件`{}`", path.display()))
        }
        VolumeFormat::Npy => ndarray_npy::write_npy(path, mask.as_array())
            .with_context(|| format!("无法写入npy文件`{}`", path.display())),
    }
}

fn read_nifti(path: &Path) -> Result<(Array3<f64>, NiftiHeader)> {
    let obj = ReaderOptions::new()
        .read_file(path)
        .with_context(|| format!("无法读取NIfTI文件`{}`", path.display()))?;
    let header = obj.header().clone();
    let volume = obj
        .into_volume()
        .into_ndarray::<f64>()
        .with_context(|| format!("无法转换`{}`的体数据", path.display()))?;
    // [x, y, z, 1] -> [x, y, z]
    let volume = match volume.ndim() {
        3 => volume,
        4 if volume.len_of(Axis(3)) == 1 => volume.index_axis_move(Axis(3), 0),
        n => bail!("`{}`是{n}维数据，只支持三维体数据", path.display()),
    };
    let volume = volume.into_dimensionality::<Ix3>()?;
    Ok((volume, header))
}
