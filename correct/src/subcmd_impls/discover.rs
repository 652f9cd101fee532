//! 数据根目录的遍历：`<data_dir>/M*/St*/ucd/`。

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 每个检查目录下存放数据的子目录。
pub const WORK_SUBDIR: &str = "ucd";

/// 第一次扫描统计图的文件名后缀。
pub const MAP1_SUFFIX: &str = "_UCD_WMH_ZScore_to_template.nii.gz";

/// 第二次扫描统计图的文件名后缀。
pub const MAP2_SUFFIX: &str = "_UCD_WMH_ZScore_to_template_1.nii.gz";

pub const OUT1_STEM: &str = "v1_corrected_trace";
pub const OUT2_STEM: &str = "v2_corrected_trace";

/// 一个受试者的一次检查。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Study {
    /// 受试者目录名，如`M0001`。
    pub subject: String,
    /// 检查目录名，如`Study20180101_1`。
    pub study: String,
    /// 数据所在目录`<subject>/<study>/ucd`。
    pub dir: PathBuf,
}

impl Study {
    /// 检查日期：检查目录名的第5至第12个字符。
    pub fn date(&self) -> String {
        self.study.chars().skip(5).take(8).collect()
    }

    /// `<subject>_<date>`，同时也是输入文件名的前缀与统计表的行标识。
    pub fn file_id(&self) -> String {
        format!("{}_{}", self.subject, self.date())
    }

    pub fn map_paths(&self) -> (PathBuf, PathBuf) {
        let id = self.file_id();
        (
            self.dir.join(format!("{id}{MAP1_SUFFIX}")),
            self.dir.join(format!("{id}{MAP2_SUFFIX}")),
        )
    }

    /// 校正后掩膜的输出路径，`ext`为`nii.gz`或`npy`。
    pub fn output_paths(&self, ext: &str) -> (PathBuf, PathBuf) {
        (
            self.dir.join(format!("{OUT1_STEM}.{ext}")),
            self.dir.join(format!("{OUT2_STEM}.{ext}")),
        )
    }
}

/// 按名称排序枚举所有检查。受试者目录以`subject_prefix`开头，检查目录以`study_prefix`开头。
pub fn discover_studies(
    data_dir: &Path,
    subject_prefix: &str,
    study_prefix: &str,
) -> Result<Vec<Study>> {
    let mut studies = Vec::new();
    for (subject, subject_dir) in child_dirs(data_dir, subject_prefix)? {
        for (study, study_dir) in child_dirs(&subject_dir, study_prefix)? {
            studies.push(Study {
                subject: subject.clone(),
                study,
                dir: study_dir.join(WORK_SUBDIR),
            });
        }
    }
    Ok(studies)
}

fn child_dirs(dir: &Path, prefix: &str) -> Result<Vec<(String, PathBuf)>> {
    let mut out = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.with_context(|| format!("无法遍历目录`{}`", dir.display()))?;
        if !entry.file_type().is_dir() {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            continue;
        };
        if name.starts_with(prefix) {
            let name = name.to_owned();
            out.push((name, entry.into_path()));
        }
    }
    Ok(out)
}
