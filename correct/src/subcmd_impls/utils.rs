use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use wmh::prelude::{Connectivity, ReconcileParams, TieBreak};

/// 解析有限浮点数阈值。
pub fn finite_f64(s: &str) -> Result<f64, &'static str> {
    const ERR: &str = "阈值必须是有限浮点数";
    let v: f64 = s.trim().parse().map_err(|_| ERR)?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(ERR)
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
/// 膨胀所用的邻域。
pub enum ConnectivityArg {
    /// 6-邻域。
    #[value(alias = "6")]
    Face,
    /// 18-邻域。
    #[value(alias = "18")]
    Edge,
    /// 26-邻域。
    #[value(alias = "26")]
    Vertex,
}

impl From<ConnectivityArg> for Connectivity {
    fn from(v: ConnectivityArg) -> Self {
        match v {
            ConnectivityArg::Face => Connectivity::Face,
            ConnectivityArg::Edge => Connectivity::Edge,
            ConnectivityArg::Vertex => Connectivity::Vertex,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
/// 两次扫描重叠区域均值相等时，哪一次视为质量较好。
pub enum TieBreakArg {
    First,
    Second,
}

impl From<TieBreakArg> for TieBreak {
    fn from(v: TieBreakArg) -> Self {
        match v {
            TieBreakArg::First => TieBreak::PreferFirst,
            TieBreakArg::Second => TieBreak::PreferSecond,
        }
    }
}

/// 校正参数相关的公共选项。
#[derive(Args, Debug, Default)]
pub struct ParamArgs {
    /// 校正参数TOML文件；缺省字段使用内置常量。
    #[arg(long)]
    params: Option<PathBuf>,
    /// 膨胀邻域，覆盖参数文件中的设置。
    #[arg(long, value_enum)]
    connectivity: Option<ConnectivityArg>,
    /// 均值相等时的判定策略，覆盖参数文件中的设置。
    #[arg(long, value_enum)]
    tie_break: Option<TieBreakArg>,
}

impl ParamArgs {
    pub fn load(&self) -> Result<ReconcileParams> {
        let mut params = match self.params.as_deref() {
            Some(path) => load_params(path)?,
            None => ReconcileParams::default(),
        };
        if let Some(c) = self.connectivity {
            params.connectivity = c.into();
        }
        if let Some(t) = self.tie_break {
            params.tie_break = t.into();
        }
        params.validate()?;
        Ok(params)
    }
}

/// 从TOML文件读取校正参数。
pub fn load_params(path: &Path) -> Result<ReconcileParams> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("无法读取参数文件`{}`", path.display()))?;
    parse_params(&text).with_context(|| format!("参数文件`{}`格式错误", path.display()))
}

pub fn parse_params(text: &str) -> Result<ReconcileParams> {
    Ok(toml::from_str(text)?)
}
