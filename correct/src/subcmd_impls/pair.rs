use super::utils::{finite_f64, ParamArgs};
use super::volume_io::{read_volume, write_mask};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use tracing::info;
use wmh::prelude::{correct_pair, Reconciler, DEFAULT_THRESHOLD};

#[derive(Args, Debug)]
pub struct Pair {
    /// 第一次扫描的统计图。
    #[arg(long)]
    map1: PathBuf,
    /// 第二次扫描的统计图。
    #[arg(long)]
    map2: PathBuf,
    /// 第一次扫描校正后掩膜的输出路径。
    #[arg(long)]
    out1: PathBuf,
    /// 第二次扫描校正后掩膜的输出路径。
    #[arg(long)]
    out2: PathBuf,
    /// 生成初始掩膜的z-score阈值。
    #[arg(long, short = 't', default_value_t = DEFAULT_THRESHOLD, value_parser = finite_f64)]
    threshold: f64,
    #[command(flatten)]
    reconcile: ParamArgs,
}

impl Pair {
    pub fn run(&mut self) -> Result<()> {
        let reconciler = Reconciler::new(self.reconcile.load()?)?;
        let v1 = read_volume(&self.map1)?;
        let v2 = read_volume(&self.map2)?;
        let id = self
            .map1
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let result = correct_pair(&reconciler, self.threshold, &id, (&v1.data, &v2.data))?;
        let r = &result.reconciliation;
        info!(
            new_threshold = r.recalibration.threshold,
            better = ?r.better,
            added_1 = r.added.0,
            added_2 = r.added.1,
            "掩膜校正完成"
        );
        println!("校正前Dice系数: {}", result.original.dice);
        println!("校正后Dice系数: {}", result.corrected.dice);

        write_mask(&self.out1, &r.masks.0, v1.header.as_ref())?;
        write_mask(&self.out2, &r.masks.1, v2.header.as_ref())?;
        Ok(())
    }
}
