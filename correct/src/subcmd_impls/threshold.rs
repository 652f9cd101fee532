use super::utils::finite_f64;
use super::volume_io::{read_volume, write_mask};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use wmh::prelude::{threshold, DEFAULT_THRESHOLD};

#[derive(Args, Debug)]
pub struct Threshold {
    /// 统计图。
    #[arg(long)]
    map: PathBuf,
    /// 掩膜输出路径。
    #[arg(long)]
    out: PathBuf,
    /// z-score阈值，严格大于该值的体素为1。
    #[arg(long, short = 't', default_value_t = DEFAULT_THRESHOLD, value_parser = finite_f64)]
    threshold: f64,
}

impl Threshold {
    pub fn run(&mut self) -> Result<()> {
        let volume = read_volume(&self.map)?;
        let mask = threshold(&volume.data, self.threshold)?;
        write_mask(&self.out, &mask, volume.header.as_ref())?;
        println!("`{}`: {}个体素超过阈值{}", self.out.display(), mask.count(), self.threshold);
        Ok(())
    }
}
