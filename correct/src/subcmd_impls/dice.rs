use super::volume_io::read_mask;
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use wmh::prelude::PairStats;

#[derive(Args, Debug)]
pub struct Dice {
    /// 第一个掩膜。
    #[arg(long)]
    mask1: PathBuf,
    /// 第二个掩膜。
    #[arg(long)]
    mask2: PathBuf,
}

impl Dice {
    pub fn run(&mut self) -> Result<()> {
        let mask1 = read_mask(&self.mask1)?;
        let mask2 = read_mask(&self.mask2)?;
        let s = PairStats::measure("", &mask1, &mask2)?;
        println!(
            "Dice系数: {}\n\t掩膜1: {}\n\t掩膜2: {}\n\t共有: {}\n\t仅掩膜1: {}\n\t仅掩膜2: {}",
            s.dice, s.wmh_1, s.wmh_2, s.common, s.only_1, s.only_2
        );
        Ok(())
    }
}
