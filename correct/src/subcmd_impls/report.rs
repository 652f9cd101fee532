//! 制表符分隔的统计表。

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use wmh::prelude::PairStats;

pub const STATS_HEADER: [&str; 7] = [
    "Subject_Date_ID",
    "WMH_1",
    "WMH_2",
    "Common",
    "Only_1",
    "Only_2",
    "Dice",
];

pub fn format_row(s: &PairStats) -> String {
    format!(
        "{}\t{}\t{}\t{}\t{}\t{}\t{:.6}",
        s.id, s.wmh_1, s.wmh_2, s.common, s.only_1, s.only_2, s.dice
    )
}

pub fn write_stats<W: Write>(w: &mut W, rows: &[PairStats]) -> std::io::Result<()> {
    writeln!(w, "{}", STATS_HEADER.join("\t"))?;
    for row in rows {
        writeln!(w, "{}", format_row(row))?;
    }
    w.flush()
}

pub fn write_stats_file(path: &Path, rows: &[PairStats]) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("无法创建统计表`{}`", path.display()))?;
    let mut w = BufWriter::new(file);
    write_stats(&mut w, rows).with_context(|| format!("无法写入统计表`{}`", path.display()))
}
