use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "wmh-correct")]
#[command(about = "两次扫描白质高信号(WMH)掩膜的一致性校正工具集.")]
#[command(version, long_about = None)]
pub struct Cli {
    /// 子命令。
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn run_program(&mut self) -> Result<()> {
        match self.command {
            Commands::Batch(ref mut v) => v.run(),
            Commands::Pair(ref mut v) => v.run(),
            Commands::Dice(ref mut v) => v.run(),
            Commands::Threshold(ref mut v) => v.run(),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 遍历数据根目录下所有受试者/检查目录，校正掩膜并生成统计表。
    Batch(crate::subcmd_impls::batch::Batch),
    /// 校正一对统计图，输出两个校正后的掩膜。
    Pair(crate::subcmd_impls::pair::Pair),
    /// 计算两个掩膜的Dice系数。
    Dice(crate::subcmd_impls::dice::Dice),
    /// 按阈值将统计图转换为二值掩膜。
    Threshold(crate::subcmd_impls::threshold::Threshold),
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_batch() {
        use clap::Parser;
        let cli = Cli::try_parse_from([
            "wmh-correct",
            "batch",
            "-D",
            "/data",
            "--threshold",
            "2.5",
            "--connectivity",
            "18",
            "--tie-break",
            "first",
        ]);
        assert!(cli.is_ok(), "{cli:?}");
    }

    #[test]
    fn test_parse_rejects_non_finite_threshold() {
        use clap::Parser;
        let cli = Cli::try_parse_from(["wmh-correct", "batch", "-D", "/data", "-t", "NaN"]);
        assert!(cli.is_err());
    }
}
