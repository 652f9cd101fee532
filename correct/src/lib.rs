//! `wmh-correct`：两次扫描WMH掩膜一致性校正的命令行工具集。

pub mod subcmd_impls;

pub use subcmd_impls::args::Cli;
