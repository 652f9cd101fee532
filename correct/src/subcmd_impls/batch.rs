use super::discover::{discover_studies, Study};
use super::report::write_stats_file;
use super::utils::{finite_f64, ParamArgs};
use super::volume_io::{read_volume, write_mask};
use anyhow::{bail, ensure, Context, Result};
use clap::Args;
use std::path::PathBuf;
use std::sync::mpsc::channel;
use std::time::Instant;
use threadpool::ThreadPool;
use tracing::{debug, error, info, info_span, warn};
use wmh::prelude::{correct_pair, PairStats, Reconciler, DEFAULT_THRESHOLD};

#[derive(Args, Debug)]
pub struct Batch {
    /// 数据根目录，其下为受试者目录。
    #[arg(long = "data-dir", short = 'D')]
    data_dir: PathBuf,
    /// 生成初始掩膜的z-score阈值。
    #[arg(long, short = 't', default_value_t = DEFAULT_THRESHOLD, value_parser = finite_f64)]
    threshold: f64,
    /// 统计表路径（相对路径以数据根目录为基准）。
    #[arg(long, default_value = "wmh_stats.txt")]
    stats_file: PathBuf,
    /// 受试者目录名前缀。
    #[arg(long, default_value = "M")]
    subject_prefix: String,
    /// 检查目录名前缀。
    #[arg(long, default_value = "St")]
    study_prefix: String,
    /// 并行任务数；0表示使用全部逻辑CPU。
    #[arg(long, short = 'j', default_value_t = 0)]
    jobs: usize,
    /// 同时以npy格式保存校正后的掩膜。
    #[arg(long)]
    npy: bool,
    #[command(flatten)]
    reconcile: ParamArgs,
}

impl Batch {
    pub fn run(&mut self) -> Result<()> {
        // [M*/St*/ucd/{id}_UCD_WMH_ZScore_to_template{,_1}.nii.gz] -> [M*/St*/ucd/v{1,2}_corrected_trace.nii.gz] + 统计表
        ensure!(
            self.data_dir.is_dir(),
            "数据根目录`{}`不存在",
            self.data_dir.display()
        );
        let reconciler = Reconciler::new(self.reconcile.load()?)?;
        let studies = discover_studies(&self.data_dir, &self.subject_prefix, &self.study_prefix)?;
        if studies.is_empty() {
            warn!(data_dir = %self.data_dir.display(), "没有找到任何检查目录");
        }
        let jobs = match self.jobs {
            0 => num_cpus::get(),
            n => n,
        };
        info!(studies = studies.len(), jobs, threshold = self.threshold, "开始批处理");

        let started = Instant::now();
        let program = Program::new(reconciler, self.threshold, self.npy);
        let summary = program.run_all(studies, jobs);

        let stats_path = self.data_dir.join(&self.stats_file);
        write_stats_file(&stats_path, &summary.rows)?;
        info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            elapsed_ms = started.elapsed().as_millis() as u64,
            stats = %stats_path.display(),
            "批处理完成"
        );
        if summary.failed > 0 {
            bail!("{}个检查处理失败", summary.failed);
        }
        Ok(())
    }
}

/// 一次检查的处理结果：校正前、校正后的统计。
#[derive(Clone, Debug)]
pub struct StudyOutcome {
    pub original: PairStats,
    pub corrected: PairStats,
}

/// 批处理汇总。`rows`按检查的排序顺序排列，每个成功的检查占两行（校正前、校正后）。
#[derive(Clone, Debug, Default)]
pub struct Summary {
    pub rows: Vec<PairStats>,
    pub succeeded: usize,
    pub failed: usize,
}

/// 单个检查的处理流程。各个检查之间没有共享状态，可以放到线程池中独立执行。
#[derive(Copy, Clone, Debug)]
pub struct Program {
    reconciler: Reconciler,
    threshold: f64,
    save_npy: bool,
}

impl Program {
    #[inline]
    pub fn new(reconciler: Reconciler, threshold: f64, save_npy: bool) -> Self {
        Self {
            reconciler,
            threshold,
            save_npy,
        }
    }

    /// 处理全部检查。单个检查失败只记录日志，不影响其它检查。
    pub fn run_all(&self, studies: Vec<Study>, jobs: usize) -> Summary {
        let total = studies.len();
        let mut results: Vec<(usize, Study, Result<StudyOutcome>)> = if jobs <= 1 {
            studies
                .into_iter()
                .enumerate()
                .map(|(index, study)| {
                    let outcome = self.run_study(&study);
                    (index, study, outcome)
                })
                .collect()
        } else {
            let pool = ThreadPool::new(jobs);
            let (tx, rx) = channel();
            for (index, study) in studies.into_iter().enumerate() {
                let tx = tx.clone();
                let program = *self;
                pool.execute(move || {
                    let outcome = program.run_study(&study);
                    // 接收端在所有任务结束前不会被丢弃
                    let _ = tx.send((index, study, outcome));
                });
            }
            drop(tx);
            rx.iter().collect()
        };
        results.sort_by_key(|r| r.0);

        let mut summary = Summary::default();
        for (_, study, outcome) in results {
            match outcome {
                Ok(o) => {
                    summary.succeeded += 1;
                    summary.rows.push(o.original);
                    summary.rows.push(o.corrected);
                }
                Err(e) => {
                    summary.failed += 1;
                    error!(id = %study.file_id(), dir = %study.dir.display(), "处理失败: {e:#}");
                }
            }
        }
        let lost = total - summary.succeeded - summary.failed;
        if lost > 0 {
            error!(lost, "部分任务异常终止");
            summary.failed += lost;
        }
        summary
    }

    pub fn run_study(&self, study: &Study) -> Result<StudyOutcome> {
        let id = study.file_id();
        let _span = info_span!("study", id = %id).entered();
        let (path1, path2) = study.map_paths();
        let v1 = read_volume(&path1)?;
        let v2 = read_volume(&path2)?;

        let result = correct_pair(&self.reconciler, self.threshold, &id, (&v1.data, &v2.data))
            .with_context(|| format!("校正`{id}`失败"))?;
        let r = &result.reconciliation;
        debug!(
            new_threshold = r.recalibration.threshold,
            better = ?r.better,
            added_1 = r.added.0,
            added_2 = r.added.1,
            "掩膜校正完成"
        );
        info!(
            dice_before = result.original.dice,
            dice_after = result.corrected.dice,
            "Dice系数"
        );

        let (mask1, mask2) = &r.masks;
        let (out1, out2) = study.output_paths("nii.gz");
        write_mask(&out1, mask1, v1.header.as_ref())?;
        write_mask(&out2, mask2, v2.header.as_ref())?;
        if self.save_npy {
            let (npy1, npy2) = study.output_paths("npy");
            write_mask(&npy1, mask1, None)?;
            write_mask(&npy2, mask2, None)?;
        }

        Ok(StudyOutcome {
            original: result.original,
            corrected: result.corrected,
        })
    }
}
