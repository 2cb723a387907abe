//! Bounded batch execution over a directory of photos.
//!
//! [`BatchRunner::prepare`] performs every check that can fail the whole run (masks,
//! sources, output directory, worker pool) before any photo is decoded.
//! [`BatchRunner::run`] then processes the photos on a fixed-size rayon pool and only
//! returns once every photo has either been saved, skipped or has failed.

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{Level, info, warn};
use picasso_utils::{AppSettings, FileFilter, RgbColor, collect_files, timing_guard};
use rayon::{ThreadPool, ThreadPoolBuilder, prelude::*};
use serde::Serialize;

use crate::{
    catalog::DecorationCatalog,
    detector::{DetectionOptions, FaceDetector},
    error::{PipelineError, SetupError},
    pipeline::{ImagePipeline, PipelineConfig, SourceJob},
    placement::AppliedDecoration,
    random::SeedPolicy,
};

/// Extensions accepted for source photos, matched case-insensitively.
pub const SOURCE_EXTENSIONS: &[&str] = &["jpg", "jpeg"];

/// Everything a batch needs to know up front.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub masks_dir: PathBuf,
    pub mask_prefix: String,
    pub input_dir: PathBuf,
    pub palette: Vec<RgbColor>,
    pub pipeline: PipelineConfig,
    /// Worker threads; always at least one.
    pub workers: usize,
    pub seed: SeedPolicy,
}

impl BatchConfig {
    pub fn from_settings(settings: &AppSettings) -> Self {
        Self {
            masks_dir: settings.paths.masks_dir.clone(),
            mask_prefix: settings.paths.mask_prefix.clone(),
            input_dir: settings.paths.input_dir.clone(),
            palette: settings.palette.clone(),
            pipeline: PipelineConfig {
                detection_width: settings.resize.detection_width,
                output_width: settings.resize.output_width,
                output_dir: settings.paths.output_dir.clone(),
                detection: DetectionOptions::default(),
            },
            workers: settings.batch.resolved_workers(),
            seed: SeedPolicy::from_seed(settings.batch.seed),
        }
    }
}

/// How one photo ended up.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ImageOutcome {
    Saved {
        output: PathBuf,
        quality: u8,
        width: u32,
        height: u32,
        faces: usize,
        decorations: Vec<AppliedDecoration>,
    },
    /// The detector itself failed; nothing was written.
    Skipped { reason: String },
    Failed { step: String, error: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageRecord {
    pub source: PathBuf,
    pub sequence: usize,
    #[serde(flatten)]
    pub outcome: ImageOutcome,
}

/// Per-photo records in sequence order plus totals.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub saved: usize,
    pub skipped: usize,
    pub failed: usize,
    pub images: Vec<ImageRecord>,
}

impl BatchReport {
    pub fn from_records(images: Vec<ImageRecord>) -> Self {
        let mut report = Self::default();
        for record in &images {
            match record.outcome {
                ImageOutcome::Saved { .. } => report.saved += 1,
                ImageOutcome::Skipped { .. } => report.skipped += 1,
                ImageOutcome::Failed { .. } => report.failed += 1,
            }
        }
        report.images = images;
        report
    }

    pub fn total(&self) -> usize {
        self.images.len()
    }
}

pub struct BatchRunner {
    config: BatchConfig,
    catalog: DecorationCatalog,
    jobs: Vec<SourceJob>,
    pool: ThreadPool,
}

impl BatchRunner {
    /// Validate the configuration, load the decoration catalog, enumerate sources,
    /// create the output directory and build the worker pool, in that order.
    pub fn prepare(config: BatchConfig) -> Result<Self, SetupError> {
        if config.pipeline.detection_width == 0 {
            return Err(SetupError::InvalidWidth {
                name: "detection_width",
            });
        }
        if config.pipeline.output_width == 0 {
            return Err(SetupError::InvalidWidth {
                name: "output_width",
            });
        }

        let catalog =
            DecorationCatalog::load(&config.masks_dir, &config.mask_prefix, &config.palette)?;
        let jobs = collect_jobs(&config.input_dir)?;

        let output_dir = &config.pipeline.output_dir;
        fs::create_dir_all(output_dir).map_err(|source| SetupError::OutputDir {
            dir: output_dir.clone(),
            source,
        })?;

        let workers = config.workers.max(1);
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("picasso-worker-{i}"))
            .build()?;

        info!(
            "Prepared batch: {} source image(s) from {}, {} worker(s), output to {}",
            jobs.len(),
            config.input_dir.display(),
            workers,
            output_dir.display()
        );
        Ok(Self {
            config,
            catalog,
            jobs,
            pool,
        })
    }

    pub fn jobs(&self) -> &[SourceJob] {
        &self.jobs
    }

    /// Process every source photo and wait for all of them. Per-image failures are
    /// recorded in the report; they never abort the batch.
    pub fn run(&self, detector: &dyn FaceDetector) -> BatchReport {
        let _guard = timing_guard("picasso_core::batch", Level::Info);
        let pipeline = ImagePipeline::new(&self.catalog, detector, &self.config.pipeline);
        let seed = self.config.seed;

        let records: Vec<ImageRecord> = self.pool.install(|| {
            self.jobs
                .par_iter()
                .map(|job| run_job(&pipeline, seed, job))
                .collect()
        });

        let report = BatchReport::from_records(records);
        info!(
            "Batch finished: {} saved, {} skipped, {} failed",
            report.saved, report.skipped, report.failed
        );
        report
    }
}

fn collect_jobs(input_dir: &Path) -> Result<Vec<SourceJob>, SetupError> {
    let filter = FileFilter::with_extensions(SOURCE_EXTENSIONS);
    let sources = collect_files(input_dir, &filter).map_err(|err| SetupError::ScanFailed {
        dir: input_dir.to_path_buf(),
        reason: format!("{err:#}"),
    })?;
    if sources.is_empty() {
        return Err(SetupError::NoSourceImages {
            dir: input_dir.to_path_buf(),
        });
    }
    Ok(sources
        .into_iter()
        .enumerate()
        .map(|(i, source)| SourceJob {
            source,
            sequence: i + 1,
        })
        .collect())
}

fn run_job(pipeline: &ImagePipeline<'_>, seed: SeedPolicy, job: &SourceJob) -> ImageRecord {
    let mut rng = seed.rng_for(job.sequence);
    let outcome = match pipeline.process(job, &mut rng) {
        Ok(saved) => {
            info!(
                "Saved {} -> {} ({} face(s), quality {})",
                job.source.display(),
                saved.output.display(),
                saved.faces,
                saved.quality
            );
            ImageOutcome::Saved {
                output: saved.output,
                quality: saved.quality,
                width: saved.width,
                height: saved.height,
                faces: saved.faces,
                decorations: saved.decorations,
            }
        }
        Err(PipelineError::Detection(err)) => {
            warn!("Skipping {}: {err}", job.source.display());
            ImageOutcome::Skipped {
                reason: err.to_string(),
            }
        }
        Err(err) => {
            warn!(
                "Failed to process {} during {}: {err}",
                job.source.display(),
                err.step()
            );
            ImageOutcome::Failed {
                step: err.step().to_string(),
                error: err.to_string(),
            }
        }
    };
    ImageRecord {
        source: job.source.clone(),
        sequence: job.sequence,
        outcome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use picasso_utils::config::BatchSettings;

    #[test]
    fn from_settings_copies_paths_and_widths() {
        let mut settings = AppSettings::default();
        settings.batch = BatchSettings {
            workers: 3,
            seed: Some(42),
        };
        let config = BatchConfig::from_settings(&settings);
        assert_eq!(config.masks_dir, settings.paths.masks_dir);
        assert_eq!(config.pipeline.detection_width, 1024);
        assert_eq!(config.pipeline.output_width, 512);
        assert_eq!(config.pipeline.detection, DetectionOptions::default());
        assert_eq!(config.workers, 3);
        assert_eq!(config.seed, SeedPolicy::Fixed(42));
    }

    #[test]
    fn report_counts_each_outcome() {
        let record = |sequence, outcome| ImageRecord {
            source: PathBuf::from(format!("{sequence}.jpg")),
            sequence,
            outcome,
        };
        let report = BatchReport::from_records(vec![
            record(
                1,
                ImageOutcome::Skipped {
                    reason: "x".into(),
                },
            ),
            record(
                2,
                ImageOutcome::Failed {
                    step: "decode".into(),
                    error: "bad".into(),
                },
            ),
            record(
                3,
                ImageOutcome::Failed {
                    step: "save".into(),
                    error: "disk".into(),
                },
            ),
        ]);
        assert_eq!((report.saved, report.skipped, report.failed), (0, 1, 2));
        assert_eq!(report.total(), 3);
    }

    #[test]
    fn outcome_serializes_with_status_tag() {
        let record = ImageRecord {
            source: PathBuf::from("a.jpg"),
            sequence: 1,
            outcome: ImageOutcome::Failed {
                step: "decode".into(),
                error: "bad".into(),
            },
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["step"], "decode");
        assert_eq!(json["sequence"], 1);
    }

    #[test]
    fn zero_width_is_rejected_before_scanning() {
        let mut config = BatchConfig::from_settings(&AppSettings::default());
        config.pipeline.output_width = 0;
        config.masks_dir = PathBuf::from("/definitely/not/here");
        let err = BatchRunner::prepare(config).err().expect("invalid width");
        assert!(matches!(
            err,
            SetupError::InvalidWidth {
                name: "output_width"
            }
        ));
    }
}
