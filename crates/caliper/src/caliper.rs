//! Main Caliper struct and public API.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::anomaly::{AnomalyConfig, AnomalyDetector, AnomalyFinding};
use crate::error::{CaliperError, Result};
use crate::inference::{InferenceConfig, SchemaInferencer};
use crate::input::{Dataset, Parser, ParserConfig, SourceMetadata};
use crate::profile::{ColumnProfile, ColumnProfiler, ProfileConfig};
use crate::quality::{ColumnQualityScore, QualityScorer, ScoringConfig, UniqueHints};
use crate::report::{Report, ReportAssembler};
use crate::rules::{QualityRules, RuleEvaluator, ValidityResult};
use crate::schema::ColumnSchema;

/// Configuration for a Caliper analysis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub parser: ParserConfig,
    pub inference: InferenceConfig,
    pub profile: ProfileConfig,
    pub scoring: ScoringConfig,
    pub anomaly: AnomalyConfig,
    /// Columns expected to hold unique values.
    pub unique_columns: Vec<String>,
}

impl AnalysisConfig {
    /// Parse a (possibly partial) JSON configuration and validate it.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| CaliperError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        let fraction = self.inference.min_match_fraction;
        if !(fraction > 0.0 && fraction <= 1.0) {
            return Err(CaliperError::Config(format!(
                "inference.min_match_fraction must be in (0, 1], got {fraction}"
            )));
        }
        if self.inference.sample_size == 0 {
            return Err(CaliperError::Config(
                "inference.sample_size must be at least 1".to_string(),
            ));
        }
        if self.profile.shard_rows == 0 {
            return Err(CaliperError::Config(
                "profile.shard_rows must be at least 1".to_string(),
            ));
        }

        let weights = [
            self.scoring.completeness_weight,
            self.scoring.validity_weight,
            self.scoring.uniqueness_weight,
        ];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(CaliperError::Config(format!(
                "scoring weights must be non-negative, got {weights:?}"
            )));
        }
        if weights.iter().all(|w| *w == 0.0) {
            return Err(CaliperError::Config(
                "at least one scoring weight must be positive".to_string(),
            ));
        }

        self.anomaly.validate()
    }
}

/// Source of the report timestamp.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Result of analyzing a data file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Metadata about the source file.
    pub source: SourceMetadata,
    pub report: Report,
}

/// The main Caliper analysis engine.
pub struct Caliper {
    parser: Parser,
    inferencer: SchemaInferencer,
    profiler: ColumnProfiler,
    evaluator: RuleEvaluator,
    scorer: QualityScorer,
    detector: AnomalyDetector,
    assembler: ReportAssembler,
    hints: UniqueHints,
    baseline: Option<Vec<ColumnProfile>>,
    clock: Arc<dyn Clock>,
}

impl Caliper {
    /// Create a Caliper instance with default configuration.
    pub fn new() -> Self {
        Self::with_config(AnalysisConfig::default())
    }

    /// Create a Caliper instance with custom configuration.
    pub fn with_config(config: AnalysisConfig) -> Self {
        Self {
            parser: Parser::with_config(config.parser),
            inferencer: SchemaInferencer::with_config(config.inference),
            profiler: ColumnProfiler::with_config(config.profile),
            evaluator: RuleEvaluator::new(),
            scorer: QualityScorer::with_config(config.scoring),
            detector: AnomalyDetector::with_config(&config.anomaly),
            assembler: ReportAssembler::new(),
            hints: config.unique_columns.into_iter().collect(),
            baseline: None,
            clock: Arc::new(SystemClock),
        }
    }

    /// Mark a column as expected to be unique.
    pub fn with_unique(mut self, column: impl Into<String>) -> Self {
        self.hints.insert(column);
        self
    }

    /// Compare against profiles from a prior run (enables cardinality shift).
    pub fn with_baseline(mut self, profiles: Vec<ColumnProfile>) -> Self {
        self.baseline = Some(profiles);
        self
    }

    /// Inject the source of report timestamps.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Parse a delimited file.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<(Dataset, SourceMetadata)> {
        self.parser.parse_file(path)
    }

    /// Run the full pipeline over an in-memory dataset.
    pub fn analyze(
        &self,
        dataset_name: impl Into<String>,
        dataset: &Dataset,
        rules: &QualityRules,
    ) -> Result<Report> {
        let dataset_name = dataset_name.into();
        for column in self.hints.iter() {
            if dataset.column_index(column).is_none() {
                warn!(column, "unique hint names a column that is not in the dataset");
            }
        }

        let schemas = self.inferencer.infer(dataset);
        debug!(columns = schemas.len(), "schema inferred");

        let profiles = self.profiler.profile(dataset, &schemas);
        debug!(rows = dataset.row_count(), "columns profiled");

        let validity = self.evaluator.evaluate(dataset, &profiles, rules);
        let scores = self.scorer.score(&profiles, &validity, &self.hints);

        let anomalies = self
            .detector
            .detect(dataset, &profiles, &scores, self.baseline.as_deref());
        debug!(anomalies = anomalies.len(), "anomaly detection complete");

        self.assembler.assemble(
            dataset_name,
            &schemas,
            &profiles,
            &scores,
            anomalies,
            self.clock.now(),
        )
    }

    /// Parse a file and analyze it, naming the report after the file stem.
    pub fn analyze_file(
        &self,
        path: impl AsRef<Path>,
        rules: &QualityRules,
    ) -> Result<AnalysisResult> {
        let (dataset, source) = self.load(path)?;
        info!(
            file = %source.file,
            rows = source.row_count,
            columns = source.column_count,
            "analyzing"
        );
        let report = self.analyze(source.dataset_name(), &dataset, rules)?;
        Ok(AnalysisResult { source, report })
    }
}

impl Default for Caliper {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// STAGE FUNCTIONS
// =============================================================================
// Each stage of the pipeline as a standalone pure function, for callers that
// need intermediate results.

pub fn infer_schema(sample: &Dataset, config: &InferenceConfig) -> Vec<ColumnSchema> {
    SchemaInferencer::with_config(config.clone()).infer(sample)
}

pub fn profile(
    dataset: &Dataset,
    schemas: &[ColumnSchema],
    config: &ProfileConfig,
) -> Vec<ColumnProfile> {
    ColumnProfiler::with_config(config.clone()).profile(dataset, schemas)
}

pub fn evaluate_rules(
    dataset: &Dataset,
    profiles: &[ColumnProfile],
    rules: &QualityRules,
) -> Vec<ValidityResult> {
    RuleEvaluator::new().evaluate(dataset, profiles, rules)
}

pub fn score_quality(
    profiles: &[ColumnProfile],
    validity: &[ValidityResult],
    hints: &UniqueHints,
    config: &ScoringConfig,
) -> Vec<ColumnQualityScore> {
    QualityScorer::with_config(config.clone()).score(profiles, validity, hints)
}

pub fn detect_anomalies(
    dataset: &Dataset,
    profiles: &[ColumnProfile],
    scores: &[ColumnQualityScore],
    config: &AnomalyConfig,
    baseline: Option<&[ColumnProfile]>,
) -> Vec<AnomalyFinding> {
    AnomalyDetector::with_config(config).detect(dataset, profiles, scores, baseline)
}

pub fn assemble_report(
    dataset_name: impl Into<String>,
    schemas: &[ColumnSchema],
    profiles: &[ColumnProfile],
    scores: &[ColumnQualityScore],
    anomalies: Vec<AnomalyFinding>,
    timestamp: DateTime<Utc>,
) -> Result<Report> {
    ReportAssembler::new().assemble(dataset_name, schemas, profiles, scores, anomalies, timestamp)
}
