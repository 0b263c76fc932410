//! End-to-end matching runs.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{Level, debug, info};

use crate::config::{
    CandidateConfig, ConfigError, InputFormat, OutputFormat, OverlapConfig, RegionsConfig,
    RunConfig,
};
use crate::domain::Capabilities;
use crate::matcher::{CandidateSet, MatchSet, Proximity, match_all, rank};
use crate::regions::{
    RegionError, RegionMapping, RegionResolver, RegionTaxonomy, TaxonomyOverlap,
};
use crate::sink::{FlatSet, JsonReport, SinkError, write_flat_csv_file, write_json_file};
use crate::sources::{
    ColumnMap, CsvSource, LoadReport, MARINE_REGION_FIELD, PointSource, SourceError,
    SourceRecord, XmlSource, candidates_from,
};

/// Any error that stops a run.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Region(#[from] RegionError),

    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// What a run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Source points matched.
    pub sources: usize,
    /// Distinct candidates across all candidate files.
    pub candidates: usize,
    /// Records dropped from all inputs.
    pub skipped: usize,
    /// Source points with a resolved region.
    pub regions_resolved: usize,
    pub output: PathBuf,
    /// Region code overlap report, when one was configured.
    pub overlap: Option<PathBuf>,
}

/// Build the loader for one input file.
pub fn open_source(
    path: &Path,
    format: InputFormat,
    columns: ColumnMap,
    provides: Capabilities,
) -> Box<dyn PointSource> {
    match format {
        InputFormat::Csv => Box::new(CsvSource::new(path, columns).with_provides(provides)),
        InputFormat::Xml => Box::new(XmlSource::new(path).with_provides(provides)),
    }
}

struct LoadedCandidates<'c> {
    config: &'c CandidateConfig,
    report: LoadReport,
}

/// Execute a run: load, match, resolve regions, write.
pub fn run(config: &RunConfig) -> Result<RunSummary, RunError> {
    let source_config = &config.source;
    let source = open_source(
        &source_config.path,
        source_config.format,
        source_config.columns.resolve(source_config.prefix.as_deref()),
        Capabilities::new(),
    );
    info!(source = %source.describe(), "loading source points");
    let mut source_report = source.load()?;

    let mut loaded = Vec::with_capacity(config.candidates.len());
    for candidate in &config.candidates {
        let loader = open_source(
            &candidate.path,
            candidate.format,
            candidate.columns.resolve(candidate.prefix.as_deref()),
            candidate.capabilities(),
        );
        info!(label = %candidate.label, source = %loader.describe(), "loading candidates");
        loaded.push(LoadedCandidates {
            config: candidate,
            report: loader.load()?,
        });
    }

    let resolver = config.regions.as_ref().map(build_resolver).transpose()?;

    let skipped = source_report.skipped + loaded.iter().map(|l| l.report.skipped).sum::<usize>();
    let reports: Vec<LoadReport> = loaded.iter().map(|l| l.report.clone()).collect();
    let merged = candidates_from(&reports);
    let output = &config.output;
    let mut regions_resolved = 0;

    match output.format {
        OutputFormat::Json => {
            let matches = match_all(source_report.points(), &merged, config.top_n());
            log_proximity(&matches);
            log_spread(&source_report, &merged);

            let mut report = JsonReport::from_matches(&matches);
            let marine = field_values(&source_report, MARINE_REGION_FIELD);
            if !marine.is_empty() {
                report.attach_marine_regions(|id| marine.get(id).map(|v| v.to_string()));
            }
            if let (Some(resolver), Some(regions)) = (&resolver, &config.regions) {
                let names = region_names(&source_report, regions.name_field.as_deref());
                report.resolve_regions(|id, entry| {
                    let name = names.get(id).copied().unwrap_or(entry.name.as_str());
                    let m = resolver.resolve(name);
                    if m.is_resolved() {
                        regions_resolved += 1;
                    }
                    Some(m)
                });
            }
            report.write_file(&output.path)?;
        }
        OutputFormat::Csv => {
            // region columns go after the source columns, before the candidates
            if let (Some(resolver), Some(regions)) = (&resolver, &config.regions) {
                regions_resolved = append_region_columns(&mut source_report, resolver, regions);
            }

            let sets: Vec<CandidateSet> = loaded.iter().map(|l| l.report.to_candidates()).collect();
            let matches: Vec<MatchSet<'_>> = sets
                .iter()
                .map(|set| match_all(source_report.points(), set, 1))
                .collect();
            for m in &matches {
                log_proximity(m);
            }

            let naming: Vec<ColumnMap> = loaded
                .iter()
                .map(|l| l.config.columns.resolve(None))
                .collect();
            let flat: Vec<FlatSet<'_, '_>> = loaded
                .iter()
                .zip(&naming)
                .zip(&matches)
                .map(|((l, columns), matches)| FlatSet {
                    label: &l.config.label,
                    columns,
                    matches,
                })
                .collect();
            write_flat_csv_file(&output.path, &source_report, &flat)?;
        }
    }

    let overlap = config.overlap.as_ref().map(write_overlap).transpose()?;

    let summary = RunSummary {
        sources: source_report.records.len(),
        candidates: merged.len(),
        skipped,
        regions_resolved,
        output: output.path.clone(),
        overlap,
    };

    info!(
        sources = summary.sources,
        candidates = summary.candidates,
        skipped = summary.skipped,
        regions_resolved = summary.regions_resolved,
        output = %summary.output.display(),
        "run complete"
    );

    Ok(summary)
}

/// Compare the configured forecast products' region codes and write the report.
fn write_overlap(config: &OverlapConfig) -> Result<PathBuf, RunError> {
    let mut overlap = TaxonomyOverlap::new();
    for set in &config.sets {
        overlap = overlap.load_set(&set.name, &set.path)?;
    }

    let report = overlap.report();
    for pair in &report.pairwise {
        info!(
            left = %pair.left,
            right = %pair.right,
            shared = pair.shared.len(),
            "region code overlap"
        );
    }
    info!(common = report.common.len(), "region codes common to all sets");

    write_json_file(&config.output, &report)?;
    Ok(config.output.clone())
}

fn build_resolver(config: &RegionsConfig) -> Result<RegionResolver, RegionError> {
    let taxonomy = RegionTaxonomy::load(&config.taxonomy)?;
    let mapping = match &config.mapping {
        Some(path) => RegionMapping::load(path)?,
        None => RegionMapping::new(),
    };

    let mut resolver = RegionResolver::new(taxonomy)
        .with_mapping(mapping)
        .with_threshold(config.threshold);
    if let Some(default) = &config.default {
        resolver = resolver.with_default(default);
    }
    Ok(resolver)
}

/// Non-empty values of one source column by source id (first record wins).
fn field_values<'r>(report: &'r LoadReport, field: &str) -> HashMap<&'r str, &'r str> {
    let Some(index) = report.headers.iter().position(|h| h == field) else {
        return HashMap::new();
    };
    let mut values = HashMap::new();
    for record in &report.records {
        let id = record.point.id().as_str();
        if values.contains_key(id) {
            continue;
        }
        if let Some(value) = record.fields.get(index).map(|v| v.trim()) {
            values.insert(id, value);
        }
    }
    values
}

/// The name to resolve for each source id (first record wins).
fn region_names<'r>(report: &'r LoadReport, field: Option<&str>) -> HashMap<&'r str, &'r str> {
    let index = field.and_then(|f| report.headers.iter().position(|h| h == f));
    let mut names = HashMap::new();
    for record in &report.records {
        names
            .entry(record.point.id().as_str())
            .or_insert_with(|| region_name(record, index));
    }
    names
}

fn region_name(record: &SourceRecord, field: Option<usize>) -> &str {
    field
        .and_then(|i| record.fields.get(i))
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| record.point.name())
}

/// Append `REG_ID`, `REG_NAME` and `MATCH_CRITERIA` to every source row.
///
/// Returns the number of rows whose name resolved to a region.
fn append_region_columns(
    report: &mut LoadReport,
    resolver: &RegionResolver,
    config: &RegionsConfig,
) -> usize {
    let index = config
        .name_field
        .as_deref()
        .and_then(|f| report.headers.iter().position(|h| h == f));
    let width = report.headers.len();
    let mut resolved = 0;

    for record in &mut report.records {
        let m = resolver.resolve(region_name(record, index));
        let (code, name) = match &m.region {
            Some(region) => {
                resolved += 1;
                (region.code.clone(), region.name.clone())
            }
            None => (String::new(), String::new()),
        };
        record.fields.resize(width, String::new());
        record.fields.extend([code, name, m.criterion.to_string()]);
    }

    report
        .headers
        .extend(["REG_ID", "REG_NAME", "MATCH_CRITERIA"].map(String::from));
    resolved
}

/// Summarise how close the nearest matches are.
fn log_proximity(matches: &MatchSet<'_>) {
    let mut bands: HashMap<Proximity, usize> = HashMap::new();
    let mut unmatched = 0;
    for result in matches {
        match result.nearest() {
            Some(nearest) => *bands.entry(Proximity::classify(nearest.distance_km)).or_default() += 1,
            None => unmatched += 1,
        }
    }

    let count = |p: Proximity| bands.get(&p).copied().unwrap_or(0);
    info!(
        same_site = count(Proximity::SameSite),
        adjacent = count(Proximity::Adjacent),
        moderate = count(Proximity::Moderate),
        far = count(Proximity::Far),
        unmatched,
        "nearest match distances"
    );
}

/// Per-source nearest and farthest candidate, at debug level only.
fn log_spread(report: &LoadReport, candidates: &CandidateSet) {
    if !tracing::enabled!(Level::DEBUG) {
        return;
    }
    for point in report.points() {
        let ranking = rank(point, candidates);
        if let (Some(near), Some(far)) = (ranking.nearest(), ranking.farthest()) {
            debug!(
                source = %point.id(),
                nearest = %near.candidate.id(),
                nearest_km = near.distance_km,
                proximity = %Proximity::classify(near.distance_km),
                farthest = %far.candidate.id(),
                farthest_km = far.distance_km,
                "candidate spread"
            );
        }
    }
}
