//! Many hands at once, one per line.
//!
//! ```text
//! # comment
//! 123m 456p 789s 111z 22z 55z
//! 123m 456p 789s 111z 22z 55z 7z | 2z 9s
//! ```
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use anyhow::{Context, Result, ensure};
use flate2::read::GzDecoder;
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;
use taipai::Decision;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    /// `file:line`
    pub source: String,
    pub hand: String,
    pub visible: String,
}

#[derive(Debug, Serialize)]
pub struct Record<'a> {
    pub source: &'a str,
    #[serde(flatten)]
    pub outcome: Outcome,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Decision(Decision),
    Error(String),
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Summary {
    pub files: usize,
    pub hands: usize,
    pub errors: usize,
}

/// Hand and visible tiles of a line, `None` for blank and comment lines.
pub fn parse_line(line: &str) -> Option<(&str, &str)> {
    let line = line.split_once('#').map_or(line, |(body, _)| body).trim();
    if line.is_empty() {
        return None;
    }
    let (hand, visible) = line.split_once('|').unwrap_or((line, ""));
    Some((hand.trim(), visible.trim()))
}

impl Job {
    pub fn evaluate(&self) -> Record<'_> {
        let outcome = match Decision::parse(&self.hand, &self.visible) {
            Ok(decision) => Outcome::Decision(decision),
            Err(err) => {
                log::warn!("{}: {err}", self.source);
                Outcome::Error(err.to_string())
            }
        };
        Record {
            source: &self.source,
            outcome,
        }
    }
}

pub fn expand_patterns(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = vec![];
    for pattern in patterns {
        let before = paths.len();
        for entry in glob::glob(pattern).with_context(|| format!("invalid pattern {pattern:?}"))? {
            paths.push(entry?);
        }
        if paths.len() == before {
            log::warn!("{pattern:?} matched nothing");
        }
    }
    paths.sort_unstable();
    paths.dedup();
    ensure!(!paths.is_empty(), "no input files");
    Ok(paths)
}

/// Whole file as text, gunzipped when the name ends in `.gz`.
pub fn read_file(path: &Path) -> Result<String> {
    let inner = || -> Result<String> {
        let file = File::open(path)?;
        let raw = if path.extension().is_some_and(|ext| ext == "gz") {
            io::read_to_string(GzDecoder::new(file))?
        } else {
            io::read_to_string(file)?
        };
        Ok(raw)
    };
    inner().with_context(|| format!("error when reading {}", path.display()))
}

pub fn load_jobs(paths: &[PathBuf]) -> Result<Vec<Job>> {
    let mut jobs = vec![];
    for path in paths {
        let raw = read_file(path)?;
        jobs.extend(raw.lines().enumerate().filter_map(|(i, line)| {
            let (hand, visible) = parse_line(line)?;
            Some(Job {
                source: format!("{}:{}", path.display(), i + 1),
                hand: hand.to_owned(),
                visible: visible.to_owned(),
            })
        }));
    }
    Ok(jobs)
}

pub fn run(patterns: &[String], output: Option<&Path>) -> Result<Summary> {
    let paths = expand_patterns(patterns)?;
    let jobs = load_jobs(&paths)?;
    log::info!("{} hands from {} files", jobs.len(), paths.len());

    let pb = ProgressBar::new(jobs.len() as u64);
    pb.set_style(ProgressStyle::with_template("{elapsed_precise} [{bar:40}] {pos}/{len} eta {eta}")?.progress_chars("=> "));
    let lines = jobs
        .par_iter()
        .progress_with(pb.clone())
        .map(|job| {
            let record = job.evaluate();
            let failed = matches!(record.outcome, Outcome::Error(_));
            serde_json::to_string(&record).map(|line| (line, failed))
        })
        .collect::<Result<Vec<_>, _>>()?;
    pb.finish_and_clear();

    let mut out: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("error when creating {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    let mut summary = Summary {
        files: paths.len(),
        ..Default::default()
    };
    for (line, failed) in lines {
        writeln!(out, "{line}")?;
        summary.hands += 1;
        summary.errors += failed as usize;
    }
    out.flush()?;
    Ok(summary)
}
