// Copyright 2025 Janek Bevendorff
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


//! Fan-out of single-file conversions over a directory of inputs.
//!
//! Every input runs in its own child process, with the child's stderr
//! captured in a per-input log file.

use std::collections::VecDeque;
use std::ffi::OsString;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use parking_lot::Mutex;
use tracing::{info, warn};
use crate::convert::create_dir_all;
use crate::error::{ConvertError, Result};

/// One planned conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub input: PathBuf,
    pub output: PathBuf,
    pub log: PathBuf,
}

#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Maximum number of concurrent conversions.
    pub jobs: usize,
    /// Converter executable, invoked as `<program> convert <in> <out> [extra_args]`.
    pub program: PathBuf,
    /// Arguments appended to every converter invocation.
    pub extra_args: Vec<OsString>,
}

/// Outcome of a batch, in completion order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub succeeded: Vec<PathBuf>,
    pub failed: Vec<PathBuf>,
}

/// Plan a job for every `*.gz` file directly inside `in_dir`.
///
/// `<stem>.gz` is converted to `out_dir/<stem>.warc.gz` and logs to `out_dir/<stem>.log`.
pub fn plan(in_dir: &Path, out_dir: &Path) -> Result<Vec<Job>> {
    let mut inputs = Vec::new();
    for entry in std::fs::read_dir(in_dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "gz") {
            inputs.push(path);
        }
    }
    inputs.sort();

    Ok(inputs
        .into_iter()
        .filter_map(|input| {
            let stem = input.file_stem()?.to_string_lossy().into_owned();
            Some(Job {
                output: out_dir.join(format!("{stem}.warc.gz")),
                log: out_dir.join(format!("{stem}.log")),
                input,
            })
        })
        .collect())
}

/// Convert every input of `in_dir` into `out_dir`, `options.jobs` at a time.
///
/// Failed conversions are reported, not retried; their partial output is kept.
pub fn run(in_dir: &Path, out_dir: &Path, options: &BatchOptions) -> Result<BatchReport> {
    if options.jobs == 0 {
        return Err(ConvertError::Batch("number of processes must be positive".into()));
    }
    let jobs = plan(in_dir, out_dir)?;
    create_dir_all(out_dir)?;
    info!("{} input files, {} processes", jobs.len(), options.jobs);

    let queue = Mutex::new(VecDeque::from(jobs));
    let report = Mutex::new(BatchReport::default());

    thread::scope(|scope| {
        for _ in 0..options.jobs {
            scope.spawn(|| loop {
                let Some(job) = queue.lock().pop_front() else {
                    break;
                };
                let ok = match run_job(&job, options) {
                    Ok(true) => true,
                    Ok(false) => {
                        warn!(log = %job.log.display(), "Conversion of {} failed", job.input.display());
                        false
                    }
                    Err(e) => {
                        warn!("Could not run conversion of {}: {e}", job.input.display());
                        false
                    }
                };
                let mut outcomes = report.lock();
                if ok {
                    outcomes.succeeded.push(job.input);
                } else {
                    outcomes.failed.push(job.input);
                }
            });
        }
    });

    let report = report.into_inner();
    info!("{} conversions succeeded, {} failed", report.succeeded.len(), report.failed.len());
    Ok(report)
}

fn run_job(job: &Job, options: &BatchOptions) -> std::io::Result<bool> {
    let log = File::create(&job.log)?;
    let mut command = Command::new(&options.program);
    command
        .arg("convert")
        .arg(&job.input)
        .arg(&job.output)
        .args(&options.extra_args)
        .stderr(Stdio::from(log));
    info!("{command:?} 2>{}", job.log.display());
    Ok(command.status()?.success())
}
