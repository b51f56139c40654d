//! Harvest engine backed by the `theHarvester` command-line tool.
//!
//! Each harvest spawns one child process. The harvester writes its findings
//! to `<stem>.json`, which is read back and returned as the result. Runs
//! without a caller-supplied filename use a scratch stem in the work
//! directory that is deleted afterwards; named runs land in the report
//! directory so they can be served as static files.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use dashmap::DashSet;
use futures_util::future::BoxFuture;
use tokio::process::Command;
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::engine::sources::ALL_SOURCES;
use crate::engine::types::{EngineError, HarvestResult, QueryConfig};
use crate::engine::HarvestEngine;

/// Bytes of stderr kept when the harvester fails.
const STDERR_TAIL: usize = 512;

/// Report formats the harvester writes next to the JSON file.
const REPORT_EXTENSIONS: &[&str] = &["json", "xml"];

pub struct CommandEngine {
    binary: PathBuf,
    work_dir: PathBuf,
    report_dir: PathBuf,
    sources: Vec<String>,
    scratch: DashSet<PathBuf>,
}

impl CommandEngine {
    pub fn new(
        binary: impl Into<PathBuf>,
        work_dir: impl Into<PathBuf>,
        report_dir: impl Into<PathBuf>,
        sources: Vec<String>,
    ) -> Self {
        Self {
            binary: binary.into(),
            work_dir: work_dir.into(),
            report_dir: report_dir.into(),
            sources,
            scratch: DashSet::new(),
        }
    }

    /// Build from configuration. Named reports are written to `report_dir`.
    pub fn from_config(config: &EngineConfig, report_dir: impl Into<PathBuf>) -> Self {
        let work_dir = if config.work_dir.is_empty() {
            std::env::temp_dir()
        } else {
            PathBuf::from(&config.work_dir)
        };
        Self::new(&config.binary, work_dir, report_dir, config.sources.clone())
    }

    /// Check requested sources against the supported list.
    fn resolve_sources(&self, requested: &[String]) -> Result<Vec<String>, EngineError> {
        if requested.iter().any(|s| s == ALL_SOURCES) {
            return Ok(vec![ALL_SOURCES.to_string()]);
        }
        for source in requested {
            if !self.sources.contains(source) {
                return Err(EngineError::UnsupportedSource(source.clone()));
            }
        }
        Ok(requested.to_vec())
    }

    async fn run(&self, config: QueryConfig) -> Result<HarvestResult, EngineError> {
        config.validate()?;
        let sources = self.resolve_sources(&config.sources)?;

        let stem = match &config.filename {
            Some(name) => self.report_dir.join(strip_extension(name)),
            None => self.work_dir.join(format!("harvest-{}", Uuid::new_v4())),
        };
        let args = command_args(&config, &sources, &stem);

        tracing::debug!(
            binary = %self.binary.display(),
            domain = %config.domain,
            args = ?args,
            "Starting harvester"
        );

        // A report left behind by an earlier run under the same name must
        // never be read back as this run's result.
        remove_reports(&stem);
        let _scratch = config
            .filename
            .is_none()
            .then(|| ScratchReport::track(&self.scratch, stem.clone()));

        self.execute(&args, &stem).await
    }

    async fn execute(&self, args: &[OsString], stem: &Path) -> Result<HarvestResult, EngineError> {
        let output = Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(EngineError::Spawn)?;

        if !output.status.success() {
            return Err(EngineError::Exited {
                code: output.status.code(),
                stderr: tail(&output.stderr, STDERR_TAIL),
            });
        }

        let bytes = tokio::fs::read(report_path(stem, "json")).await?;
        match serde_json::from_slice(&bytes) {
            Ok(serde_json::Value::Object(map)) => Ok(map),
            Ok(_) => Err(EngineError::MalformedOutput(
                "expected a JSON object".to_string(),
            )),
            Err(e) => Err(EngineError::MalformedOutput(e.to_string())),
        }
    }
}

impl HarvestEngine for CommandEngine {
    fn supported_sources(&self) -> Result<Vec<String>, EngineError> {
        Ok(self.sources.clone())
    }

    fn harvest(&self, config: QueryConfig) -> BoxFuture<'_, Result<HarvestResult, EngineError>> {
        Box::pin(self.run(config))
    }

    fn shutdown(&self) {
        for stem in self.scratch.iter() {
            remove_reports(&stem);
        }
        self.scratch.clear();
    }
}

/// Scratch report owned by one harvest. Dropping it deletes the files,
/// which also covers a harvest future cancelled by a timeout.
struct ScratchReport<'a> {
    scratch: &'a DashSet<PathBuf>,
    stem: PathBuf,
}

impl<'a> ScratchReport<'a> {
    fn track(scratch: &'a DashSet<PathBuf>, stem: PathBuf) -> Self {
        scratch.insert(stem.clone());
        Self { scratch, stem }
    }
}

impl Drop for ScratchReport<'_> {
    fn drop(&mut self) {
        remove_reports(&self.stem);
        self.scratch.remove(&self.stem);
    }
}

/// Translate a query into harvester command-line arguments.
pub fn command_args(config: &QueryConfig, sources: &[String], output_stem: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "-d".into(),
        config.domain.clone().into(),
        "-l".into(),
        config.limit.to_string().into(),
        "-S".into(),
        config.start.to_string().into(),
    ];

    if !sources.is_empty() {
        args.push("-b".into());
        args.push(sources.join(",").into());
    }

    let flags = [
        (config.dns_brute, "-c"),
        (config.dns_lookup, "-n"),
        (config.dns_tld, "-t"),
        (config.google_dork, "-g"),
        (config.proxies, "-p"),
        (config.shodan, "-s"),
        (config.take_over, "-r"),
        (config.virtual_host, "-v"),
    ];
    for (enabled, flag) in flags {
        if enabled {
            args.push(flag.into());
        }
    }

    if let Some(server) = &config.dns_server {
        args.push("-e".into());
        args.push(server.clone().into());
    }

    // The harvester cuts everything after the last '.' of `-f` to build its
    // report names, so an explicit suffix keeps dotted directories intact.
    args.push("-f".into());
    args.push(report_path(output_stem, "xml").into_os_string());
    args
}

fn strip_extension(name: &str) -> &str {
    name.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(name)
}

fn report_path(stem: &Path, ext: &str) -> PathBuf {
    let mut path = stem.as_os_str().to_owned();
    path.push(".");
    path.push(ext);
    PathBuf::from(path)
}

fn remove_reports(stem: &Path) {
    for ext in REPORT_EXTENSIONS {
        let _ = std::fs::remove_file(report_path(stem, ext));
    }
}

fn tail(bytes: &[u8], max: usize) -> String {
    let start = bytes.len().saturating_sub(max);
    String::from_utf8_lossy(&bytes[start..]).trim().to_string()
}
