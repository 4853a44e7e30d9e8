//! Raw probe layer.
//!
//! Every hardware query goes through [`Probe`], which hands back the raw text
//! of a system tool or file. Parsing lives in the collectors so tests can
//! replace the whole layer with canned output.

#[cfg(test)]
use std::collections::HashMap;
use std::fs;
use std::io::{self, Read};
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::{ConfGenError, Result};

const MEMINFO_PATH: &str = "/proc/meminfo";
const CPUINFO_PATH: &str = "/proc/cpuinfo";
const POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProbeSource {
    Topology,
    Memory,
    Hostname,
    IpAddress(String),
    Accelerators,
    CpuModel,
}

enum Invocation {
    Command(&'static str, Vec<String>),
    File(&'static str),
}

impl ProbeSource {
    fn invocation(&self) -> Invocation {
        match self {
            ProbeSource::Topology => Invocation::Command("lscpu", vec!["--parse=cpu,core,socket".to_string()]),
            ProbeSource::Memory => Invocation::File(MEMINFO_PATH),
            ProbeSource::Hostname => Invocation::Command("hostname", Vec::new()),
            ProbeSource::IpAddress(interface) => Invocation::Command(
                "ip",
                ["-o", "-4", "addr", "show", "dev", interface.as_str()]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            ),
            ProbeSource::Accelerators => Invocation::Command(
                "nvidia-smi",
                vec!["--query-gpu=name".to_string(), "--format=csv,noheader".to_string()],
            ),
            ProbeSource::CpuModel => Invocation::File(CPUINFO_PATH),
        }
    }
}

pub trait Probe {
    fn read(&self, source: &ProbeSource) -> Result<String>;
}

/// Reads the live system: files directly, commands with a bounded runtime.
pub struct SystemProbe {
    timeout: Duration,
}

impl SystemProbe {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Probe for SystemProbe {
    fn read(&self, source: &ProbeSource) -> Result<String> {
        match source.invocation() {
            Invocation::File(path) => {
                debug!(path, "reading probe file");
                fs::read_to_string(path).map_err(|e| ConfGenError::io(path, e))
            }
            Invocation::Command(program, args) => {
                debug!(program, ?args, "running probe command");
                run_with_timeout(program, &args, self.timeout)
            }
        }
    }
}

/// Run `program` and return its stdout, killing it once `timeout` elapses.
pub fn run_with_timeout(program: &str, args: &[String], timeout: Duration) -> Result<String> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|source| ConfGenError::Spawn {
            program: program.to_string(),
            source,
        })?;

    // Drain stdout on a separate thread so a chatty child cannot block on a full pipe.
    let stdout = child.stdout.take();
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        let result = match stdout {
            Some(mut out) => out.read_to_end(&mut buf).map(|_| buf),
            None => Ok(buf),
        };
        let _ = tx.send(result);
    });

    let deadline = Instant::now() + timeout;
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) if Instant::now() >= deadline => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(ConfGenError::Timeout {
                    program: program.to_string(),
                    after: timeout,
                });
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(source) => {
                let _ = child.kill();
                return Err(ConfGenError::Spawn {
                    program: program.to_string(),
                    source,
                });
            }
        }
    };

    // A forked grandchild can keep stdout open after the tool itself exits.
    let remaining = deadline.saturating_duration_since(Instant::now());
    let output = receive_output(&rx, program, remaining, timeout)?;
    if !status.success() {
        return Err(ConfGenError::CommandFailed {
            program: program.to_string(),
            status: status.to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output).into_owned())
}

fn receive_output(
    rx: &Receiver<io::Result<Vec<u8>>>,
    program: &str,
    remaining: Duration,
    timeout: Duration,
) -> Result<Vec<u8>> {
    match rx.recv_timeout(remaining) {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(source)) => Err(ConfGenError::io(program, source)),
        Err(RecvTimeoutError::Timeout) => Err(ConfGenError::Timeout {
            program: program.to_string(),
            after: timeout,
        }),
        Err(RecvTimeoutError::Disconnected) => Err(ConfGenError::io(
            program,
            io::Error::new(io::ErrorKind::BrokenPipe, "stdout reader stopped without a result"),
        )),
    }
}

/// Canned probe answers. Sources without an entry fail as if the tool were missing.
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct FixedProbe {
    responses: HashMap<ProbeSource, String>,
}

#[cfg(test)]
impl FixedProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, source: ProbeSource, output: impl Into<String>) -> Self {
        self.responses.insert(source, output.into());
        self
    }
}

#[cfg(test)]
impl Probe for FixedProbe {
    fn read(&self, source: &ProbeSource) -> Result<String> {
        self.responses
            .get(source)
            .cloned()
            .ok_or_else(|| ConfGenError::Spawn {
                program: format!("{:?}", source),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no canned output"),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_probe_answers_and_fails() {
        let probe = FixedProbe::new().with(ProbeSource::Hostname, "node01\n");
        assert_eq!(probe.read(&ProbeSource::Hostname).unwrap(), "node01\n");
        assert!(probe.read(&ProbeSource::Memory).is_err());
    }

    #[test]
    fn test_ip_invocation_includes_interface() {
        match ProbeSource::IpAddress("eno2".to_string()).invocation() {
            Invocation::Command(program, args) => {
                assert_eq!(program, "ip");
                assert_eq!(args.last().map(String::as_str), Some("eno2"));
            }
            Invocation::File(_) => panic!("expected a command"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_run_with_timeout_captures_stdout() {
        let out = run_with_timeout("echo", &["hello".to_string()], Duration::from_secs(5)).unwrap();
        assert_eq!(out.trim(), "hello");
    }

    #[cfg(unix)]
    #[test]
    fn test_run_with_timeout_nonzero_exit() {
        let err = run_with_timeout("false", &[], Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, ConfGenError::CommandFailed { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_with_timeout_kills_hung_command() {
        let started = Instant::now();
        let err = run_with_timeout("sleep", &["5".to_string()], Duration::from_millis(100)).unwrap_err();
        assert!(matches!(err, ConfGenError::Timeout { .. }));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_with_timeout_bounds_inherited_stdout() {
        let started = Instant::now();
        let args = vec!["-c".to_string(), "sleep 5 & echo started".to_string()];
        let err = run_with_timeout("sh", &args, Duration::from_millis(300)).unwrap_err();
        assert!(matches!(err, ConfGenError::Timeout { .. }));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn test_read_error_surfaces_as_io() {
        let (tx, rx) = mpsc::channel();
        tx.send(Err(io::Error::new(io::ErrorKind::Other, "pipe broke"))).unwrap();
        let err = receive_output(&rx, "lscpu", Duration::from_secs(1), Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, ConfGenError::Io { .. }));
    }

    #[test]
    fn test_reader_gone_without_result_is_error() {
        let (tx, rx) = mpsc::channel::<io::Result<Vec<u8>>>();
        drop(tx);
        let err = receive_output(&rx, "lscpu", Duration::from_secs(1), Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, ConfGenError::Io { .. }));
    }

    #[test]
    fn test_missing_program() {
        let err = run_with_timeout("definitely-not-a-real-tool-xyz", &[], Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, ConfGenError::Spawn { .. }));
    }
}
