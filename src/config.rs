//! Run configuration for the `midiline` binary

use anyhow::{bail, Context, Result};
use std::io::Read;
use std::path::PathBuf;

pub const USAGE: &str = "\
Usage: midiline [OPTIONS] [FILE]

Reads a JSON document { \"header\": { \"ppq\", \"tempos\" }, \"pitchbends\": [...] }
from FILE (or stdin when FILE is missing or '-') and prints the timed
pitch-bend records as JSON.

Options:
  --skip-malformed   Skip malformed events instead of failing
  --fail-malformed   Fail on the first malformed event (default)
  --pretty           Pretty-print the output
  -h, --help         Show this help

Environment:
  MIDILINE_ON_MALFORMED=skip|fail   Default for the malformed event policy
  RUST_LOG                          Log filter (e.g. debug)";

/// What to do with an event that fails validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedPolicy {
    /// Abort the whole conversion (default)
    #[default]
    Fail,
    /// Drop the event and keep going
    Skip,
}

impl MalformedPolicy {
    /// Parse policy from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<MalformedPolicy> {
        match s.trim().to_lowercase().as_str() {
            "fail" | "error" => Some(MalformedPolicy::Fail),
            "skip" | "ignore" => Some(MalformedPolicy::Skip),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MalformedPolicy::Fail => "fail",
            MalformedPolicy::Skip => "skip",
        }
    }
}

/// Where the input document comes from
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Input {
    #[default]
    Stdin,
    File(PathBuf),
}

impl Input {
    pub fn read_to_string(&self) -> Result<String> {
        match self {
            Input::Stdin => {
                let mut text = String::new();
                std::io::stdin()
                    .read_to_string(&mut text)
                    .context("Failed to read document from stdin")?;
                Ok(text)
            }
            Input::File(path) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read document from {}", path.display())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunConfig {
    pub input: Input,
    pub policy: MalformedPolicy,
    pub pretty: bool,
}

impl RunConfig {
    /// Environment variable holding the default malformed event policy
    pub const POLICY_ENV: &'static str = "MIDILINE_ON_MALFORMED";

    /// Build the configuration from command line arguments (without the
    /// program name) and the value of [`RunConfig::POLICY_ENV`], if set.
    ///
    /// Returns `Ok(None)` when help was requested.
    pub fn from_args<I>(args: I, env_policy: Option<&str>) -> Result<Option<Self>>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = RunConfig::default();

        if let Some(value) = env_policy {
            config.policy = MalformedPolicy::from_str(value).with_context(|| {
                format!("Invalid {} value '{}'", Self::POLICY_ENV, value)
            })?;
        }

        let mut input = None;
        for arg in args {
            match arg.as_str() {
                "-h" | "--help" => return Ok(None),
                "--skip-malformed" => config.policy = MalformedPolicy::Skip,
                "--fail-malformed" => config.policy = MalformedPolicy::Fail,
                "--pretty" => config.pretty = true,
                "-" => input = Some(Input::Stdin),
                flag if flag.starts_with('-') => bail!("Unknown option '{}'", flag),
                path => {
                    if input.is_some() {
                        bail!("Only one input file is supported");
                    }
                    input = Some(Input::File(PathBuf::from(path)));
                }
            }
        }

        config.input = input.unwrap_or_default();
        Ok(Some(config))
    }
}
