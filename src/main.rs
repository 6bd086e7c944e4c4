use anyhow::Result;
use colored::*;
use midiline::config::{RunConfig, USAGE};
use midiline::document::{convert, Document};

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let env_policy = std::env::var(RunConfig::POLICY_ENV).ok();
    let Some(config) = RunConfig::from_args(std::env::args().skip(1), env_policy.as_deref())? else {
        println!("{}", USAGE);
        return Ok(());
    };
    log::debug!(
        "Running with {:?}, malformed events: {}",
        config.input,
        config.policy.name()
    );

    let text = config.input.read_to_string()?;
    let document = Document::from_json(&text)?;
    let conversion = convert(&document, config.policy)?;

    if conversion.skipped > 0 {
        eprintln!(
            "{} skipped {} malformed pitch bend event(s)",
            "warning:".yellow().bold(),
            conversion.skipped
        );
    }

    let output = if config.pretty {
        serde_json::to_string_pretty(&conversion)?
    } else {
        serde_json::to_string(&conversion)?
    };
    println!("{}", output);
    Ok(())
}
