//! Control daemon for the audio relay.
//!
//! Loads the INI configuration, starts the workers enabled by
//! `[SystemSettings]`, and runs a small console on stdin for status,
//! toggles, one-shot captures, and reloads.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use anyhow::Context;
use clap::Parser;

use audio_relay_core::{AudioJobSpec, ControlCenter, Feature, SettingsProvider};

/// Continuous audio capture, broadcast, and archive daemon.
#[derive(Parser, Debug)]
#[command(name = "audio-relay-daemon", version, about)]
struct Args {
    /// Path to the INI configuration file.
    #[arg(short, long, default_value = "config.ini")]
    config: PathBuf,

    /// Run headless (no stdin console) until killed.
    #[arg(long)]
    no_console: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let settings = SettingsProvider::open(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    let center = ControlCenter::new(Arc::new(settings));
    center.apply_system_flags();
    log::info!("relay daemon ready (config {})", args.config.display());

    if args.no_console {
        loop {
            thread::park();
        }
    }

    console_loop(&center)?;
    center.shutdown();
    Ok(())
}

fn console_loop(center: &ControlCenter) -> anyhow::Result<()> {
    let stdin = io::stdin();
    print_help();
    prompt()?;

    for line in stdin.lock().lines() {
        let line = line.context("reading console input")?;
        let words: Vec<&str> = line.split_whitespace().collect();

        match words.as_slice() {
            [] => {}
            ["status"] => println!("{}", center.status_json()),
            ["toggle", feature, state] => match parse_toggle(feature, state) {
                Ok((feature, enabled)) => match center.toggle(feature, enabled) {
                    Ok(message) => println!("{message}"),
                    Err(e) => println!("{e}"),
                },
                Err(message) => println!("{message}"),
            },
            ["capture", rest @ ..] => match parse_capture(rest) {
                Ok(spec) => {
                    center.capture_once(spec);
                    println!("capture started");
                }
                Err(message) => println!("{message}"),
            },
            ["reload"] => match center.reload() {
                Ok(snapshot) => {
                    center.apply_system_flags();
                    println!("reloaded (version {})", snapshot.version);
                }
                Err(e) => println!("{e}"),
            },
            ["quit"] | ["exit"] => break,
            ["help"] => print_help(),
            _ => println!("unrecognized command: {line}"),
        }
        prompt()?;
    }
    Ok(())
}

fn parse_toggle(feature: &str, state: &str) -> Result<(Feature, bool), String> {
    let feature: Feature = feature.parse()?;
    let enabled = match state {
        "on" => true,
        "off" => false,
        other => return Err(format!("expected on/off, got {other}")),
    };
    Ok((feature, enabled))
}

/// `capture` alone runs a dual-output job; `capture stream` or
/// `capture record` limits it to one sink.
fn parse_capture(words: &[&str]) -> Result<AudioJobSpec, String> {
    match words {
        [] => Ok(AudioJobSpec::dual_output()),
        ["stream"] => Ok(AudioJobSpec::stream_only()),
        ["record"] => Ok(AudioJobSpec::record_only()),
        other => Err(format!("expected stream or record, got {}", other.join(" "))),
    }
}

fn prompt() -> io::Result<()> {
    print!("> ");
    io::stdout().flush()
}

fn print_help() {
    println!("commands:");
    println!("  status                     show workers and configuration");
    println!("  toggle <feature> on|off    feature: streaming | recording | syncing");
    println!("  capture [stream|record]    fire a one-shot capture job");
    println!("  reload                     re-read the config and re-apply flags");
    println!("  quit                       stop all workers and exit");
}
