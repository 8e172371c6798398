//! BSS causal broadcast simulator entrypoint.
//!
//! Wires together the external collaborators (script parsing, trace writing) around the protocol
//! core: parse and validate the script, run every process concurrently, write the trace. Any
//! failure (unreadable script, validation error, or livelock) is fatal and maps to exit code 1,
//! per the error-handling design.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use bss_causal_sim::error::SimError;
use bss_causal_sim::simulation::{run_simulation, SimConfig};
use bss_causal_sim::{script, trace};

struct Args {
    script_path: PathBuf,
    poll_limit: Option<u32>,
    poll_backoff_ms: Option<u64>,
    output_path: PathBuf,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut script_path = None;
    let mut poll_limit = None;
    let mut poll_backoff_ms = None;
    let mut output_path = PathBuf::from("output.txt");

    let mut raw = std::env::args().skip(1);
    while let Some(arg) = raw.next() {
        match arg.as_str() {
            "--poll-limit" => {
                let v = raw.next().ok_or_else(|| anyhow::anyhow!("--poll-limit requires a value"))?;
                poll_limit = Some(v.parse()?);
            }
            "--poll-backoff-ms" => {
                let v = raw.next().ok_or_else(|| anyhow::anyhow!("--poll-backoff-ms requires a value"))?;
                poll_backoff_ms = Some(v.parse()?);
            }
            "--output" => {
                let v = raw.next().ok_or_else(|| anyhow::anyhow!("--output requires a value"))?;
                output_path = PathBuf::from(v);
            }
            other if script_path.is_none() => script_path = Some(PathBuf::from(other)),
            other => anyhow::bail!("unexpected argument: {other}"),
        }
    }

    let script_path = script_path.ok_or_else(|| anyhow::anyhow!("usage: bss-causal-sim <script> [--poll-limit N] [--poll-backoff-ms MS] [--output PATH]"))?;

    Ok(Args { script_path, poll_limit, poll_backoff_ms, output_path })
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(1);
        }
    };

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if err.is_stdout_message() {
                println!("{err}");
            } else {
                eprintln!("{err}");
            }
            ExitCode::from(err.exit_code() as u8)
        }
    }
}

async fn run(args: Args) -> Result<(), SimError> {
    let text = std::fs::read_to_string(&args.script_path).map_err(|source| SimError::Io {
        path: args.script_path.clone(),
        source,
    })?;

    let operations = script::parse_script(&text)?;
    let n = operations.len();

    let mut config = SimConfig::for_process_count(n);
    if let Some(limit) = args.poll_limit {
        config.poll_limit = limit;
    }
    if let Some(ms) = args.poll_backoff_ms {
        config.poll_backoff = Duration::from_millis(ms);
    }

    let traces = run_simulation(operations, config).await?;

    trace::write_trace(&args.output_path, &traces).map_err(|source| SimError::Io {
        path: args.output_path.clone(),
        source,
    })?;

    Ok(())
}
