//! Appends launch data to a stub template, producing a finalized stub.
//!
//! All build-time customization of a stub lives in a block appended after
//! the binary image: `key=value` records, NUL-terminated, followed by an
//! 8-byte length field. This tool writes that block; the stub reads it
//! back at run time. Keys and values must not contain NUL, and keys must
//! not contain `=`.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use launch_stub::launch_data;

#[derive(Parser)]
#[command(
    name = "append-data",
    about = "Append launch data to a stub binary template"
)]
struct Args {
    /// Write the finalized stub here instead of appending to the template
    /// in place.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to the stub template binary.
    template: PathBuf,

    /// Launch data pairs, each as KEY=VALUE.
    #[arg(required = true)]
    pairs: Vec<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match append(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("Error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn append(args: &Args) -> Result<(), String> {
    let pairs = parse_pairs(&args.pairs)?;

    let target = match &args.output {
        Some(output) => {
            // Prevent overwriting the template through --output.
            let template = fs::canonicalize(&args.template)
                .map_err(|err| format!("cannot resolve template path: {err}"))?;
            if fs::canonicalize(output).ok() == Some(template) {
                return Err(
                    "output path cannot be the same as the template path".to_string()
                );
            }
            fs::copy(&args.template, output).map_err(|err| {
                format!("cannot copy template to {}: {err}", output.display())
            })?;
            output.clone()
        }
        None => args.template.clone(),
    };

    launch_data::append_to(&target, &pairs)
        .map_err(|err| format!("cannot append launch data: {err}"))?;
    make_executable(&target)?;

    eprintln!(
        "Appended {} launch data pairs to {}",
        pairs.len(),
        target.display()
    );
    Ok(())
}

fn parse_pairs(raw: &[String]) -> Result<Vec<(String, String)>, String> {
    raw.iter()
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) if !key.is_empty() => {
                Ok((key.to_string(), value.to_string()))
            }
            _ => Err(format!("not a KEY=VALUE pair: {pair:?}")),
        })
        .collect()
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<(), String> {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = fs::metadata(path)
        .map_err(|err| format!("cannot read permissions: {err}"))?
        .permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms).map_err(|err| format!("cannot set permissions: {err}"))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<(), String> {
    Ok(())
}
