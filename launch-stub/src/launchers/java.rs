//! Java launch strategy.

use std::path::Path;

use super::{companion_resource, LaunchContext, LaunchStrategy, EXE_SUFFIX};
use crate::cmdline::CommandLine;
use crate::error::Result;
use crate::process;

/// Launches the jar shipped next to the stub on a JVM found under
/// `JAVA_HOME`.
///
/// Required launch data: `JAVA_HOME`, the runtime install root; the
/// launcher runs `<JAVA_HOME>/bin/java`. Optional: `JVM_FLAGS`,
/// whitespace-separated flags inserted ahead of the fixed `-jar` startup
/// flag.
pub struct JavaLauncher;

impl LaunchStrategy for JavaLauncher {
    fn launch(ctx: &LaunchContext) -> Result<i32> {
        process::launch(&command_line(ctx)?)
    }
}

fn command_line(ctx: &LaunchContext) -> Result<CommandLine> {
    let java_home = ctx.launch_info("JAVA_HOME")?;
    let java_bin = Path::new(java_home)
        .join("bin")
        .join(format!("java{EXE_SUFFIX}"));

    let mut args = Vec::new();
    if let Some(flags) = ctx.optional_launch_info("JVM_FLAGS") {
        args.extend(flags.split_whitespace().map(str::to_owned));
    }
    args.push("-jar".to_string());
    args.push(companion_resource(ctx.stub_path(), ".jar"));
    args.extend_from_slice(ctx.forwarded_args());
    CommandLine::build(&java_bin.to_string_lossy(), &args)
}
