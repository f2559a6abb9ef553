//! Python launch strategy.

use super::{companion_resource, LaunchContext, LaunchStrategy};
use crate::cmdline::CommandLine;
use crate::error::Result;
use crate::process;

/// Launches the Python program zipped up next to the stub.
///
/// Required launch data: `PYTHON_BIN`, the interpreter to invoke. The
/// stub's own path with `.exe` swapped for `.zip` becomes the child's
/// first argument.
pub struct PythonLauncher;

impl LaunchStrategy for PythonLauncher {
    fn launch(ctx: &LaunchContext) -> Result<i32> {
        process::launch(&command_line(ctx)?)
    }
}

fn command_line(ctx: &LaunchContext) -> Result<CommandLine> {
    let python_bin = ctx.launch_info("PYTHON_BIN")?;
    let mut args = Vec::with_capacity(ctx.forwarded_args().len() + 1);
    args.push(companion_resource(ctx.stub_path(), ".zip"));
    args.extend_from_slice(ctx.forwarded_args());
    CommandLine::build(python_bin, &args)
}
