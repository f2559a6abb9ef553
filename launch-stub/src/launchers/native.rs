//! Native pass-through launch strategy.

use super::{LaunchContext, LaunchStrategy};
use crate::cmdline::CommandLine;
use crate::error::Result;
use crate::process;

/// Hands control to a natively compiled binary recorded in the launch
/// data.
///
/// Required launch data: `NATIVE_BIN`, the wrapped binary. No companion
/// resource is involved; the stub contributes only its forwarded
/// arguments.
pub struct NativeLauncher;

impl LaunchStrategy for NativeLauncher {
    fn launch(ctx: &LaunchContext) -> Result<i32> {
        process::launch(&command_line(ctx)?)
    }
}

fn command_line(ctx: &LaunchContext) -> Result<CommandLine> {
    let native_bin = ctx.launch_info("NATIVE_BIN")?;
    CommandLine::build(native_bin, ctx.forwarded_args())
}
