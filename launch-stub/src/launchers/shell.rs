//! Shell launch strategy.

use super::{companion_resource, LaunchContext, LaunchStrategy};
use crate::cmdline::CommandLine;
use crate::error::Result;
use crate::process;

/// Launches the shell script shipped next to the stub.
///
/// Required launch data: `BASH_BIN`, the shell to invoke. The companion
/// script is the stub's own path with `.exe` swapped for `.sh`.
pub struct ShellLauncher;

impl LaunchStrategy for ShellLauncher {
    fn launch(ctx: &LaunchContext) -> Result<i32> {
        process::launch(&command_line(ctx)?)
    }
}

fn command_line(ctx: &LaunchContext) -> Result<CommandLine> {
    let bash_bin = ctx.launch_info("BASH_BIN")?;
    let mut args = Vec::with_capacity(ctx.forwarded_args().len() + 1);
    args.push(companion_resource(ctx.stub_path(), ".sh"));
    args.extend_from_slice(ctx.forwarded_args());
    CommandLine::build(bash_bin, &args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LaunchError;
    use crate::launch_data::LaunchInfo;

    #[test]
    fn builds_the_shell_invocation() {
        let mut info = LaunchInfo::new();
        info.insert("BASH_BIN".to_string(), "C:\\msys\\bash.exe".to_string());
        let ctx = LaunchContext::new(
            info,
            vec!["task.exe".to_string(), "--verbose".to_string()],
        );
        let cmdline = command_line(&ctx).unwrap();
        assert_eq!(cmdline.as_str(), "\"C:\\msys\\bash.exe\" task.sh --verbose");
    }

    #[test]
    fn missing_shell_key_is_fatal() {
        let ctx = LaunchContext::new(LaunchInfo::new(), vec!["task".to_string()]);
        let err = command_line(&ctx).unwrap_err();
        assert!(matches!(
            err,
            LaunchError::MissingLaunchInfoKey(key) if key == "BASH_BIN"
        ));
    }
}
