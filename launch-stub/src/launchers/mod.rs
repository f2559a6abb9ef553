//! Launch strategies: the per-target-runtime logic that turns the stub's
//! arguments plus its launch data into a concrete child invocation.
//!
//! A stub binary is compiled against exactly one strategy (one bin target
//! per strategy), so the build identity of the artifact decides how the
//! wrapped program is launched; nothing selects strategies by name at run
//! time. Every strategy reads its required keys from the launch data,
//! derives the companion resource from the stub's own path without touching
//! the original argv, and hands the result to the command-line builder and
//! the process launcher.

mod java;
mod native;
mod python;
mod shell;

pub use java::JavaLauncher;
pub use native::NativeLauncher;
pub use python::PythonLauncher;
pub use shell::ShellLauncher;

use crate::error::{LaunchError, Result};
use crate::launch_data::LaunchInfo;

#[cfg(windows)]
const EXE_SUFFIX: &str = ".exe";
#[cfg(not(windows))]
const EXE_SUFFIX: &str = "";

/// One launch strategy. `launch` blocks until the child exits and returns
/// its exit code unchanged.
pub trait LaunchStrategy {
    fn launch(ctx: &LaunchContext) -> Result<i32>;
}

/// Everything a strategy may consult: the decoded launch data and the
/// stub's own argv.
pub struct LaunchContext {
    launch_info: LaunchInfo,
    argv: Vec<String>,
}

impl LaunchContext {
    pub fn new(launch_info: LaunchInfo, argv: Vec<String>) -> Self {
        Self { launch_info, argv }
    }

    /// Looks up a key every stub of the active flavor must carry.
    pub fn launch_info(&self, key: &str) -> Result<&str> {
        self.launch_info
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| LaunchError::MissingLaunchInfoKey(key.to_owned()))
    }

    /// Looks up a key the strategy can run without. Keys the active
    /// strategy does not recognize are simply never read.
    pub fn optional_launch_info(&self, key: &str) -> Option<&str> {
        self.launch_info.get(key).map(String::as_str)
    }

    /// The stub's own invocation path (argv\[0\]).
    pub fn stub_path(&self) -> &str {
        self.argv.first().map(String::as_str).unwrap_or_default()
    }

    /// The arguments the stub forwards to the child (argv\[1..\]).
    pub fn forwarded_args(&self) -> &[String] {
        if self.argv.is_empty() {
            &[]
        } else {
            &self.argv[1..]
        }
    }
}

/// Derives the companion resource shipped next to the stub: the stub's own
/// path with any `.exe` suffix removed and `extension` appended.
fn companion_resource(stub_path: &str, extension: &str) -> String {
    let base = stub_path.strip_suffix(".exe").unwrap_or(stub_path);
    format!("{base}{extension}")
}
