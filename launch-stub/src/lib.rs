//! Self-describing launcher stubs.
//!
//! A stub is a generic native executable customized per build target purely
//! by appending data after the binary image: no relinking, no config file
//! shipped alongside. At run time the stub reads its own image, decodes the
//! appended `key=value` block ([`launch_data`]), rebuilds a command line
//! with the platform's quoting rules ([`cmdline`]), spawns the target
//! process ([`process`]), and exits with the child's exit code. Which
//! launch strategy runs ([`launchers`]) is fixed when the stub binary is
//! built.
//!
//! The stub has no command-line surface of its own: `argv[1..]` is passed
//! through to the launched child, and the exit code is the child's, except
//! for stub-level fatal errors, which exit non-zero with a message on
//! stderr.

pub mod cmdline;
pub mod error;
pub mod launch_data;
pub mod launchers;
pub mod process;

pub use error::{LaunchError, Result};

use launchers::{LaunchContext, LaunchStrategy};

/// Entry point shared by every stub binary. Never returns.
pub fn run<S: LaunchStrategy>() -> ! {
    init_logging();
    let exit_code = match try_launch::<S>() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("launch-stub: {err}");
            1
        }
    };
    std::process::exit(exit_code)
}

fn try_launch<S: LaunchStrategy>() -> Result<i32> {
    let stub_image = std::env::current_exe()?;
    // The image handle lives only inside read_launch_info; it is closed
    // before any child process is spawned.
    let launch_info = launch_data::read_launch_info(&stub_image)?;
    let ctx = LaunchContext::new(launch_info, std::env::args().collect());
    S::launch(&ctx)
}

fn init_logging() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
