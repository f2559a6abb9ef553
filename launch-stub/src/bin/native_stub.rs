use launch_stub::launchers::NativeLauncher;

fn main() {
    launch_stub::run::<NativeLauncher>()
}
