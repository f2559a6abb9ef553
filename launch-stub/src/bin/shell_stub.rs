use launch_stub::launchers::ShellLauncher;

fn main() {
    launch_stub::run::<ShellLauncher>()
}
