use launch_stub::launchers::JavaLauncher;

fn main() {
    launch_stub::run::<JavaLauncher>()
}
