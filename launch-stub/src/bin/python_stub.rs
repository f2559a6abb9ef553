use launch_stub::launchers::PythonLauncher;

fn main() {
    launch_stub::run::<PythonLauncher>()
}
