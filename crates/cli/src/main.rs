use std::process::ExitCode;

fn main() -> ExitCode {
    sunrise_cli::run()
}
