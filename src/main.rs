use std::process::ExitCode;

fn main() -> ExitCode {
    infera::cli::run()
}
