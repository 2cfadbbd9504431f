use std::process::ExitCode;

fn main() -> ExitCode {
    match annofeed::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
