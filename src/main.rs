use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();

    match uah_rates::app::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if !err.is_reported() {
                eprintln!("{err}");
            }
            ExitCode::from(err.exit_code())
        }
    }
}
