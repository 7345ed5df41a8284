use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let matches = gova_cli::command().get_matches();
    gova_cli::logging::init(matches.get_flag("log-json"));

    let mut stdout = std::io::stdout().lock();
    match gova_cli::run(&matches, &mut stdout).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
