use codesushi::cli::{init_logging, parse_args};
use codesushi::run_codesushi;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let (config, verbosity) = parse_args();
    init_logging(verbosity);

    match run_codesushi(&config).await {
        Ok(()) => {
            println!(
                "Markdown context file created successfully: {}",
                config.output_path.display()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error creating context file: {err:#}");
            ExitCode::FAILURE
        }
    }
}
