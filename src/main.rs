use std::env;
use std::process;

use ttypump::app::App;
use ttypump::cli::Command;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let command = match Command::parse(&args) {
        Ok(command) => command,
        Err(err) => {
            eprintln!("{err}");
            eprintln!();
            eprintln!("{}", Command::help());
            process::exit(err.exit_code());
        }
    };

    match command {
        Command::ShowHelp => Command::print_help(),
        Command::ShowVersion => println!("ttypump {}", env!("CARGO_PKG_VERSION")),
        Command::Run(opts) => {
            if let Err(err) = App::from_options(opts).run() {
                eprintln!("{err}");
                process::exit(err.exit_code());
            }
        }
    }
}
