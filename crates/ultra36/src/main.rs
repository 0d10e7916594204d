use ultra36::{Command, ERROR_EXIT_CODE, USAGE};

fn main() {
    env_logger::init();

    let options = match ultra36::parse_args(std::env::args().skip(1)) {
        Ok(Command::Run(options)) => options,
        Ok(Command::Help) => {
            println!("{USAGE}");
            return;
        }
        Err(err) => {
            eprintln!("{err:#}\n\n{USAGE}");
            std::process::exit(ERROR_EXIT_CODE);
        }
    };

    match ultra36::run(options) {
        Ok(end) => {
            println!("{}", ultra36::summary(end));
            std::process::exit(end.exit_code());
        }
        Err(err) => {
            log::error!("{err:#}");
            eprintln!("error: {err:#}");
            std::process::exit(ERROR_EXIT_CODE);
        }
    }
}
