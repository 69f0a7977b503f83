use std::{env, process::exit};

use jayc::{config::Config, display_error, driver::run};

fn main() {
    env_logger::init();

    let config = match Config::from_args(env::args().skip(1)) {
        Ok(config) => config,
        Err(error) => {
            display_error(&error, "<args>".as_ref());
            exit(1);
        }
    };

    if let Err(error) = run(&config) {
        display_error(&error, &config.input_path);
        exit(1);
    }
}
