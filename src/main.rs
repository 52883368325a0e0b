use clap::Parser;
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::error::Error;
use vpc_range_finder::app::{self, Args};
use vpc_range_finder::config::Settings;

const LOG_CONFIG_FILE: &str = "log4rs.yml";

/// stderr logging for when `log4rs.yml` is missing; stdout carries the result.
fn init_default_logging() -> Result<(), Box<dyn Error>> {
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("{d(%H:%M:%S)} {h({l})} {m}{n}")))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(LevelFilter::Warn))?;
    log4rs::init_config(config)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    if log4rs::init_file(LOG_CONFIG_FILE, Default::default()).is_err() {
        init_default_logging()?;
    }
    dotenv::dotenv().ok();
    let args = Args::parse();
    log::info!("#Start main() {:?}", args);

    let rendered = app::run(&args, Settings::from_env())?;
    println!("{rendered}");

    Ok(())
}
