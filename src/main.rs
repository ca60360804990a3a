use actix_web::{middleware::Logger, web, App, HttpServer};
use clap::builder::RangedU64ValueParser;
use clap::{value_parser, Arg, Command};
use env_logger::Env;
use log::{info, warn};
use std::fs::OpenOptions;
use std::io;
use std::sync::{Arc, Mutex};

mod config;
mod error;
mod handlers;
mod models;
mod services;
mod utils;

use config::{ImageSearchCredentials, Settings};
use handlers::quiz::get_quiz;
use models::AppState;
use services::figure_pool::resolve_pool;
use services::image_lookup::{DisabledLookup, GoogleImageSearch, ImageLookup};
use services::quiz_state::QuizState;

pub fn cli() -> Command {
    Command::new("quizd")
        .version("1.0")
        .author("Ron Straight <straightre@gmail.com>")
        .about("Daily historical-figure quiz service")
        .arg(
            Arg::new("listen-host")
                .long("listen-host")
                .num_args(1)
                .default_value("0.0.0.0:3000")
                .help("Specify the listen address (e.g., 0.0.0.0:3000)"),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .num_args(1)
                .help("Specify a log file path (if omitted, logs to stderr)"),
        )
        .arg(
            Arg::new("figures")
                .long("figures")
                .num_args(1)
                .help("File of `name|hint` lines replacing the built-in figure pool"),
        )
        .arg(
            Arg::new("daily-size")
                .long("daily-size")
                .num_args(1)
                .default_value("6")
                .value_parser(RangedU64ValueParser::<usize>::new().range(1..))
                .help("Number of figures in each day's set"),
        )
        .arg(
            Arg::new("daily-limit")
                .long("daily-limit")
                .num_args(1)
                .default_value("100")
                .value_parser(value_parser!(u32))
                .help("Maximum quiz requests served per day"),
        )
        .arg(
            Arg::new("fallback-image")
                .long("fallback-image")
                .num_args(1)
                .default_value("/default-image.png")
                .help("Image reference served when image search is unavailable"),
        )
        .arg(
            Arg::new("lookup-timeout-secs")
                .long("lookup-timeout-secs")
                .num_args(1)
                .default_value("5")
                .value_parser(value_parser!(u64))
                .help("Timeout for a single image search, in seconds"),
        )
}

fn init_logging(log_file: Option<&String>) -> io::Result<()> {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));

    if let Some(file) = log_file {
        let log_output = OpenOptions::new().create(true).append(true).open(file)?;
        builder.target(env_logger::Target::Pipe(Box::new(log_output)));
    }

    builder.init();
    Ok(())
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    // A missing .env is fine; real env vars still apply
    dotenvy::dotenv().ok();

    let matches = cli().get_matches();
    let mut settings = Settings::from_matches(&matches);

    init_logging(settings.log_file.as_ref())?;
    settings.credentials = ImageSearchCredentials::from_env();
    settings.log_summary();

    let pool = resolve_pool(settings.figures_file.as_deref());
    info!("Figure pool holds {} entries.", pool.len());

    let images: Arc<dyn ImageLookup> = match settings.credentials.clone() {
        Some(credentials) => match GoogleImageSearch::new(credentials, settings.lookup_timeout) {
            Ok(search) => Arc::new(search),
            Err(e) => {
                warn!("Failed to build image search client: {}. Image search is disabled.", e.without_url());
                Arc::new(DisabledLookup)
            }
        },
        None => Arc::new(DisabledLookup),
    };

    let quiz = QuizState::new(
        pool,
        settings.daily_size,
        settings.daily_limit,
        utils::local_today(),
        &mut rand::thread_rng(),
    );

    let state = AppState {
        quiz: Mutex::new(quiz),
        images,
        fallback_image: settings.fallback_image.clone(),
        clock: Arc::new(utils::local_today),
    };
    let shared_state = web::Data::new(state);

    info!("Listening on {}", settings.listen_host);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(shared_state.clone())
            .service(get_quiz)
    })
    .bind(&settings.listen_host)?
    .run()
    .await
}
