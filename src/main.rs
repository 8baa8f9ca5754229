use crate::config::Settings;
use crate::types::*;
use anyhow::{Context, Result};
use log::*;
use signal_hook::{
    consts::signal::{SIGINT, SIGTERM},
    iterator::Signals,
};
use std::{
    env,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};
use thiserror::Error;

mod args;
mod config;
mod download;
mod imagesize;
mod reddit;
mod types;

const PKG_NAME: &str = env!("CARGO_PKG_NAME");

#[derive(Error, Debug)]
pub enum RunError {
    #[error("failed to build http client: {0}")]
    Client(reqwest::Error),
    #[error(transparent)]
    Listing(#[from] reddit::ListingError),
    #[error(transparent)]
    Download(#[from] download::DownloadError),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let program = env::args().next().unwrap_or_else(|| PKG_NAME.to_string());
    let args = match args::parse_args(env::args().skip(1)) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{err}\n\n{}", args::usage(&program));
            std::process::exit(2);
        }
    };
    if args.help {
        print!("{}", args::usage(&program));
        return Ok(());
    }

    let config = config::read_config()?;
    let settings = Settings::resolve(args, config)?;
    info!("starting with settings: {settings:#?}");

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = shutdown.clone();
        let mut signals =
            Signals::new(&[SIGINT, SIGTERM]).context("unable to watch for signals")?;
        std::thread::spawn(move || {
            for signal in signals.forever() {
                // A second signal exits instantly
                if shutdown.swap(true, Ordering::AcqRel) {
                    std::process::exit(130);
                }
                info!("got signal {signal}, stopping after the current post...");
            }
        });
    }

    let summary = run(&settings, &shutdown)
        .await
        .with_context(|| format!("failed to download images from /r/{}", settings.subreddit))?;
    println!("Done: {summary}");
    Ok(())
}

fn report(post: &reddit::Post, outcome: &PostOutcome) {
    match outcome {
        PostOutcome::Saved(path) => {
            debug!("wrote {}", path.to_string_lossy());
            println!("Successfully saved image: {}", post.id)
        }
        PostOutcome::Skipped(reason) => println!("{}", reason.message(&post.id)),
    }
}

/// Fetches the listing and processes every post in order.
///
/// Listing transport and status failures end the run before anything is
/// downloaded. An undecodable listing is reported and treated as empty. Per
/// post errors end the run unless `keep_going` is set.
async fn run(settings: &Settings, shutdown: &AtomicBool) -> Result<RunSummary, RunError> {
    let client = reddit::get_client(&settings.user_agent).map_err(RunError::Client)?;
    let url = reddit::listing_url(
        &settings.base_url,
        &settings.subreddit,
        &settings.sort,
        &settings.limit,
    )
    .map_err(reddit::ListingError::from)?;
    let body = reddit::fetch_listing(&client, url).await?;

    let posts = reddit::decode_listing(&body).unwrap_or_else(|err| {
        error!("error decoding listing: {err}");
        println!("Could not decode listing: {err}");
        Vec::new()
    });

    download::prepare_dest(&settings.dest)?;

    // Image hosts get a plain client, without the listing user agent.
    let image_client = reqwest::Client::builder()
        .build()
        .map_err(RunError::Client)?;

    let mut summary = RunSummary::default();
    for (i, post) in posts.iter().enumerate() {
        if shutdown.load(Ordering::Acquire) {
            warn!("shutdown requested, {} post(s) left unprocessed", posts.len() - i);
            summary.interrupted = true;
            break;
        }

        match download::process_post(&image_client, post, &settings.dest, settings.min).await {
            Ok(outcome) => {
                report(post, &outcome);
                summary.record(&outcome);
            }
            Err(err) if settings.keep_going => {
                error!("failed to handle post {}: {err}", post.id);
                println!("Failed to save image {}, skipping...", post.id);
                summary.failed += 1;
            }
            Err(err) => return Err(err.into()),
        }
    }

    info!("finished: {summary}");
    Ok(summary)
}
