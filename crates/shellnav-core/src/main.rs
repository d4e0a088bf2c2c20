//! Headless site runner
//!
//! `shellnav <location> [href...]` boots the site served at `location`,
//! follows each `href` as a click and prints the final content area.
//! `SHELLNAV_CONFIG` points at a JSON config file.

use url::Url;

use shellnav_core::{
    Config, CoreError, HttpFetcher, NavigationOutcome, Result, RouterEvent, Site, TracingDriver,
};

#[tokio::main]
async fn main() {
    shellnav_core::init_logging();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "Shellnav failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let location = args
        .next()
        .ok_or_else(|| CoreError::Config("usage: shellnav <location> [href...]".to_string()))?;
    let location = Url::parse(&location)
        .map_err(|e| CoreError::Config(format!("invalid location '{location}': {e}")))?;

    let config = match std::env::var("SHELLNAV_CONFIG") {
        Ok(path) => Config::load(path)?,
        Err(_) => Config::for_location(&location),
    };

    let fetcher = HttpFetcher::new(config.router.request_timeout())
        .map_err(shellnav_core::RouterError::Fetch)?;
    let site = Site::open(config, fetcher, TracingDriver::default(), &location)?;

    match site.boot(navigator_languages()).await? {
        Some(NavigationOutcome::Rendered) | None => {}
        Some(outcome) => tracing::warn!(?outcome, "Initial page did not render"),
    }

    for href in args {
        let dispatch = site.dispatch(RouterEvent::Click {
            href: Some(href.clone()),
        });
        match dispatch.task {
            Some(task) => {
                if let Err(e) = task.await {
                    tracing::error!(href = %href, error = %e, "Navigation task failed");
                }
            }
            None => tracing::info!(href = %href, "Link not routed, skipping"),
        }
    }

    let content = site.router().with_shell(|shell| shell.content().to_string());
    println!("{content}");
    Ok(())
}

/// Preferred languages from the POSIX locale, e.g. `de_DE.UTF-8`.
fn navigator_languages() -> Vec<String> {
    ["LC_ALL", "LANG"]
        .into_iter()
        .filter_map(|var| std::env::var(var).ok())
        .filter_map(|value| {
            let tag = value.split(['.', '@']).next()?.trim();
            (!tag.is_empty() && tag != "C" && tag != "POSIX").then(|| tag.to_string())
        })
        .collect()
}
