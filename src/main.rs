//! CLI entry point for the pipe-extract tool.

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use pipe_extractor::{
    ChannelExtractor, ChannelTab, ChannelTabExtractor, ExtractorConfig, ExtractorContext,
    InfoItem, ReqwestTransport, load_default_config, services,
};
use serde::Serialize;
use tracing::{debug, info, warn};

mod cli;

use cli::Args;

/// Everything printed for one tab.
#[derive(Debug, Serialize)]
struct TabReport {
    tab: ChannelTab,
    items: Vec<InfoItem>,
    item_errors: usize,
    pages: u8,
    has_more: bool,
}

/// Everything printed for one channel.
#[derive(Debug, Serialize)]
struct ChannelReport {
    service: String,
    id: String,
    url: String,
    original_url: String,
    name: String,
    avatar_url: Option<String>,
    banner_url: Option<String>,
    feed_url: Option<String>,
    subscriber_count: Option<u64>,
    description: Option<String>,
    tabs: Vec<TabReport>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    // Results go to stdout; logs stay on stderr so --json output remains parseable.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    let config = effective_config(&args)?;
    let transport = ReqwestTransport::from_config(&config)
        .context("failed to initialize HTTP transport")?;
    let ctx = ExtractorContext::new(Arc::new(transport))
        .with_localization(config.localization.clone());

    let registry = services();
    let link = registry.resolve_url(&args.url)?;
    let service_name = registry
        .service(link.service_id)
        .map_or_else(|| link.service_id.to_string(), |s| s.name().to_string());

    let mut channel = registry.channel_extractor(&args.url, &ctx)?;
    channel.fetch_page().await?;
    info!(service = %service_name, id = channel.id(), "Channel fetched");

    let mut tabs = channel.tabs()?;
    if let Some(wanted) = args.tab {
        tabs.retain(|tab| tab.tab() == wanted);
        if tabs.is_empty() {
            bail!("channel has no '{wanted}' tab");
        }
    }

    let mut tab_reports = Vec::with_capacity(tabs.len());
    for tab in &mut tabs {
        tab_reports.push(collect_tab(tab.as_mut(), args.pages).await?);
    }

    let report = channel_report(channel.as_ref(), service_name, tab_reports)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

/// Config file (explicit path or default location) with CLI overrides applied.
fn effective_config(args: &Args) -> Result<ExtractorConfig> {
    let mut config = if let Some(path) = &args.config {
        ExtractorConfig::load(path)?
    } else {
        let loaded = load_default_config()?;
        if loaded.loaded_from_file {
            debug!(path = ?loaded.path, "Loaded config file");
        }
        loaded.config
    };

    if let Some(language) = &args.language {
        config.localization.language.clone_from(language);
    }
    if let Some(country) = &args.country {
        config.localization.country = Some(country.clone());
    }
    config.validate()?;
    Ok(config)
}

/// Fetches a tab and follows continuation tokens for up to `max_pages` pages.
async fn collect_tab(tab: &mut dyn ChannelTabExtractor, max_pages: u8) -> Result<TabReport> {
    tab.fetch_page().await?;
    let mut page = tab.initial_page()?;
    let mut pages: u8 = 1;
    let mut items = Vec::new();
    let mut item_errors = 0;

    let has_more = loop {
        for error in page.errors() {
            warn!(
                tab = %tab.tab(),
                position = error.position,
                error = %error.error,
                "Skipped malformed item"
            );
        }
        item_errors += page.errors().len();
        let next = page.next_page().cloned();
        items.extend(page.into_items());

        match next {
            Some(token) if pages < max_pages => {
                page = tab.get_page(token.as_str()).await?;
                pages += 1;
            }
            next => break next.is_some(),
        }
    };

    debug!(tab = %tab.tab(), items = items.len(), pages, has_more, "Tab collected");
    Ok(TabReport {
        tab: tab.tab(),
        items,
        item_errors,
        pages,
        has_more,
    })
}

fn channel_report(
    channel: &dyn ChannelExtractor,
    service: String,
    tabs: Vec<TabReport>,
) -> Result<ChannelReport> {
    Ok(ChannelReport {
        service,
        id: channel.id().to_string(),
        url: channel.url().to_string(),
        original_url: channel.original_url()?,
        name: channel.name()?,
        avatar_url: channel.avatar_url()?,
        banner_url: channel.banner_url()?,
        feed_url: channel.feed_url()?,
        subscriber_count: channel.subscriber_count()?,
        description: channel.description()?,
        tabs,
    })
}

fn print_report(report: &ChannelReport) {
    println!("{} ({})", report.name, report.service);
    println!("  id:  {}", report.id);
    println!("  url: {}", report.url);
    if let Some(count) = report.subscriber_count {
        println!("  subscribers: {count}");
    }
    if let Some(feed) = &report.feed_url {
        println!("  feed: {feed}");
    }

    for tab in &report.tabs {
        let more = if tab.has_more { ", more available" } else { "" };
        println!();
        println!(
            "[{}] {} item(s) from {} page(s){more}",
            tab.tab,
            tab.items.len(),
            tab.pages
        );
        for item in &tab.items {
            println!("  - {} <{}>", item.name(), item.url());
        }
        if tab.item_errors > 0 {
            println!("  ({} malformed item(s) skipped)", tab.item_errors);
        }
    }
}
