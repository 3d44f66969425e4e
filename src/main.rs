use std::fs;
use std::io::{self, Write};
use std::process;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tokio::runtime::Runtime;
use url::Url;

use trawl_rs::prelude::*;

#[derive(Parser)]
#[command(
    name = "trawl",
    about = "Configuration toolkit for the trawl-rs web crawler",
    version,
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a crawler configuration file and print a summary
    Check {
        /// Path to the configuration file
        file: String,
    },

    /// Load a configuration file and re-serialize it to stdout
    Dump {
        /// Path to the configuration file
        file: String,

        /// Print a JSON summary instead of XML
        #[arg(long)]
        json: bool,
    },

    /// Print the default configuration
    Defaults {
        /// Print a JSON summary instead of XML
        #[arg(long)]
        json: bool,
    },

    /// Fetch one URL with the configured client and document fetcher
    Fetch {
        /// URL to fetch
        url: String,

        /// Configuration file to apply
        #[arg(short, long)]
        config: Option<String>,
    },
}

#[derive(Serialize)]
struct ConfigSummary {
    id: String,
    user_agent: Option<String>,
    max_depth: i32,
    keep_downloads: bool,
    start_urls: Vec<String>,
    urls_files: Vec<String>,
    slots: Vec<SlotSummary>,
}

#[derive(Serialize)]
struct SlotSummary {
    slot: &'static str,
    class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ignored: Option<bool>,
}

fn main() {
    let cli = Cli::parse();
    env_logger::init();

    match cli.command {
        Commands::Check { file } => {
            let config = load_config(&file);
            print_summary(&summarize(&config));
            println!("OK: {}", file);
        }
        Commands::Dump { file, json } => {
            let config = load_config(&file);
            dump(&config, json);
        }
        Commands::Defaults { json } => {
            let config = CrawlerConfigBuilder::new().build();
            dump(&config, json);
        }
        Commands::Fetch { url, config } => {
            let config = match config {
                Some(path) => load_config(&path),
                None => CrawlerConfigBuilder::new().build(),
            };
            fetch(&config, &url);
        }
    }
}

fn load_config(path: &str) -> CrawlerConfig {
    let document = match fs::read_to_string(path) {
        Ok(document) => document,
        Err(e) => {
            eprintln!("Error reading {}: {}", path, e);
            process::exit(1);
        }
    };

    let registry = StrategyRegistry::with_builtins();
    let mut builder = CrawlerConfigBuilder::new();
    if let Err(e) = builder.load(&document, &registry) {
        eprintln!("Error loading {}: {}", path, e);
        process::exit(1);
    }
    log::debug!("loaded configuration from {}", path);
    builder.build()
}

fn summarize(config: &CrawlerConfig) -> ConfigSummary {
    ConfigSummary {
        id: config.id().to_string(),
        user_agent: config.user_agent().map(str::to_string),
        max_depth: config.max_depth(),
        keep_downloads: config.keep_downloads(),
        start_urls: config.start_urls(),
        urls_files: config.urls_files(),
        slots: vec![
            SlotSummary {
                slot: "urlNormalizer",
                class: config.url_normalizer().map(|s| s.class_name().to_string()),
                ignored: None,
            },
            SlotSummary {
                slot: "delay",
                class: Some(config.delay_resolver().class_name().to_string()),
                ignored: None,
            },
            SlotSummary {
                slot: "httpClientFactory",
                class: Some(config.http_client_factory().class_name().to_string()),
                ignored: None,
            },
            SlotSummary {
                slot: "robotsTxt",
                class: Some(config.robots_txt_provider().class_name().to_string()),
                ignored: Some(config.ignore_robots_txt()),
            },
            SlotSummary {
                slot: "sitemap",
                class: Some(config.sitemap_resolver_factory().class_name().to_string()),
                ignored: Some(config.ignore_sitemap()),
            },
            SlotSummary {
                slot: "metadataFetcher",
                class: config.metadata_fetcher().map(|s| s.class_name().to_string()),
                ignored: None,
            },
            SlotSummary {
                slot: "metadataChecksummer",
                class: Some(config.metadata_checksummer().class_name().to_string()),
                ignored: None,
            },
            SlotSummary {
                slot: "documentFetcher",
                class: Some(config.document_fetcher().class_name().to_string()),
                ignored: None,
            },
            SlotSummary {
                slot: "robotsMeta",
                class: Some(config.robots_meta_provider().class_name().to_string()),
                ignored: Some(config.ignore_robots_meta()),
            },
            SlotSummary {
                slot: "urlExtractor",
                class: Some(config.url_extractor().class_name().to_string()),
                ignored: None,
            },
        ],
    }
}

fn print_summary(summary: &ConfigSummary) {
    println!("id:             {}", summary.id);
    println!(
        "userAgent:      {}",
        summary.user_agent.as_deref().unwrap_or("(unset)")
    );
    println!("maxDepth:       {}", summary.max_depth);
    println!("keepDownloads:  {}", summary.keep_downloads);
    println!("startURLs:      {}", summary.start_urls.len());
    println!("urlsFiles:      {}", summary.urls_files.len());
    for slot in &summary.slots {
        let class = slot.class.as_deref().unwrap_or("(unset)");
        match slot.ignored {
            Some(true) => println!("{:<15} {} (ignored)", format!("{}:", slot.slot), class),
            _ => println!("{:<15} {}", format!("{}:", slot.slot), class),
        }
    }
}

fn dump(config: &CrawlerConfig, json: bool) {
    if json {
        match serde_json::to_string_pretty(&summarize(config)) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Error serializing summary: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    let mut out = io::stdout();
    if let Err(e) = config.save(&mut out) {
        eprintln!("Error writing configuration: {}", e);
        process::exit(1);
    }
    let _ = out.flush();
}

fn fetch(config: &CrawlerConfig, url: &str) {
    let url = match Url::parse(url) {
        Ok(url) => url,
        Err(e) => {
            eprintln!("Error parsing URL: {}", e);
            process::exit(1);
        }
    };

    let client = match config.http_client_factory().create_client(config.user_agent()) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error creating HTTP client: {}", e);
            process::exit(1);
        }
    };

    let runtime = match Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error creating runtime: {}", e);
            process::exit(1);
        }
    };

    let fetcher = config.document_fetcher();
    let document = match runtime.block_on(fetcher.fetch(&client, &url)) {
        Ok(document) => document,
        Err(e) => {
            eprintln!("Error fetching {}: {}", url, e);
            process::exit(1);
        }
    };

    println!("url:          {}", document.url);
    println!(
        "contentType:  {}",
        document.content_type.as_deref().unwrap_or("(unknown)")
    );
    println!("content:      {} bytes", document.content.len());
    println!("metadata:     {} fields", document.metadata.len());
    match config.metadata_checksummer().checksum(&document.metadata) {
        Some(checksum) => println!("checksum:     {}", checksum),
        None => println!("checksum:     (none)"),
    }
}
