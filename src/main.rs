use anyhow::Result;
use clap::Parser;
use polite_scrape::commands::{self, Config, FetchOptions, PageSource, parse_header, parse_seconds};
use polite_scrape::runtime::RealRuntime;
use std::path::PathBuf;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// polite-scrape - fetch web pages politely and pull data out of them
///
/// Requests go through one session that keeps cookies, waits at least
/// --delay seconds between requests, and retries network errors and
/// HTTP 429/500/502/503/504 with exponential backoff.
///
/// Examples:
///   polite-scrape basic https://example.com
///   polite-scrape select ".price" https://example.com/shop
///   polite-scrape tables --json --file saved.html
#[derive(Parser, Debug)]
#[command(author, version = env!("POLITE_SCRAPE_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    fetch: FetchArgs,

    /// Show debug logs, including request spans
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(clap::Args, Debug)]
struct FetchArgs {
    /// User-Agent header to send (defaults to a desktop browser string)
    #[arg(
        long = "user-agent",
        short = 'A',
        env = "POLITE_SCRAPE_USER_AGENT",
        value_name = "AGENT",
        global = true
    )]
    user_agent: Option<String>,

    /// Extra request header; may be repeated
    #[arg(
        long = "header",
        short = 'H',
        value_name = "NAME:VALUE",
        value_parser = parse_header,
        global = true
    )]
    headers: Vec<(String, String)>,

    /// Per-attempt timeout in seconds
    #[arg(
        long,
        env = "POLITE_SCRAPE_TIMEOUT",
        value_name = "SECS",
        default_value = "10",
        value_parser = parse_seconds,
        global = true
    )]
    timeout: Duration,

    /// Retries after the first attempt for transient failures
    #[arg(
        long,
        env = "POLITE_SCRAPE_RETRIES",
        value_name = "N",
        default_value_t = 3,
        global = true
    )]
    retries: u32,

    /// Base backoff in seconds; doubles with every retry
    #[arg(
        long,
        env = "POLITE_SCRAPE_BACKOFF",
        value_name = "SECS",
        default_value = "1",
        value_parser = parse_seconds,
        global = true
    )]
    backoff: Duration,

    /// Minimum seconds between consecutive requests
    #[arg(
        long,
        env = "POLITE_SCRAPE_DELAY",
        value_name = "SECS",
        default_value = "1",
        value_parser = parse_seconds,
        global = true
    )]
    delay: Duration,
}

impl From<FetchArgs> for FetchOptions {
    fn from(args: FetchArgs) -> Self {
        Self {
            user_agent: args.user_agent,
            headers: args.headers,
            timeout: args.timeout,
            retries: args.retries,
            backoff: args.backoff,
            delay: args.delay,
        }
    }
}

#[derive(clap::Args, Debug)]
struct SourceArgs {
    /// Page to fetch
    #[arg(value_name = "URL", required_unless_present = "file", conflicts_with = "file")]
    url: Option<String>,

    /// Read HTML from a local file instead of fetching
    #[arg(long, short = 'f', value_name = "PATH")]
    file: Option<PathBuf>,
}

impl SourceArgs {
    fn into_source(self) -> Result<PageSource> {
        match (self.url, self.file) {
            (_, Some(path)) => Ok(PageSource::File(path)),
            (Some(url), None) => Ok(PageSource::Url(url)),
            (None, None) => anyhow::bail!("either a URL or --file is required"),
        }
    }
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Fetch a URL and report status, content type and size
    Fetch {
        #[arg(value_name = "URL")]
        url: String,

        /// Write the response body to this file
        #[arg(long, short = 'o', value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Show the title, headings and paragraphs of a page
    Basic(SourceArgs),

    /// Show elements matching a CSS selector
    Select {
        #[arg(value_name = "SELECTOR")]
        selector: String,

        #[command(flatten)]
        source: SourceArgs,

        /// Print this attribute instead of the element text
        #[arg(long, value_name = "NAME")]
        attr: Option<String>,
    },

    /// List links and images with absolute URLs
    Links(SourceArgs),

    /// Extract HTML tables
    Tables {
        #[command(flatten)]
        source: SourceArgs,

        /// Print rows as JSON records keyed by header
        #[arg(long)]
        json: bool,
    },

    /// Show page metadata and cookies set by the site
    Meta(SourceArgs),

    /// Fetch several URLs in turn and print their titles
    Crawl {
        #[arg(value_name = "URL", required = true)]
        urls: Vec<String>,
    },

    /// Run every extractor over a bundled sample page (no network)
    Demo,
}

fn init_logging(verbose: bool) {
    if verbose {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new("polite_scrape=debug"))
            .with_writer(std::io::stderr)
            .init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_ctrl_c.cancel();
        }
    });

    let options = FetchOptions::from(cli.fetch);
    let mut config = Config::new(RealRuntime, &options)?.with_cancellation(cancel);

    match cli.command {
        Commands::Fetch { url, output } => {
            commands::fetch(&mut config, &url, output.as_deref()).await?
        }
        Commands::Basic(source) => commands::basic(&mut config, &source.into_source()?).await?,
        Commands::Select {
            selector,
            source,
            attr,
        } => {
            commands::select(
                &mut config,
                &source.into_source()?,
                &selector,
                attr.as_deref(),
            )
            .await?
        }
        Commands::Links(source) => commands::links(&mut config, &source.into_source()?).await?,
        Commands::Tables { source, json } => {
            commands::tables(&mut config, &source.into_source()?, json).await?
        }
        Commands::Meta(source) => commands::meta(&mut config, &source.into_source()?).await?,
        Commands::Crawl { urls } => {
            commands::crawl(&mut config, &urls).await?;
        }
        Commands::Demo => commands::demo()?,
    }
    Ok(())
}
