use archive_pages::{config, output, pages, registry::PageTable, source};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "archive-pages")]
#[command(about = "Plan archive and detail pages from CMS query results")]
#[command(long_about = "\
Plan archive and detail pages from CMS query results

The site's GraphQL queries are resolved by the host generator and saved as
one JSON document. archive-pages reads it and writes the page table the
generator registers: one detail page per item, and a paginated archive per
collection.

Query results layout:

  {
    \"settings\":    { \"data\": { \"wp\": { \"readingSettings\": { \"postsPerPage\": 10 } } } },
    \"collections\": {
      \"blogs\":        { \"data\": { \"allWpPost\": { \"edges\": [ { \"node\": { \"id\", \"uri\" } } ] } } },
      \"comics\":       { ... },
      \"comic-detail\": { ... }
    }
  }

Archive paths: the first page is the route itself (blogs), later pages are
numbered (blogs/2, blogs/3, ...). A missing postsPerPage means one item per
page. Any query error aborts the run.

Run 'archive-pages gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Query results document
    #[arg(long, default_value = "queries.json", global = true)]
    source: PathBuf,

    /// Directory containing config.toml
    #[arg(long, default_value = ".", global = true)]
    config: PathBuf,

    /// Page table output file
    #[arg(long, default_value = "pages.json", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Read the query results and list the content they contain
    Scan,
    /// Plan all pages and write the page table
    Plan,
    /// Validate config and query results without writing anything
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Scan => {
            let site_config = config::load_config(&cli.config)?;
            let source = source::load(&cli.source, &site_config)?;
            output::print_scan_output(&source);
        }
        Command::Plan => {
            let site_config = config::load_config(&cli.config)?;
            init_thread_pool(&site_config.processing);

            println!("==> Stage 1: Reading {}", cli.source.display());
            let source = source::load(&cli.source, &site_config)?;
            output::print_scan_output(&source);

            println!("==> Stage 2: Planning pages");
            let table = plan_and_print(&source, &site_config)?;
            table.write_json(&cli.output)?;

            println!("==> Page table written: {}", cli.output.display());
        }
        Command::Check => {
            let site_config = config::load_config(&cli.config)?;
            init_thread_pool(&site_config.processing);
            println!("==> Checking {}", cli.source.display());
            let source = source::load(&cli.source, &site_config)?;
            plan_and_print(&source, &site_config)?;
            println!("==> Content is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Plan pages while a printer thread streams progress events.
fn plan_and_print(
    source: &source::Source,
    site_config: &config::SiteConfig,
) -> Result<PageTable, Box<dyn std::error::Error>> {
    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            for line in output::format_plan_event(&event) {
                println!("{}", line);
            }
        }
    });
    let result = pages::plan_table(source, site_config, Some(tx));
    printer
        .join()
        .map_err(|_| "progress printer thread panicked")?;
    let (summary, table) = result?;
    output::print_plan_output(&summary, &table);
    Ok(table)
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; the user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
