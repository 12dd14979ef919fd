//! Subnet registry OpenAPI CLI
//!
//! Command-line interface for aggregating subnet API descriptions into one
//! OpenAPI document and importing OpenAPI documents as new subnets.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use registry_openapi_checker::{
    generate_test_cases, CheckConfig, Outcome, ReqwestTransport, TestRunner, DEFAULT_RETRY_COUNT,
    DEFAULT_TIMEOUT_MS,
};
use registry_openapi_collector::{Collection, DirectoryExampleSource, ProviderCollector};
use registry_openapi_common::{EndpointDescriptor, ProviderId};
use registry_openapi_generator::{generate_to_file, DocsConfig, ProviderWriter, PROVIDER_FILE};
use registry_openapi_parser::{import_openapi, PathMap};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "registry-openapi")]
#[command(version, about = "Aggregate subnet API descriptions into OpenAPI, and back", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one OpenAPI document from every subnet in the registry
    #[command(after_help = "EXAMPLES:\n  \
        # Generate docs with the built-in header\n  \
        registry-openapi generate --subnets ./subnets --output ./docs/openapi.json\n\n  \
        # Override title and servers from a config file\n  \
        registry-openapi generate --subnets ./subnets --config docs.yml")]
    Generate {
        /// Registry root containing numbered subnet directories
        #[arg(short, long, default_value = "./subnets")]
        subnets: PathBuf,

        /// Output file
        #[arg(short, long, default_value = "./openapi.json")]
        output: PathBuf,

        /// YAML file overriding the document header
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Add or update a subnet from an OpenAPI document
    #[command(after_help = "EXAMPLES:\n  \
        # Import from a URL\n  \
        registry-openapi add-subnet 22 https://apis.datura.ai/openapi.json\n\n  \
        # Import from a file, shortening paths\n  \
        registry-openapi add-subnet 22 ./subnet22_openapi.json \\\n    \
        --path-map '{\"desearch/ai/search\": \"search\"}'")]
    AddSubnet {
        /// Subnet ID (e.g., 22)
        subnet_id: String,

        /// OpenAPI document URL or file path
        source: String,

        /// JSON object mapping OpenAPI path fragments to registry path fragments
        #[arg(long)]
        path_map: Option<String>,

        /// Registry root containing numbered subnet directories
        #[arg(short, long, default_value = "./subnets")]
        subnets: PathBuf,
    },

    /// Send each curated request example through the live API and check the replies
    #[command(after_help = "EXAMPLES:\n  \
        # Check every subnet with curated examples\n  \
        BITMIND_API_TOKEN=... registry-openapi check --base-url https://api.bitmind.ai/oracle/v1\n\n  \
        # Show the cases for one subnet without sending anything\n  \
        registry-openapi check --subnet 34 --dry-run")]
    Check {
        /// Registry root containing numbered subnet directories
        #[arg(short, long, default_value = "./subnets")]
        subnets: PathBuf,

        /// Only check this subnet
        #[arg(long)]
        subnet: Option<String>,

        /// Aggregated API root
        #[arg(long, env = "BITMIND_API_BASE_URL", default_value = "")]
        base_url: String,

        /// Bearer token for the aggregated API
        #[arg(long, env = "BITMIND_API_TOKEN", default_value = "", hide_env_values = true)]
        token: String,

        /// Per-request timeout in milliseconds
        #[arg(long, env = "TEST_TIMEOUT_MS", default_value_t = DEFAULT_TIMEOUT_MS)]
        timeout_ms: u64,

        /// Attempts per check; only server errors are retried
        #[arg(long, env = "TEST_RETRY_COUNT", default_value_t = DEFAULT_RETRY_COUNT)]
        retries: u32,

        /// List the cases without sending requests
        #[arg(long)]
        dry_run: bool,
    },

    /// List the subnets and endpoints found in the registry
    List {
        /// Registry root containing numbered subnet directories
        #[arg(short, long, default_value = "./subnets")]
        subnets: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Generate {
            subnets,
            output,
            config,
        } => {
            generate_command(&subnets, &output, config.as_deref(), cli.verbose)?;
        }
        Commands::AddSubnet {
            subnet_id,
            source,
            path_map,
            subnets,
        } => {
            add_subnet_command(&subnet_id, &source, path_map.as_deref(), &subnets)?;
        }
        Commands::Check {
            subnets,
            subnet,
            base_url,
            token,
            timeout_ms,
            retries,
            dry_run,
        } => {
            let mut config = CheckConfig::new(base_url, token);
            config.timeout_ms = timeout_ms;
            config.retry_count = retries;
            check_command(&subnets, subnet.as_deref(), config, dry_run)?;
        }
        Commands::List { subnets } => {
            list_command(&subnets, cli.verbose)?;
        }
    }

    Ok(())
}

/// Diagnostics go to stderr; `RUST_LOG` overrides the level
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "warn,registry_openapi=debug,registry_openapi_common=debug,registry_openapi_parser=debug,registry_openapi_generator=debug,registry_openapi_collector=debug"
    } else {
        "warn"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn collect(subnets: &Path) -> Result<Collection> {
    println!("{} Scanning registry: {}", "→".cyan(), subnets.display());
    let collection = ProviderCollector::new(subnets)
        .collect()
        .with_context(|| format!("Failed to read registry at {}", subnets.display()))?;

    for skipped in &collection.skipped {
        println!(
            "{} Skipped {}: {}",
            "⚠".yellow(),
            skipped.path.display(),
            skipped.reason
        );
    }
    Ok(collection)
}

fn generate_command(
    subnets: &Path,
    output: &Path,
    config_path: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    let config = match config_path {
        Some(path) => {
            println!("{} Loading config: {}", "→".cyan(), path.display());
            DocsConfig::from_file(path).context("Failed to load docs config")?
        }
        None => DocsConfig::default(),
    };

    let collection = collect(subnets)?;
    let examples = DirectoryExampleSource::new(subnets);

    println!("{} Generating OpenAPI document", "→".cyan());
    let document = generate_to_file(&collection.providers, &examples, config, output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    if verbose {
        for path in document.paths.keys() {
            println!("  • {}", path.cyan());
        }
    }

    println!("\n{}", "✓ Generation successful!".green().bold());
    println!("  Subnets: {}", collection.providers.len());
    println!("  Paths: {}", document.paths.len());
    println!("  Skipped files: {}", collection.skipped.len());
    println!("  Output: {}", output.display().to_string().yellow());

    Ok(())
}

fn add_subnet_command(
    subnet_id: &str,
    source: &str,
    path_map: Option<&str>,
    subnets: &Path,
) -> Result<()> {
    let Ok(id) = subnet_id.parse::<ProviderId>() else {
        bail!("Subnet ID must be numeric, got '{}'", subnet_id);
    };
    let path_map = match path_map {
        Some(json) => PathMap::from_json(json)
            .with_context(|| format!("Invalid JSON in --path-map: {}", json))?,
        None => PathMap::default(),
    };

    println!("{} Adding subnet {} from {}", "→".cyan(), id, source);
    if source.starts_with("http") {
        println!("{} Fetching OpenAPI from URL", "→".cyan());
    } else {
        println!("{} Loading OpenAPI from file", "→".cyan());
    }

    let imported = import_openapi(source, path_map)
        .with_context(|| format!("Failed to import OpenAPI document from {}", source))?;

    let provider_dir = ProviderWriter::new(subnets)
        .write(id, &imported)
        .with_context(|| format!("Failed to write subnet {}", id))?;

    println!(
        "{} API YAML written to {}",
        "✓".green(),
        provider_dir.join(PROVIDER_FILE).display()
    );
    for endpoint in &imported.document.endpoints {
        println!("  • Generated examples for {}", endpoint.path.cyan());
    }
    println!("\n{}", "✓ Conversion completed successfully!".green().bold());

    Ok(())
}

fn check_command(
    subnets: &Path,
    subnet: Option<&str>,
    config: CheckConfig,
    dry_run: bool,
) -> Result<()> {
    let only = subnet
        .map(|id| id.parse::<ProviderId>())
        .transpose()
        .context("Invalid --subnet")?;

    let collection = collect(subnets)?;
    let examples = DirectoryExampleSource::new(subnets);
    let cases = generate_test_cases(&collection.providers, &examples, only);
    println!("{} Generated {} checks", "→".cyan(), cases.len());

    if dry_run {
        for case in &cases {
            let expected = if case.expected_response.is_some() {
                "with expected response"
            } else {
                "no expected response"
            };
            println!(
                "  • {} {}{} ({})",
                case.endpoint.method.as_str().cyan(),
                case.provider,
                case.endpoint.path,
                expected
            );
        }
        return Ok(());
    }

    if config.base_url.is_empty() {
        bail!("--base-url (or BITMIND_API_BASE_URL) is required");
    }
    if config.api_token.is_empty() {
        bail!("--token (or BITMIND_API_TOKEN) is required");
    }

    let transport = ReqwestTransport::new(&config).context("Failed to set up HTTP client")?;
    let results = TestRunner::new(transport, config).run(&cases);

    for result in &results {
        let label = format!("{} /{}{}", result.method, result.provider, result.path);
        match &result.outcome {
            Outcome::Passed => println!(
                "  {} {} ({} ms)",
                "✓".green(),
                label,
                result.elapsed.as_millis()
            ),
            Outcome::Failed(reason) => println!("  {} {}: {}", "✗".red(), label, reason),
            Outcome::Skipped(reason) => println!("  {} {}: {}", "⚠".yellow(), label, reason),
        }
    }

    let passed = results.iter().filter(|r| r.passed()).count();
    let failed = results.iter().filter(|r| r.failed()).count();
    println!(
        "\n  Passed: {}  Failed: {}  Skipped: {}",
        passed,
        failed,
        results.len() - passed - failed
    );

    if failed > 0 {
        bail!("{} of {} checks failed", failed, results.len());
    }
    println!("\n{}", "✓ All checks passed!".green().bold());
    Ok(())
}

fn list_command(subnets: &Path, verbose: bool) -> Result<()> {
    let mut collection = collect(subnets)?;
    collection.providers.sort_by_key(|provider| provider.id);

    println!("\n{}", "Subnets:".bold());
    for provider in &collection.providers {
        let label = provider.tag_name().unwrap_or_default();
        println!(
            "  {} {} ({} endpoints)",
            provider.id.to_string().yellow(),
            label,
            provider.endpoints.len()
        );
        if verbose && !provider.base_url.is_empty() {
            println!("    Base URL: {}", provider.base_url);
        }

        for raw in &provider.endpoints {
            match serde_json::from_value::<EndpointDescriptor>(raw.clone()) {
                Ok(endpoint) => println!(
                    "    • {} {}",
                    endpoint.method.as_str().cyan(),
                    endpoint.path
                ),
                Err(e) => println!("    {} malformed endpoint: {}", "⚠".yellow(), e),
            }
        }
    }

    Ok(())
}
