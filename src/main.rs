use anyhow::{Context, Result};
use clap::Parser;
use dadata::config::DEFAULT_API_URL;
use dadata::suggest::DEFAULT_COUNT;
use dadata::{ClientConfig, Credentials, DaData, ProviderErrorPolicy, Suggest};
use std::time::Duration;

/// dadata - DaData address suggestions from the command line
///
/// Credentials are read from DADATA_API_TOKEN and DADATA_SECRET_KEY unless
/// given explicitly.
///
/// Examples:
///   dadata suggest "москва тверская"     # Up to 10 address suggestions
///   dadata find 7700000000000            # Address for a KLADR/FIAS code
#[derive(Parser, Debug)]
#[command(author, version = env!("DADATA_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// API token
    #[arg(long, env = "DADATA_API_TOKEN", hide_env_values = true, global = true)]
    token: Option<String>,

    /// API secret
    #[arg(long, env = "DADATA_SECRET_KEY", hide_env_values = true, global = true)]
    secret: Option<String>,

    /// Suggestion API base URL
    #[arg(
        long = "api-url",
        env = "DADATA_API_URL",
        value_name = "URL",
        default_value = DEFAULT_API_URL,
        global = true
    )]
    api_url: String,

    /// Pause between attempts, in milliseconds
    #[arg(
        long = "retry-delay-ms",
        env = "DADATA_RETRY_DELAY_MS",
        value_name = "MS",
        default_value_t = 5000,
        global = true
    )]
    retry_delay_ms: u64,

    /// Fail instead of printing nothing when the service keeps returning errors
    #[arg(long, global = true)]
    strict: bool,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Suggest addresses for a partial address
    Suggest(SuggestArgs),

    /// Find an address by KLADR or FIAS code
    Find(FindArgs),
}

#[derive(clap::Args, Debug)]
struct SuggestArgs {
    /// Partial address
    query: String,

    /// Maximum number of suggestions
    #[arg(
        long,
        short = 'n',
        default_value_t = DEFAULT_COUNT,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    count: u32,
}

#[derive(clap::Args, Debug)]
struct FindArgs {
    /// KLADR or FIAS code
    #[arg(value_name = "ID")]
    id: String,
}

impl Cli {
    fn client(&self) -> Result<DaData> {
        let token = self
            .token
            .clone()
            .context("Missing API token. Pass --token or set DADATA_API_TOKEN.")?;
        let secret = self
            .secret
            .clone()
            .context("Missing API secret. Pass --secret or set DADATA_SECRET_KEY.")?;

        let provider_errors = if self.strict {
            ProviderErrorPolicy::Fail
        } else {
            ProviderErrorPolicy::Degrade
        };
        let config = ClientConfig::default()
            .with_api_url(&self.api_url)
            .with_retry_delay(Duration::from_millis(self.retry_delay_ms))
            .with_provider_errors(provider_errors);

        DaData::with_config(&Credentials::new(token, secret), config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let client = cli.client()?;

    match &cli.command {
        Commands::Suggest(args) => {
            for address in client.suggest_address(&args.query, args.count).await? {
                println!("{}", address.to_json()?);
            }
        }
        Commands::Find(args) => match client.find_address_by_id(&args.id).await? {
            Some(address) => println!("{}", address.to_json()?),
            None => anyhow::bail!("No address found for '{}'", args.id),
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_suggest_parsing() {
        let cli = Cli::try_parse_from(["dadata", "suggest", "москва"]).unwrap();
        match cli.command {
            Commands::Suggest(args) => {
                assert_eq!(args.query, "москва");
                assert_eq!(args.count, 10);
            }
            _ => panic!("Expected Suggest command"),
        }
    }

    #[test]
    fn test_cli_suggest_count() {
        let cli = Cli::try_parse_from(["dadata", "suggest", "москва", "-n", "3"]).unwrap();
        match cli.command {
            Commands::Suggest(args) => assert_eq!(args.count, 3),
            _ => panic!("Expected Suggest command"),
        }
    }

    #[test]
    fn test_cli_suggest_zero_count_fails() {
        let result = Cli::try_parse_from(["dadata", "suggest", "москва", "--count", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_find_parsing() {
        let cli = Cli::try_parse_from(["dadata", "find", "7700000000000"]).unwrap();
        match cli.command {
            Commands::Find(args) => assert_eq!(args.id, "7700000000000"),
            _ => panic!("Expected Find command"),
        }
    }

    #[test]
    fn test_cli_global_options() {
        let cli = Cli::try_parse_from([
            "dadata",
            "--api-url",
            "http://localhost:1234",
            "find",
            "1",
            "--retry-delay-ms",
            "0",
            "--token",
            "t",
            "--secret",
            "s",
        ])
        .unwrap();

        assert_eq!(cli.api_url, "http://localhost:1234");
        assert_eq!(cli.retry_delay_ms, 0);
        assert_eq!(cli.token.as_deref(), Some("t"));

        let client = cli.client().unwrap();
        assert_eq!(client.config().api_url, "http://localhost:1234");
        assert_eq!(client.config().retry.delay, Duration::ZERO);
    }

    #[test]
    fn test_cli_no_subcommand_fails() {
        let result = Cli::try_parse_from(["dadata", "москва"]);
        assert!(result.is_err());
    }
}
