use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use std::path::PathBuf;

use wxa_config::{ConfigLoader, ServiceConfig};
use wxa_core::Result;
use wxa_skills_service::SkillsClient;

mod keys;
mod serve;
pub mod simulate;
mod skills;

/// Toolkit for building secure Webex Assistant skills
#[derive(Parser)]
#[command(name = "wxa", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to wxa.toml config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level override (e.g. debug, info, warn, error)
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all log output (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an RSA key pair in PEM format
    GenerateKeys {
        /// File for the public key
        #[arg(long, default_value = "public.pem")]
        public: PathBuf,
        /// File for the private key
        #[arg(long, default_value = "private.pem")]
        private: PathBuf,
        /// RSA modulus size in bits
        #[arg(long, default_value_t = wxa_crypto::DEFAULT_KEY_BITS)]
        bits: usize,
        /// Overwrite existing key files
        #[arg(long)]
        force: bool,
    },
    /// Generate a random skill secret
    GenerateSecret,
    /// List skills registered on the skills service
    ListSkills {
        #[command(flatten)]
        service: ServiceArgs,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Register a new skill on the skills service
    CreateSkill {
        #[command(flatten)]
        service: ServiceArgs,
        #[command(flatten)]
        skill: skills::CreateSkillArgs,
    },
    /// Delete a skill from the skills service
    DeleteSkill {
        #[command(flatten)]
        service: ServiceArgs,
        /// Id of the skill to delete
        #[arg(long)]
        id: String,
        /// Remove the skill permanently instead of soft-deleting it
        #[arg(long)]
        hard: bool,
    },
    /// Run the echo skill
    Serve {
        /// Address to listen on (overrides server.listen)
        #[arg(short = 'L', long)]
        listen: Option<String>,
    },
    /// Send a signed, encrypted request to a running skill
    Simulate(simulate::SimulateArgs),
    /// Show version and build info
    Version,
    /// Generate shell completions for bash, zsh, or fish
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Credentials for the skills service. Flags win, then the environment, then `[service]`.
#[derive(Args, Debug, Clone, Default)]
pub(crate) struct ServiceArgs {
    /// Personal access token from developer.webex.com
    #[arg(long, env = "WXA_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Developer id (base64 decoded)
    #[arg(long, env = "WXA_DEVELOPER_ID")]
    developer_id: Option<String>,

    /// Skills service endpoint; the developer id is appended
    #[arg(long)]
    base_url: Option<String>,
}

impl ServiceArgs {
    pub(crate) fn client(&self, config: &ServiceConfig) -> Result<SkillsClient> {
        let developer_id = self
            .developer_id
            .clone()
            .or_else(|| config.developer_id.clone())
            .unwrap_or_default();
        let token = self
            .token
            .clone()
            .or_else(|| config.token.clone())
            .unwrap_or_default();

        let client = SkillsClient::new(developer_id.as_str(), token)?;
        match self.base_url.as_ref().or(config.base_url.as_ref()) {
            Some(base) => {
                let url = format!("{}/{}", base.trim_end_matches('/'), developer_id);
                Ok(client.with_base_url(url))
            }
            None => Ok(client),
        }
    }
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        // Load config first so we can use it for log format
        let config_loader = ConfigLoader::load(self.config.as_deref())?;
        let config = config_loader.get();

        // Resolve log level: --verbose > --quiet > --log-level > config
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            self.log_level
                .as_deref()
                .unwrap_or(config.logging.level.as_str())
        };

        // Logs go to stderr; stdout carries command output.
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));
        if config.logging.format == "json" {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .json()
                .with_target(true)
                .init();
        } else {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }

        match self.command {
            Commands::GenerateKeys {
                public,
                private,
                bits,
                force,
            } => keys::cmd_generate_keys(&public, &private, bits, force).await,
            Commands::GenerateSecret => keys::cmd_generate_secret(),
            Commands::ListSkills { service, json } => {
                skills::cmd_list_skills(service.client(&config.service)?, json).await
            }
            Commands::CreateSkill { service, skill } => {
                skills::cmd_create_skill(service.client(&config.service)?, skill).await
            }
            Commands::DeleteSkill { service, id, hard } => {
                skills::cmd_delete_skill(service.client(&config.service)?, &id, hard).await
            }
            Commands::Serve { listen } => serve::cmd_serve(config, listen).await,
            Commands::Simulate(args) => simulate::cmd_simulate(&config, args).await,
            Commands::Version => Self::cmd_version(),
            Commands::Completions { shell } => Self::cmd_completions(shell),
        }
    }

    fn cmd_version() -> Result<()> {
        println!("🗣️  wxa v{}", env!("CARGO_PKG_VERSION"));
        println!("   Rust edition: 2024");
        println!("   Target: {}", std::env::consts::ARCH);
        println!("   OS: {}", std::env::consts::OS);
        #[cfg(debug_assertions)]
        println!("   Profile: debug");
        #[cfg(not(debug_assertions))]
        println!("   Profile: release");
        Ok(())
    }

    fn cmd_completions(shell: Shell) -> Result<()> {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "wxa", &mut std::io::stdout());
        Ok(())
    }
}
