pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand};
#[cfg(feature = "cli")]
use toml_config::AuditConfig;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "clause-audit")]
#[command(about = "Check contract clauses against statute provisions with a local language model")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[command(flatten)]
    pub overrides: Overrides,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Compare the configured contract against the statute and save the results
    Batch {
        /// Also write the results as TSV next to the JSON file
        #[arg(long)]
        tsv: bool,
    },
    /// Load a contract, preview it and compare on demand
    Interactive,
}

/// 命令列覆蓋設定，優先於 TOML
#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Args)]
pub struct Overrides {
    #[arg(long, global = true)]
    pub statute: Option<String>,

    #[arg(long, global = true)]
    pub contract: Option<String>,

    #[arg(long, global = true)]
    pub output: Option<String>,

    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Provision prefixes to compare, e.g. --prefix §3,§5
    #[arg(long = "prefix", global = true, value_delimiter = ',')]
    pub prefixes: Vec<String>,
}

#[cfg(feature = "cli")]
impl Overrides {
    pub fn apply(&self, config: &mut AuditConfig) {
        if let Some(statute) = &self.statute {
            config.statute.path = statute.clone();
        }
        if let Some(contract) = &self.contract {
            config.contract.path = contract.clone();
        }
        if let Some(output) = &self.output {
            config.output.path = output.clone();
        }
        if let Some(endpoint) = &self.endpoint {
            config.model.endpoint = endpoint.clone();
        }
        if let Some(model) = &self.model {
            config.model.model = model.clone();
        }
        if !self.prefixes.is_empty() {
            config.statute.allowed_prefixes = self.prefixes.clone();
        }
    }
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 讀取 TOML（若有指定）並套用命令列覆蓋
    pub fn resolve(&self) -> crate::utils::error::Result<AuditConfig> {
        let mut config = match &self.config {
            Some(path) => AuditConfig::from_file(path)?,
            None => AuditConfig::default(),
        };
        self.overrides.apply(&mut config);
        if let Command::Batch { tsv: true } = self.command {
            config.output.write_tsv = true;
        }
        Ok(config)
    }
}
