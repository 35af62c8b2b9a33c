use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, builder::BoolishValueParser};

/// Command-line arguments for the snipcache binary.
#[derive(Debug, Parser)]
#[command(
    name = "snipcache",
    version,
    about = "Inspect and edit localized text snippets through the snippet cache"
)]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(
        long = "config-file",
        env = "SNIPCACHE_CONFIG_FILE",
        value_name = "PATH",
        global = true
    )]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: Overrides,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Print the text of a snippet for a language.
    Get(GetArgs),
    /// Print every language of a snippet as JSON.
    Show(KeyArgs),
    /// Create or update a snippet's default text.
    Put(PutArgs),
    /// Create or update a translation of a snippet.
    Translate(TranslateArgs),
    /// Remove one translation of a snippet.
    Untranslate(UntranslateArgs),
    /// Delete a snippet together with its translations.
    Delete(KeyArgs),
    /// List stored snippets.
    List(ListArgs),
    /// Apply pending database migrations.
    Migrate,
}

#[derive(Debug, Args, Clone)]
pub struct KeyArgs {
    /// Snippet key.
    #[arg(value_name = "KEY")]
    pub key: String,
}

#[derive(Debug, Args, Clone)]
pub struct GetArgs {
    /// Snippet key.
    #[arg(value_name = "KEY")]
    pub key: String,

    /// Language code; the default text is used when absent.
    #[arg(long, short = 'l', value_name = "CODE", default_value = "")]
    pub language: String,
}

#[derive(Debug, Args, Clone)]
pub struct PutArgs {
    /// Snippet key.
    #[arg(value_name = "KEY")]
    pub key: String,

    /// Default text.
    #[arg(value_name = "TEXT")]
    pub text: String,
}

#[derive(Debug, Args, Clone)]
pub struct TranslateArgs {
    /// Snippet key.
    #[arg(value_name = "KEY")]
    pub key: String,

    /// Language code such as `es` or `en-au`.
    #[arg(value_name = "CODE")]
    pub language: String,

    /// Translated text.
    #[arg(value_name = "TEXT")]
    pub text: String,
}

#[derive(Debug, Args, Clone)]
pub struct UntranslateArgs {
    /// Snippet key.
    #[arg(value_name = "KEY")]
    pub key: String,

    /// Language code of the translation to remove.
    #[arg(value_name = "CODE")]
    pub language: String,
}

#[derive(Debug, Args, Clone, Default)]
pub struct ListArgs {
    /// Case-insensitive filter on key and default text.
    #[arg(long, value_name = "TEXT")]
    pub search: Option<String>,

    /// Maximum number of snippets to print.
    #[arg(long, value_name = "COUNT")]
    pub limit: Option<u32>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct Overrides {
    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new(),
        global = true
    )]
    pub log_json: Option<bool>,

    /// Override the database connection URL.
    #[arg(long = "database-url", value_name = "URL", global = true)]
    pub database_url: Option<String>,

    /// Override the database pool size.
    #[arg(long = "database-max-connections", value_name = "COUNT", global = true)]
    pub database_max_connections: Option<u32>,

    /// Toggle the snippet cache.
    #[arg(
        long = "cache-enabled",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new(),
        global = true
    )]
    pub cache_enabled: Option<bool>,

    /// Override the number of snippets kept in memory.
    #[arg(long = "cache-capacity", value_name = "COUNT", global = true)]
    pub cache_capacity: Option<u64>,

    /// Override the namespace prepended to cache keys.
    #[arg(long = "cache-key-prefix", value_name = "PREFIX", global = true)]
    pub cache_key_prefix: Option<String>,

    /// Fall back from a regional language (`es-ar`) to its base (`es`).
    #[arg(
        long = "cache-fallback-to-base-language",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new(),
        global = true
    )]
    pub cache_fallback_to_base_language: Option<bool>,
}
