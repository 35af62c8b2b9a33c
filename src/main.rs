use std::{process, sync::Arc};

use snipcache::{
    application::{
        error::AppError,
        repos::{SnippetQueryFilter, SnippetsRepo, SnippetsWriteRepo},
        snippets::{SaveSnippetCommand, SaveTranslationCommand, SnippetService},
    },
    cache::{CacheBackend, CacheConfig, DisabledBackend, MemoryBackend, SnippetCache},
    config,
    infra::{db::PostgresRepositories, error::InfraError, telemetry},
};
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(error.exit_code());
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt()
        .with_writer(std::io::stderr)
        .with_max_level(Level::ERROR)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| InfraError::configuration(format!("failed to load configuration: {err}")))?;

    telemetry::init(&settings.logging)?;

    let repositories = init_repositories(&settings).await?;
    if matches!(cli_args.command, config::Command::Migrate) {
        info!(target = "snipcache::migrate", "Database schema is up to date");
        return Ok(());
    }

    let app = build_application_context(repositories, &settings);

    match cli_args.command {
        config::Command::Get(args) => run_get(&app, args).await,
        config::Command::Show(args) => run_show(&app, args).await,
        config::Command::Put(args) => run_put(&app, args).await,
        config::Command::Translate(args) => run_translate(&app, args).await,
        config::Command::Untranslate(args) => run_untranslate(&app, args).await,
        config::Command::Delete(args) => run_delete(&app, args).await,
        config::Command::List(args) => run_list(&app, args).await,
        config::Command::Migrate => Ok(()),
    }
}

struct ApplicationContext {
    cache: Arc<SnippetCache>,
    snippets: SnippetService,
}

async fn init_repositories(
    settings: &config::Settings,
) -> Result<Arc<PostgresRepositories>, AppError> {
    let database_url = settings
        .database
        .url
        .as_ref()
        .ok_or_else(|| InfraError::configuration("database url is not configured"))?;

    let pool = PostgresRepositories::connect(database_url, settings.database.max_connections.get())
        .await
        .map_err(InfraError::from)?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(InfraError::from)?;

    Ok(Arc::new(PostgresRepositories::new(pool)))
}

fn build_application_context(
    repositories: Arc<PostgresRepositories>,
    settings: &config::Settings,
) -> ApplicationContext {
    let reader: Arc<dyn SnippetsRepo> = repositories.clone();
    let writer: Arc<dyn SnippetsWriteRepo> = repositories;

    let cache_config = CacheConfig::from(&settings.cache);
    let backend: Arc<dyn CacheBackend> = if cache_config.enabled {
        Arc::new(MemoryBackend::new(&cache_config))
    } else {
        info!(target = "snipcache::cache", "Snippet cache disabled; reading through to the store");
        Arc::new(DisabledBackend)
    };

    let cache = Arc::new(SnippetCache::new(cache_config, backend, reader.clone()));
    let snippets = SnippetService::new(reader, writer, cache.clone());

    ApplicationContext { cache, snippets }
}

async fn run_get(app: &ApplicationContext, args: config::GetArgs) -> Result<(), AppError> {
    match app.cache.resolve_text(&args.key, &args.language).await? {
        Some(text) => {
            println!("{text}");
            Ok(())
        }
        None => Err(AppError::not_found(args.key)),
    }
}

async fn run_show(app: &ApplicationContext, args: config::KeyArgs) -> Result<(), AppError> {
    let view = app
        .cache
        .view(&args.key)
        .await?
        .ok_or_else(|| AppError::not_found(args.key.as_str()))?;

    let rendered = serde_json::to_string_pretty(&view)
        .map_err(|err| AppError::unexpected(format!("failed to encode snippet: {err}")))?;
    println!("{rendered}");
    Ok(())
}

async fn run_put(app: &ApplicationContext, args: config::PutArgs) -> Result<(), AppError> {
    let record = app
        .snippets
        .save_snippet(SaveSnippetCommand {
            key: args.key,
            text: args.text,
        })
        .await?;
    println!("{}", record.key);
    Ok(())
}

async fn run_translate(
    app: &ApplicationContext,
    args: config::TranslateArgs,
) -> Result<(), AppError> {
    let record = app
        .snippets
        .save_translation(SaveTranslationCommand {
            key: args.key,
            language: args.language,
            text: args.text,
        })
        .await?;
    println!("{} ({})", record.snippet_key, record.language);
    Ok(())
}

async fn run_untranslate(
    app: &ApplicationContext,
    args: config::UntranslateArgs,
) -> Result<(), AppError> {
    app.snippets
        .delete_translation(&args.key, &args.language)
        .await?;
    Ok(())
}

async fn run_delete(app: &ApplicationContext, args: config::KeyArgs) -> Result<(), AppError> {
    app.snippets.delete_snippet(&args.key).await?;
    Ok(())
}

async fn run_list(app: &ApplicationContext, args: config::ListArgs) -> Result<(), AppError> {
    let filter = SnippetQueryFilter {
        search: args.search,
        limit: args.limit,
    };

    for record in app.snippets.list(&filter).await? {
        let translations = app.snippets.translations(&record.key).await?;
        let languages: Vec<&str> = translations
            .iter()
            .map(|translation| translation.language.as_str())
            .collect();
        if languages.is_empty() {
            println!("{}\t{}", record.key, record.text);
        } else {
            println!("{}\t{}\t[{}]", record.key, record.text, languages.join(", "));
        }
    }
    Ok(())
}
