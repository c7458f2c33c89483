mod events;

use std::env;

use anyhow::Context as _;
use poise::serenity_prelude as serenity;
use tracing::{debug, error, info, warn};
use tracing_subscriber::Layer;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use rustls::crypto::ring::default_provider;
use sqlx::postgres::PgPoolOptions;

use kingdom_core::{Data, Error};
use kingdom_database::{CacheService, Database, MIGRATOR};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install rustls ring provider"))?;

    // Load the .env file
    dotenvy::dotenv().ok();

    let token = env::var("DISCORD_TOKEN").context("DISCORD_TOKEN is not set")?;
    let database_url = env::var("DATABASE_URL").context("DATABASE_URL is not set")?;

    // With DISCORD_GUILD_ID set, slash commands register in that guild only
    // (instant, good for development). Without it they register globally.
    let dev_guild_id = match env::var("DISCORD_GUILD_ID") {
        Ok(raw) => Some(
            raw.parse::<u64>()
                .context("DISCORD_GUILD_ID must be a guild id")?,
        ),
        Err(_) => None,
    };

    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;
    info!("PostgreSQL connection established.");

    let db = Database::with_cache(db_pool, connect_cache().await);

    if env_bool("AUTO_RUN_MIGRATIONS", true) {
        MIGRATOR.run(db.pool()).await?;
        info!("Database migrations applied.");
    } else {
        info!("Auto migrations disabled (set AUTO_RUN_MIGRATIONS=true to run at startup).");
    }

    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: kingdom_commands::commands(),
            event_handler: |ctx, event, framework, data| {
                Box::pin(handle_event(ctx, event, framework, data))
            },
            on_error: |error| Box::pin(on_error(error)),
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(kingdom_utils::COMMAND_PREFIX.to_string()),
                mention_as_prefix: false,
                ..Default::default()
            },
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            let db = db.clone();
            Box::pin(async move {
                info!("Kingdom has awoken!");

                match dev_guild_id {
                    Some(guild_id) => {
                        poise::builtins::register_in_guild(
                            ctx,
                            &framework.options().commands,
                            serenity::GuildId::new(guild_id),
                        )
                        .await?;
                        info!(guild_id, "Slash commands registered in guild.");
                    }
                    None => {
                        poise::builtins::register_globally(ctx, &framework.options().commands)
                            .await?;
                        info!("Slash commands registered globally.");
                    }
                }

                Ok(Data { db })
            })
        })
        .build();

    info!("Kingdom is connecting...");

    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await?;

    client.start().await?;
    Ok(())
}

fn init_tracing() {
    let fmt_layer = tracing_subscriber::fmt::layer().with_filter(filter_fn(|metadata| {
        if *metadata.level() > tracing::Level::INFO {
            return false;
        }

        let target = metadata.target();
        !(target.starts_with("serenity::gateway::bridge::shard_manager")
            || target.starts_with("serenity::gateway::bridge::shard_runner"))
    }));

    tracing_subscriber::registry().with(fmt_layer).init();
}

/// Cache setup never fails the boot; every broken path degrades to the
/// disabled backend.
async fn connect_cache() -> CacheService {
    let prefix = env::var("REDIS_KEY_PREFIX").unwrap_or_else(|_| "kingdom:prod".to_string());

    if !env_bool("REDIS_ENABLED", false) {
        info!("Redis cache disabled (set REDIS_ENABLED=true to enable).");
        return CacheService::disabled(prefix);
    }

    let Ok(redis_url) = env::var("REDIS_URL") else {
        warn!(key_prefix = %prefix, "REDIS_ENABLED=true but REDIS_URL is missing; continuing with DB-only mode.");
        return CacheService::disabled(prefix);
    };

    let cache = match CacheService::redis(&redis_url, prefix.clone()) {
        Ok(cache) => cache,
        Err(err) => {
            warn!(?err, key_prefix = %prefix, "Failed to initialize Redis cache; continuing with DB-only mode.");
            return CacheService::disabled(prefix);
        }
    };

    info!(key_prefix = %prefix, "Redis cache enabled.");

    if let Err(err) = cache.ping().await {
        warn!(?err, "Redis ping failed; reads will fall back to Postgres.");
    } else {
        info!("Redis cache health check passed.");
    }

    cache
}

fn env_bool(key: &str, default: bool) -> bool {
    env::var(key)
        .map(|value| {
            matches!(
                value.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            )
        })
        .unwrap_or(default)
}

async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!(?error, "command error");

            let embed = serenity::CreateEmbed::new()
                .title("Command failed")
                .description("That command hit an internal error. It has been logged.")
                .color(kingdom_utils::embed::DEFAULT_EMBED_COLOR);

            let _ = ctx
                .send(poise::CreateReply::default().ephemeral(true).embed(embed))
                .await;
        }
        poise::FrameworkError::ArgumentParse { ctx, input, .. } => {
            let usage = format!("Usage: `!{}`", ctx.command().qualified_name);
            let reply = match input {
                Some(input) => format!("Could not parse `{}`.\n{}", input, usage),
                None => format!("Missing a required argument.\n{}", usage),
            };

            let _ = ctx.say(reply).await;
        }
        poise::FrameworkError::UnknownCommand { .. } => {
            debug!("ignoring unknown command");
        }
        other => {
            error!(?other, "framework error");
        }
    }
}

async fn handle_event(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::Message { new_message } => {
            events::message_xp::handle_message_xp(ctx, data, new_message).await;
        }
        _ => {}
    }

    Ok(())
}
