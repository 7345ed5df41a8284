//! Subcommand execution

use crate::output;
use anyhow::{anyhow, Context, Result};
use clap::ArgMatches;
use gova_core::{AdminConfig, AdminController};
use gova_store::{GraphStore, MemoryStore, Neo4jStore, StoreError};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

/// Run the parsed command line, writing results to `out`
///
/// # Errors
/// Configuration, connection and store failures, with context
pub async fn run<W: Write>(matches: &ArgMatches, out: &mut W) -> Result<()> {
    let config = load_config(matches.get_one::<PathBuf>("config"))?;
    let memory = matches.get_flag("memory");
    let json = matches.get_flag("json");

    match matches.subcommand() {
        Some(("resources", _)) => {
            let registry = config.registry()?;
            output::write_resources(out, &registry, json)?;
        }
        Some(("list", args)) => {
            let resource = required(args, "resource")?;
            let config = match args.get_one::<usize>("limit") {
                Some(&limit) => config.with_fetch_limit(limit),
                None => config,
            };
            let admin = connect(&config, memory).await?;

            let outcome = admin.select_resource(resource)?.wait().await?;
            let outcome = outcome.with_context(|| format!("cannot fetch {resource} records"))?;
            tracing::debug!(?outcome, "list fetched");
            output::write_rows(out, &admin, json)?;
            admin.shutdown();
        }
        Some(("create", args)) => {
            let resource = required(args, "resource")?;
            let admin = connect(&config, memory).await?;

            // the listing is not needed here
            admin.select_resource(resource)?.abort();
            admin.open_create_form()?;
            for (attribute, value) in args.get_many::<(String, String)>("set").into_iter().flatten() {
                admin.set_field(attribute, value.as_str())?;
            }
            let form = admin.form().ok_or_else(|| anyhow!("create form closed unexpectedly"))?;

            admin
                .save()
                .await
                .with_context(|| format!("cannot create {resource} record"))?;
            output::write_created(out, form.resource_label(), &form.properties(), json)?;
            admin.shutdown();
        }
        Some((other, _)) => return Err(anyhow!("unknown command `{other}`")),
        None => return Err(anyhow!("no command given")),
    }
    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<AdminConfig> {
    let config = match path {
        Some(path) => AdminConfig::load(path)?,
        None => AdminConfig::new(),
    };
    Ok(config.with_env_overrides()?)
}

async fn connect(config: &AdminConfig, memory: bool) -> Result<AdminController> {
    let store: Arc<dyn GraphStore> = if memory {
        tracing::info!("using in-memory store");
        Arc::new(MemoryStore::new())
    } else {
        let store = Neo4jStore::connect(&config.store)
            .await
            .map_err(|err| startup_failure(err, &config.store.uri))?;
        Arc::new(store)
    };
    Ok(AdminController::from_config(config, store)?)
}

fn startup_failure(err: StoreError, uri: &str) -> anyhow::Error {
    let context = if err.is_fatal_at_startup() {
        format!("cannot connect to {uri}")
    } else {
        format!("store at {uri} failed its startup check")
    };
    anyhow::Error::new(err).context(context)
}

fn required<'a>(args: &'a ArgMatches, name: &str) -> Result<&'a str> {
    args.get_one::<String>(name)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("missing <{}>", name.to_uppercase()))
}
