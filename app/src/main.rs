mod bootstrap;
mod controllers;
mod identity;
mod models;
mod repositories;
mod routes;
mod services;
mod settings;

use clap::Parser;
use plume::config::load_dotenv;
use plume::database::DbConnection;
use plume::identity::Identity;
use plume::middleware::{
    Authenticate, DatabaseErrorPage, DeveloperExceptionPage, ExceptionHandler, LiveReload,
    StaticFiles,
};
use plume::routing::Dispatcher;
use plume::{ConfigurationBuilder, Environment, Pipeline, Server, StartupError};
use settings::AppConfiguration;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "blog", about = "Server-rendered blog")]
struct Cli {
    /// Directory holding the settings files and the public/ asset root.
    #[arg(long, default_value = ".")]
    content_root: PathBuf,
    /// Override the configured listen port.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("startup failed: {err}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), StartupError> {
    let env = Environment::detect();
    load_dotenv(&cli.content_root, &env);

    // Later sources override earlier ones; secrets only exist in development.
    let mut builder = ConfigurationBuilder::new(&cli.content_root)
        .add_json_file("appsettings.json", true)
        .add_json_file(&format!("appsettings.{}.json", env.name()), true)
        .add_env_vars();
    if env.is_development() {
        builder = builder.add_dev_secrets();
    }
    let config = builder.build()?;

    plume::logging::init(&config);
    tracing::info!(environment = %env, "starting blog");

    let settings: AppConfiguration = config.bind("AppConfiguration")?;
    let connection_string = config.require("ConnectionStrings:DefaultConnection")?;
    let db = DbConnection::connect(&connection_string).await?;

    let identity = bootstrap::build_identity(&db);
    let registry = bootstrap::build_registry(&settings, &db, identity.clone());
    let dispatcher = Arc::new(Dispatcher::new(routes::table()?, routes::actions(registry)));

    let pipeline = build_pipeline(&env, &cli.content_root, identity, dispatcher);

    let mut server = Server::new(pipeline).configure(&config);
    if let Some(port) = cli.port {
        server = server.port(port);
    }
    server.run().await
}

/// Assemble the middleware stack for one of the two startup profiles.
/// Order is fixed: error handling first (development adds the database
/// diagnostic and live-reload helpers), then static files, then
/// authentication, then dispatch.
fn build_pipeline(
    env: &Environment,
    content_root: &Path,
    identity: Arc<Identity>,
    dispatcher: Arc<Dispatcher>,
) -> Pipeline {
    let endpoint = move |req| {
        let dispatcher = dispatcher.clone();
        async move { dispatcher.dispatch(req).await }
    };
    let assets = content_root.join("public");

    if env.is_development() {
        Pipeline::new(endpoint)
            .through(DeveloperExceptionPage)
            .through(DatabaseErrorPage)
            .through(LiveReload)
            .through(StaticFiles::new(assets))
            .through(Authenticate::new(identity))
    } else {
        Pipeline::new(endpoint)
            .through(ExceptionHandler::new("/home/error"))
            .through(StaticFiles::new(assets))
            .through(Authenticate::new(identity))
    }
}
