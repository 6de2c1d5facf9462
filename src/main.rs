use std::{env, process, sync::Arc};

use tracing::{error, warn};

use riftsquad::{
    config::Config, db, error::AppError, logging, matchmaking::MatchmakingService,
    riot::client::ApiClient,
};

#[tokio::main]
async fn main() {
    logging::init();

    if let Err(err) = run().await {
        error!("fatal: {err}");
        process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    let config = Config::from_env()?;

    let pool = db::connect(&config.database_url).await?;
    db::migrations::run_migrations(&pool).await?;

    let api = Arc::new(ApiClient::new(&config));
    let service = MatchmakingService::new(api, db::Repository::new(pool));

    if let Err(err) = service.catalog().warm().await {
        warn!("champion catalog warm-up failed, falling back to live lookups: {err}");
    }

    let mut args = env::args().skip(1);
    let (command, name) = match (args.next(), args.next()) {
        (Some(command), Some(name)) => (command, name),
        _ => usage(),
    };

    match command.as_str() {
        "classify" => {
            let classification = service.classification(&name).await?;
            let json = serde_json::to_string_pretty(&*classification)
                .expect("classification serializes");
            println!("{json}");
        }
        "create" => match service.create_team(&name).await {
            Ok(team) => println!("Team {} created, you are the leader.", team.id),
            Err(err) if err.is_user_facing() => println!("{err}"),
            Err(err) => return Err(err),
        },
        "join" => match service.request_team(&name).await {
            Ok(outcome) => println!("{}", outcome.message),
            Err(err) if err.is_user_facing() => println!("{err}"),
            Err(err) => return Err(err),
        },
        _ => usage(),
    }

    Ok(())
}

fn usage() -> ! {
    eprintln!("usage: riftsquad <classify|create|join> <summoner name>");
    process::exit(2);
}
