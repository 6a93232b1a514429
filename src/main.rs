use actix_web::middleware::{Logger, NormalizePath};
use actix_web::{web, App, HttpServer};

use taskify::auth::TokenSigner;
use taskify::{config::Config, cors, db, routes};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env()?;
    let pool = db::connect(&config.database_url, &config.pool).await?;
    db::migrate(&pool).await?;

    // Registered for routes that opt into `BearerClaims`.
    let signer = web::Data::new(TokenSigner::new(&config.auth)?);
    let pool = web::Data::new(pool);

    log::info!("Starting Taskify server at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .app_data(pool.clone())
            .app_data(signer.clone())
            .wrap(NormalizePath::trim())
            .wrap(cors())
            .wrap(Logger::default())
            .configure(routes::config)
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await?;

    Ok(())
}
