use stockhawk::{cli, utils};

#[tokio::main]
async fn main() {
    // .env is optional
    let _ = dotenvy::dotenv();
    utils::init_tracing();

    cli::run().await;
}
