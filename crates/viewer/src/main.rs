use viewer::{start_viewer, ViewerConfig};

#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(why) = start_viewer(&ViewerConfig::from_env()).await {
        log::error!("viewer failed: {}", why);
    }
}
