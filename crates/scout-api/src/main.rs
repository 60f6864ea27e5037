#[tokio::main]
async fn main() {
    if let Err(err) = scout_api::run().await {
        tracing::error!(error = %err, "scout-api failed");
        std::process::exit(1);
    }
}
