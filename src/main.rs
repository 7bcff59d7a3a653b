#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    memora_backend::run().await;
}
