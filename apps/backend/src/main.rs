#[tokio::main]
async fn main() -> anyhow::Result<()> {
    greek_cards_backend::run().await
}
