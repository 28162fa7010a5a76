#[tokio::main]
async fn main() -> anyhow::Result<()> {
    club_booking::run().await
}
