#[tokio::main]
async fn main() -> anyhow::Result<()> {
    studylog_backend::run().await
}
