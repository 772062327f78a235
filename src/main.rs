#[tokio::main]
async fn main() -> anyhow::Result<()> {
    excel_assistant_lib::run().await
}
