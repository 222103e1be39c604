/*
 * Responsibility
 * - tokio runtime entry; all logic lives in app::run()
 */
use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    warden::app::run().await
}
