#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before any configuration is read
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: Error loading .env file: {}", e);
        }
    }

    medistaff::cli::run_cli().await
}
