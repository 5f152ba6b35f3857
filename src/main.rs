#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = gradecore_rust::run().await {
        eprintln!("gradecore fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
