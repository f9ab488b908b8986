//! Index initialization

use std::time::Instant;

use crate::cli::output::*;
use crate::rag::RagService;
use crate::AppConfig;
use crate::Result;

pub async fn handle_init(config: &AppConfig) -> Result<()> {
    print_info(&format!("Loading catalog from {}", config.catalog_path()));
    let service = RagService::new(config)?;

    let started = Instant::now();
    let documents = service.build_index().await?;
    print_success(&format!(
        "Indexed {documents} places in {:.1}s",
        started.elapsed().as_secs_f64()
    ));
    Ok(())
}
