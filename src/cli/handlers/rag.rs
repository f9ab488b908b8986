//! Search and question handlers

use crate::cli::output::*;
use crate::rag::RagService;
use crate::AppConfig;
use crate::Result;

pub async fn handle_search(config: &AppConfig, query: &str, limit: usize) -> Result<()> {
    let service = RagService::new(config)?;
    let hits = service.search(query, limit).await?;
    print_search_results(query, &hits);
    Ok(())
}

pub async fn handle_ask(config: &AppConfig, question: &str) -> Result<()> {
    let service = RagService::new(config)?;
    let response = service.answer(question).await?;

    println!("{}", response.format());

    let missing = response.places.iter().filter(|p| p.weather.is_none()).count();
    if missing > 0 {
        print_warning(&format!("Weather unavailable for {missing} place(s)"));
    }
    Ok(())
}
