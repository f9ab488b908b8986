mod common;

use common::fixture;
use common::FixtureOptions;
use jejurag::JejuRagError;
use jejurag::Result;

#[tokio::test]
async fn test_search_ranks_matching_place_first() -> Result<()> {
    let fx = fixture(FixtureOptions::default())?;

    let hits = fx.service.search("바다 카페", 5).await?;
    assert_eq!(hits.len(), 5);
    assert_eq!(hits[0].document.metadata.name, "협재 해변");
    assert!(hits[0].score > hits[1].score);
    Ok(())
}

#[tokio::test]
async fn test_answer_enriches_places_and_grounds_prompt() -> Result<()> {
    let fx = fixture(FixtureOptions::default())?;

    let response = fx.service.answer("바다 카페").await?;
    assert_eq!(response.answer, "맑은 날에는 협재 해변을 추천합니다.");

    let names: Vec<_> = response.places.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["협재 해변", "좌표없는 카페", "국립제주박물관", "성산일출봉", "광치기해변"]
    );

    let hyeopjae = &response.places[0];
    assert_eq!(hyeopjae.region_label.as_deref(), Some("한림"));
    let weather = hyeopjae.weather.as_ref().expect("weather attached");
    assert_eq!(weather.temperature, 23);
    assert_eq!(weather.feels_like, 24);
    assert_eq!(weather.recommendation, "맑은 날씨라 야외 활동, 해변, 오름 트레킹을 추천합니다.");

    // No coordinates: listed but without weather
    assert!(response.places[1].weather.is_none());
    assert!(response.places[1].region_label.is_none());

    // Four distinct buckets among the enriched places
    assert_eq!(fx.weather.calls(), 4);

    let prompt = fx.generator.last_prompt().expect("prompt recorded");
    assert!(prompt.contains("[장소 1]\n장소명: 협재 해변"));
    assert!(prompt.contains("현재 날씨 (한림 지역): 23°C, 맑음 (체감 24°C)"));
    assert!(prompt.contains("[장소 5]"));
    assert!(prompt.ends_with("바다 카페"));
    Ok(())
}

#[tokio::test]
async fn test_repeat_question_reuses_cached_weather() -> Result<()> {
    let fx = fixture(FixtureOptions::default())?;

    fx.service.answer("바다 카페").await?;
    fx.service.answer("바다 카페").await?;
    assert_eq!(fx.weather.calls(), 4);
    Ok(())
}

#[tokio::test]
async fn test_weather_failure_degrades_single_place() -> Result<()> {
    let fx = fixture(FixtureOptions {
        fail_weather_latitudes: vec![33.46],
        ..FixtureOptions::default()
    })?;

    let response = fx.service.answer("바다 카페").await?;
    let seongsan = response
        .places
        .iter()
        .find(|p| p.name == "성산일출봉")
        .expect("still listed");
    assert!(seongsan.weather.is_none());
    assert!(response.places[0].weather.is_some());
    Ok(())
}

#[tokio::test]
async fn test_generation_failure_is_reported() -> Result<()> {
    let fx = fixture(FixtureOptions {
        fail_generation: true,
        ..FixtureOptions::default()
    })?;

    let err = fx.service.answer("바다 카페").await.unwrap_err();
    assert!(matches!(err, JejuRagError::Generation(_)));
    assert!(err.is_service_unavailable());
    Ok(())
}

#[tokio::test]
async fn test_index_build_failure_is_reported() -> Result<()> {
    let fx = fixture(FixtureOptions {
        fail_embedding: true,
        ..FixtureOptions::default()
    })?;

    let err = fx.service.answer("바다 카페").await.unwrap_err();
    assert!(matches!(err, JejuRagError::IndexBuild(_)));
    assert!(!fx.service.index().is_built().await);
    assert_eq!(fx.weather.calls(), 0);
    Ok(())
}

#[tokio::test]
async fn test_blank_question_is_rejected() -> Result<()> {
    let fx = fixture(FixtureOptions::default())?;

    let err = fx.service.answer("   ").await.unwrap_err();
    assert!(err.is_invalid_input());
    assert!(fx.generator.last_prompt().is_none());
    Ok(())
}
