//! End-to-end runs of the fetch, parse and query pipeline against a mock server.

#![allow(clippy::unwrap_used, clippy::panic, clippy::float_cmp)]

use std::sync::Arc;

use radmon_core::{
    Catalog, Config, Error, Monitor, RegionId, aggregate, network_mean, region_summary,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Радиационный мониторинг</title>
    <item><title>Брест</title><rad>0.09</rad></item>
    <item><title>Витебск</title><rad>0.15</rad></item>
    <item><title>Гомель</title><rad>0.30</rad></item>
    <item><title>Гродно</title><rad>0.07</rad></item>
  </channel>
</rss>"#;

const PAGE: &str = r#"<html><head><script>if (a < b) { render(); }</script></head>
<body>
  <div class="content">
    <p>Радиационная обстановка на территории Республики Беларусь стабильная. Уровни
    мощности дозы соответствуют установившимся многолетним значениям доцифры не
    превышают уровней естественного радиационного фона и загрязнения.</p>
  </div>
</body></html>"#;

async fn mount(server: &MockServer, route: &str, body: &str, hits: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(hits)
        .mount(server)
        .await;
}

fn config_for(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.sources.readings_url = format!("{}/radiation.xml", server.uri());
    config.sources.narrative_url = format!("{}/monitoring/radiation", server.uri());
    config
}

#[tokio::test]
async fn test_end_to_end_scenario() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount(&server, "/radiation.xml", FEED, 1).await;

    let monitor = Monitor::new(&config_for(&server))?;
    let reading = monitor.readings().await.unwrap();

    assert_eq!(reading.len(), 4);
    assert_eq!(reading.get("Брест"), Some(0.09));
    assert_eq!(reading.get("Гродно"), Some(0.07));
    assert!(!reading.contains("Радиационный мониторинг"));
    assert!((network_mean(&reading)? - 0.1525).abs() < 1e-12);

    let closest = monitor.nearest(52.12, 23.80)?;
    assert_eq!(closest.station, "Брест");
    assert!((closest.distance_m - 5157.185).abs() <= 1e-3, "{}", closest.distance_m);

    // Second query inside the lifetime is served from the cache (`expect(1)` above).
    let again = monitor.readings().await.unwrap();
    assert_eq!(again, reading);
    Ok(())
}

#[tokio::test]
async fn test_region_tables_from_fetched_snapshot() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount(&server, "/radiation.xml", FEED, 1).await;

    let monitor = Monitor::new(&config_for(&server))?;
    let reading = monitor.readings().await.unwrap();
    let catalog = monitor.catalog();

    let brest = catalog.region_by_id(RegionId::Brest).unwrap();
    let summary = region_summary(brest, &reading)?;
    assert_eq!(summary.rows.len(), 1);
    assert_eq!(summary.rows[0].station, "Брест");
    assert_eq!(summary.rows[0].label, "Брест...............");
    assert_eq!(summary.mean, 0.09);

    let minsk = catalog.region_by_id(RegionId::Minsk).unwrap();
    assert!(matches!(
        region_summary(minsk, &reading),
        Err(Error::EmptyAggregation { .. })
    ));

    let regions: Vec<_> = aggregate::station_table(catalog, &reading)
        .into_iter()
        .map(|summary| summary.region)
        .collect();
    assert_eq!(
        regions,
        [
            "Брестская область",
            "Витебская область",
            "Гомельская область",
            "Гродненская область"
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_narrative_is_cleaned_and_cached() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount(&server, "/monitoring/radiation", PAGE, 1).await;

    let monitor = Monitor::new(&config_for(&server))?;
    let status = monitor.narrative().await.unwrap();

    assert!(status.starts_with("Радиационная обстановка"));
    assert!(status.ends_with("загрязнения."));
    assert!(status.contains("значениям до цифры не"));
    assert!(!status.contains("доцифры"));
    assert!(!status.contains('\n'));

    assert_eq!(monitor.narrative().await.unwrap(), status);
    Ok(())
}

#[tokio::test]
async fn test_custom_catalog_drops_unknown_stations() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount(&server, "/radiation.xml", FEED, 1).await;

    let catalog = Catalog::builder()
        .region("Запад")
        .station("Брест", 52.0976, 23.7341)
        .station("Гродно", 53.6884, 23.8258)
        .build()?;
    let monitor = Monitor::with_catalog(&config_for(&server), Arc::new(catalog))?;

    let reading = monitor.readings().await.unwrap();
    assert_eq!(reading.len(), 2);
    assert!(!reading.contains("Гомель"));

    let west = region_summary(monitor.catalog().region("Запад").unwrap(), &reading)?;
    assert!((west.mean - 0.08).abs() < 1e-12);
    Ok(())
}

#[tokio::test]
async fn test_unreachable_source_yields_no_data() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    let mut config = config_for(&server);
    // Nothing mounted: every request gets a 404.
    config.sources.narrative_url = format!("{}/missing", server.uri());

    let monitor = Monitor::new(&config)?;
    assert!(monitor.readings().await.is_none());
    assert!(monitor.narrative().await.is_none());
    assert!(matches!(
        monitor.try_narrative().await,
        Err(Error::UnexpectedStatus { status: 404, .. })
    ));
    Ok(())
}
