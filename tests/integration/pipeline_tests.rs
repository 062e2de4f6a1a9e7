use super::*;
use monito_scraper::core::selectors;
use monito_scraper::models::{PricingGroup, ProviderRecord};
use monito_scraper::{scrape_monito, TransferQuery};

fn pricing(fee: f64, exchange_rate: f64, recipient_gets: f64) -> PricingGroup {
    PricingGroup {
        fee,
        exchange_rate,
        recipient_gets,
    }
}

fn find<'a>(providers: &'a [ProviderRecord], name: &str) -> &'a ProviderRecord {
    providers
        .iter()
        .find(|p| p.name == name)
        .unwrap_or_else(|| panic!("provider {} missing", name))
}

#[test]
fn test_compare_page_yields_clean_providers() -> anyhow::Result<()> {
    let (scraper, recorder) = create_scraper(FixtureEngine::compare_page())?;
    let query = TransferQuery::new("de", "tn", "eur", "tnd", 100.0);

    let result = scraper.scrape(&query, &SessionOptions::default());

    assert!(result.success, "{:?}", result.error);
    assert!(result.error.is_none());
    assert!(result.scraped_at.is_some());

    let providers = result.providers.expect("providers on success");
    let names: Vec<&str> = providers.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Wise", "Remitly", "Western Union", "Ria"]);
    assert_eq!(result.total_providers, Some(4));
    assert_eq!(providers.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1, 2, 3, 4]);

    assert_eq!(recorder.launches(), 1);
    assert_eq!(recorder.closes(), 1);
    assert_eq!(
        recorder.visited(),
        vec!["https://www.monito.com/en/compare/transfer/de/tn/eur/tnd/100".to_string()]
    );
    Ok(())
}

#[test]
fn test_summary_only_provider_falls_back_to_promotional() -> anyhow::Result<()> {
    let (scraper, _) = create_scraper(FixtureEngine::compare_page())?;
    let result = scraper.scrape(&TransferQuery::default(), &SessionOptions::default());
    let providers = result.providers.expect("providers on success");

    let wise = find(&providers, "Wise");
    assert_eq!(wise.logo, "https://cdn.monito.com/logos/wise.svg");
    assert_eq!(wise.monito_score, 9.4);
    assert_eq!(wise.transfer_time, "In minutes");
    assert!(wise.best_deal);
    assert_eq!(wise.promotional, pricing(0.89, 3.371, 336.2));
    assert_eq!(wise.regular, wise.promotional);

    let ria = find(&providers, "Ria");
    assert!(!ria.best_deal);
    assert_eq!(ria.transfer_time, "");
    assert_eq!(ria.promotional, pricing(3.0, 3.295, 320.5));
    assert_eq!(ria.regular, ria.promotional);
    Ok(())
}

#[test]
fn test_struck_prices_become_regular_pricing() -> anyhow::Result<()> {
    let (scraper, _) = create_scraper(FixtureEngine::compare_page())?;
    let result = scraper.scrape(&TransferQuery::default(), &SessionOptions::default());
    let providers = result.providers.expect("providers on success");

    let remitly = find(&providers, "Remitly");
    assert_eq!(remitly.monito_score, 8.7);
    assert_eq!(remitly.transfer_time, "Within 1 day");
    assert_eq!(remitly.promotional, pricing(0.0, 3.41, 341.0));
    assert_eq!(remitly.regular, pricing(2.99, 3.32, 331.0));
    Ok(())
}

#[test]
fn test_detail_panel_wins_over_summary() -> anyhow::Result<()> {
    let (scraper, _) = create_scraper(FixtureEngine::compare_page())?;
    let result = scraper.scrape(&TransferQuery::default(), &SessionOptions::default());
    let providers = result.providers.expect("providers on success");

    let wu = find(&providers, "Western Union");
    assert_eq!(wu.transfer_time, "Within 2 days");
    assert_eq!(wu.promotional, pricing(0.0, 3.31, 327.8));
    assert_eq!(wu.regular, pricing(4.9, 3.25, 319.1));
    Ok(())
}

#[test]
fn test_missing_list_fails_and_still_releases() -> anyhow::Result<()> {
    let engine = FixtureEngine::compare_page().missing(selectors::PROVIDER_ITEM);
    let (scraper, recorder) = create_scraper(engine)?;
    let query = TransferQuery::new("de", "tn", "eur", "tnd", 250.0);
    let options = SessionOptions {
        timeout_ms: 10_000,
        ..SessionOptions::default()
    };

    let result = scraper.scrape(&query, &options);

    assert!(!result.success);
    assert!(result.providers.is_none());
    assert!(result.total_providers.is_none());
    assert!(result.scraped_at.is_none());
    let error = result.error.expect("error on failure");
    assert!(error.starts_with("Navigation error"), "{}", error);
    assert!(error.contains("5000ms"), "{}", error);

    assert_eq!(result.transfer.from, "DE");
    assert_eq!(result.transfer.to_currency, "TND");
    assert_eq!(result.transfer.amount, 250.0);
    assert_eq!(recorder.closes(), 1);
    Ok(())
}

#[test]
fn test_empty_list_is_a_successful_empty_result() -> anyhow::Result<()> {
    let (scraper, recorder) =
        create_scraper(FixtureEngine::new(r#"<div id="cash-tab"><ul></ul></div>"#))?;

    let result = scraper.scrape(&TransferQuery::default(), &SessionOptions::default());

    assert!(result.success);
    assert_eq!(result.total_providers, Some(0));
    assert_eq!(result.providers, Some(vec![]));
    assert_eq!(recorder.closes(), 1);
    Ok(())
}

#[test]
fn test_result_serializes_with_wire_field_names() -> anyhow::Result<()> {
    let (scraper, _) = create_scraper(FixtureEngine::compare_page())?;
    let result = scraper.scrape(&TransferQuery::default(), &SessionOptions::default());

    let json = serde_json::to_value(&result)?;
    assert_eq!(json["transfer"]["fromCurrency"], "EUR");
    assert_eq!(json["totalProviders"], 4);
    assert!(json["scrapedAt"].is_string());
    assert!(json.get("error").is_none());

    let first = &json["providers"][0];
    assert_eq!(first["id"], 1);
    assert_eq!(first["monitoScore"], 9.4);
    assert_eq!(first["bestDeal"], true);
    assert_eq!(first["promotional"]["exchangeRate"], 3.371);
    assert_eq!(first["regular"]["recipientGets"], 336.2);
    Ok(())
}

#[tokio::test]
async fn test_concurrent_scrapes_use_separate_sessions() -> anyhow::Result<()> {
    let (scraper, recorder) = create_scraper(FixtureEngine::compare_page())?;

    let route = |from: &str| TransferQuery::new(from, "tn", "eur", "tnd", 100.0);

    let (de, fr, it) = tokio::join!(
        scrape_monito(Arc::clone(&scraper), route("de"), SessionOptions::default()),
        scrape_monito(Arc::clone(&scraper), route("fr"), SessionOptions::default()),
        scrape_monito(Arc::clone(&scraper), route("it"), SessionOptions::default()),
    );

    assert!(de.success && fr.success && it.success);
    assert_eq!(fr.transfer.from, "FR");
    assert_eq!(recorder.launches(), 3);
    assert_eq!(recorder.closes(), 3);

    let mut visited = recorder.visited();
    visited.sort();
    assert!(visited[0].contains("/transfer/de/tn/"));
    assert!(visited[2].contains("/transfer/it/tn/"));
    Ok(())
}
