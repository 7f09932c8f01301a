use std::fs::OpenOptions;
use std::io::Write;

use marketplace_pricer::{
    app::record_outcomes,
    domain::{calculate_all, CalculationInput, FeeTables, MarketplaceRequest, ShopeeOptions},
    infra::history::{HistoryStore, JsonLinesHistory},
};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use time::{Duration, OffsetDateTime};

fn priced_shopee(quantity: u32) -> (CalculationInput, Vec<marketplace_pricer::domain::CalculationOutcome>) {
    let input = CalculationInput::new(dec!(50), dec!(30), quantity).unwrap();
    let outcomes = calculate_all(
        &input,
        &[MarketplaceRequest::Shopee(ShopeeOptions::default())],
        &FeeTables::default(),
    );
    (input, outcomes)
}

#[test]
fn records_come_back_newest_first_per_owner() {
    let dir = tempfile::tempdir().unwrap();
    let mut history = JsonLinesHistory::new(dir.path().join("data").join("history.jsonl"));
    let start = OffsetDateTime::from_unix_timestamp(1_767_225_600).unwrap();

    for (offset, quantity) in [(0, 1), (1, 2), (2, 3)] {
        let (input, outcomes) = priced_shopee(quantity);
        let now = start + Duration::minutes(offset);
        record_outcomes(&mut history, "ana", &input, &outcomes, now).unwrap();
    }
    let (input, outcomes) = priced_shopee(9);
    record_outcomes(&mut history, "bruno", &input, &outcomes, start).unwrap();

    let recent = history.recent("ana", 2).unwrap();
    let quantities: Vec<u32> = recent.iter().map(|r| r.quantity).collect();
    assert_eq!(quantities, vec![3, 2]);
    assert_eq!(recent[0].selling_price, dec!(108));
    assert_eq!(recent[0].recorded_at(), Some(start + Duration::minutes(2)));
    assert_ne!(recent[0].id, recent[1].id);

    assert_eq!(history.recent("bruno", 10).unwrap().len(), 1);
}

#[test]
fn unreadable_lines_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.jsonl");
    let mut history = JsonLinesHistory::new(&path);

    let (input, outcomes) = priced_shopee(1);
    record_outcomes(&mut history, "ana", &input, &outcomes, OffsetDateTime::now_utc()).unwrap();
    let mut file = OpenOptions::new().append(true).open(&path).unwrap();
    writeln!(file, "{{ truncated").unwrap();

    assert_eq!(history.recent("ana", 10).unwrap().len(), 1);
}

#[test]
fn missing_file_is_an_empty_history() {
    let dir = tempfile::tempdir().unwrap();
    let history = JsonLinesHistory::new(dir.path().join("never-written.jsonl"));
    assert!(history.recent("ana", 10).unwrap().is_empty());
}
