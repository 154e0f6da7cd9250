use bank_data_assistant::*;
use chrono::NaiveDate;

fn rows(cells: &[&[&str]]) -> Table {
    Table::from_rows(
        cells
            .iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect(),
    )
}

fn dashboard_store() -> DataStore {
    let forecast = rows(&[
        &["HNB", "", "Commercial", ""],
        &["Date", "Price", "Date", "Price"],
        &["1/2/2025", "155.00", "1/2/2025", "124.30"],
        &["1/9/2025", "156.20", "1/9/2025", "125.50"],
    ]);
    let valuation = rows(&[
        &["HNB decision table"],
        &["Date", "EPS", "Decision", "Status", "Intrinsic value"],
        &["1/2/2025", "32.1", "Buy", "Undervalued", "171.40"],
        &["1/9/2025", "32.8", "Hold", "Fair", "158.90"],
        &[""],
        &["Commercial decision table"],
        &["Date", "EPS", "Decision"],
        &["1/2/2025", "18.2", "Buy"],
    ]);
    let ratio = rows(&[
        &["Sampath"],
        &["Year", "ROE", "ROA", "NPL"],
        &["2022", "12.4", "1.1", "N/A"],
        &["2023", "13.1", "1.2", "3.2"],
        &["2024", "1,450.0", "1.3", "2.9"],
    ]);
    let environmental = rows(&[
        &["", "2023-05", "2023-06", "2023-07"],
        &["usd", "305.1", "299.83", "298.4"],
        &["inf", "5.1", "4.6", ""],
        &["int", "7.5", "7.25", "7.25"],
        &["gdp", "3.2", "3.4", "3.4"],
    ]);
    DataStore::from_tables(forecast, valuation, ratio, environmental)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_decision_scenario_exact_date() {
    let store = dashboard_store();
    let (outcome, ctx) = process_turn(
        &store,
        &ConversationContext::default(),
        "What is the decision for HNB on 1/9/2025?",
    );

    match outcome {
        TurnOutcome::Answer { text } => {
            assert!(text.contains("Hold"), "got: {text}");
            assert!(text.contains("1/9/2025"), "got: {text}");
        }
        other => panic!("expected an answer, got {other:?}"),
    }
    assert_eq!(ctx.last_bank, Some(Bank::Hnb));
    assert_eq!(ctx.last_date, Some(date(2025, 1, 9)));
}

#[test]
fn test_decision_scenario_latest() {
    let store = dashboard_store();
    let (outcome, _) = process_turn(
        &store,
        &ConversationContext::default(),
        "Should I buy HNB now?",
    );

    match outcome {
        TurnOutcome::Answer { text } => {
            assert!(text.contains("Hold"), "got: {text}");
            assert!(text.contains("1/9/2025"), "got: {text}");
        }
        other => panic!("expected an answer, got {other:?}"),
    }
}

#[test]
fn test_decision_clarifies_date_then_resumes() {
    let store = dashboard_store();

    // the fixture has no Seylan block and no date was ever supplied, so the
    // interpreter must ask for the date and remember the pending intent
    let (outcome, ctx) = process_turn(
        &store,
        &ConversationContext::default(),
        "What is the decision for Seylan?",
    );
    match outcome {
        TurnOutcome::Clarify { missing, .. } => assert_eq!(missing, Missing::Date),
        other => panic!("expected clarify, got {other:?}"),
    }
    assert_eq!(ctx.pending, Some(Pending::Decision));
    assert_eq!(ctx.last_bank, Some(Bank::Seylan));

    // the follow-up switches bank and supplies a date; the pending decision
    // intent is reused even though the reply has no intent markers of its own
    let (outcome, ctx) = process_turn(&store, &ctx, "Commercial, 1/2/2025");
    match outcome {
        TurnOutcome::Answer { text } => assert!(text.contains("Buy"), "got: {text}"),
        other => panic!("expected an answer, got {other:?}"),
    }
    assert_eq!(ctx.pending, None);
}

#[test]
fn test_price_scenario_with_carried_bank() {
    let store = dashboard_store();
    let ctx = ConversationContext {
        last_bank: Some(Bank::Commercial),
        last_date: None,
        pending: None,
    };

    let (outcome, ctx) = process_turn(&store, &ctx, "what was the stock price on 1/9/2025?");
    match outcome {
        TurnOutcome::Answer { text } => {
            assert!(text.contains("Commercial"), "got: {text}");
            assert!(text.contains("LKR 125.50"), "got: {text}");
        }
        other => panic!("expected an answer, got {other:?}"),
    }
    assert_eq!(ctx.last_bank, Some(Bank::Commercial));
}

#[test]
fn test_open_question_defers_without_losing_context() {
    let store = dashboard_store();
    let ctx = ConversationContext {
        last_bank: Some(Bank::Hnb),
        last_date: Some(date(2025, 1, 9)),
        pending: None,
    };

    let (outcome, ctx) = process_turn(&store, &ctx, "Rank the banks by ROE.");
    assert_eq!(outcome, TurnOutcome::Defer);
    assert_eq!(ctx.last_bank, Some(Bank::Hnb));
    assert_eq!(ctx.last_date, Some(date(2025, 1, 9)));
    assert_eq!(ctx.pending, None);
}

#[test]
fn test_detail_page_queries() {
    let store = dashboard_store();

    let roe = store.ratio_series(Bank::Sampath, "ROE").unwrap();
    assert_eq!(roe.len(), 3);
    assert_eq!(roe[0], ("2022".to_string(), Some(12.4)));
    assert_eq!(roe[2], ("2024".to_string(), Some(1450.0)));

    let npl = store.ratio_series(Bank::Sampath, "NPL").unwrap();
    assert_eq!(npl[0].1, None);

    let summary = store.valuation_summary(Bank::Hnb).unwrap();
    assert_eq!(summary.decision.as_deref(), Some("Hold"));
    assert_eq!(summary.as_of, "1/9/2025");

    assert_eq!(store.indicator_on(IndicatorCode::Inflation, "2023-06").unwrap(), 4.6);
    let (month, value) = store.latest_indicator(IndicatorCode::Inflation).unwrap();
    assert_eq!(month, "2023-06");
    assert_eq!(value, 4.6);
}

#[test]
fn test_csv_text_round_trip() {
    let text = "HNB decision table,\nDate,Decision\n1/2/2025,Buy\n1/9/2025,Hold\n";
    let table = Table::from_csv_str(text).unwrap();
    let block = find_entity_block(&table, "HNB", PeriodLabel::Date).unwrap();
    assert_eq!(block.header_row(), block.marker_row() + 1);

    let latest = block.latest_in_column("Decision").unwrap();
    assert_eq!(latest.value, "Hold");
    assert_eq!(latest.period, "1/9/2025");
}

#[test]
fn test_not_found_is_recoverable_not_fatal() {
    let store = dashboard_store();

    let err = store.decision_on(Bank::Ntb, date(2025, 1, 2)).unwrap_err();
    assert!(err.is_not_found());

    let err = store.ratio_series(Bank::Sampath, "CAR").unwrap_err();
    assert!(err.is_not_found());

    let err = store.price_on(Bank::Hnb, date(2030, 1, 1)).unwrap_err();
    assert!(err.is_not_found());
}
