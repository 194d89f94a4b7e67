//! Fee quoting integration tests for tariff-service.

mod common;

use common::{percentage_input, spawn_app, tariff_id_by_name};
use rust_decimal_macros::dec;
use service_core::error::AppError;
use rust_decimal::Decimal;
use tariff_service::models::{TariffType, UpdateTariff};
use tariff_service::services::{get_metrics, FeeClamp, FixedFeeMode};
use uuid::Uuid;

#[test]
fn quote_percentage_sample_tariff() {
    let app = spawn_app(FixedFeeMode::Cumulative);
    let service = app.fee_service();
    let id = tariff_id_by_name(service.catalog(), "Standard Percentage");

    assert_eq!(service.quote(id, dec!(1000)).unwrap().fee, dec!(250));
    assert_eq!(service.quote(id, dec!(100)).unwrap().fee, dec!(50));

    let capped = service.quote(id, dec!(100000)).unwrap();
    assert_eq!(capped.fee, dec!(5000));
    assert_eq!(capped.breakdown.clamp, Some(FeeClamp::Maximum));
    assert_eq!(capped.currency, "EUR");
}

#[test]
fn quote_tiered_sample_tariff() {
    let app = spawn_app(FixedFeeMode::Cumulative);
    let service = app.fee_service();
    let id = tariff_id_by_name(service.catalog(), "Tiered Volume");

    let small = service.quote(id, dec!(500)).unwrap();
    assert_eq!(small.fee, dec!(250));
    assert_eq!(small.breakdown.matched_tier, Some(0));

    let large = service.quote(id, dec!(10000)).unwrap();
    assert_eq!(large.fee, dec!(2100));
    assert_eq!(large.breakdown.matched_tier, Some(2));

    let zero = service.quote(id, dec!(0)).unwrap();
    assert_eq!(zero.fee, dec!(150));
    assert_eq!(zero.breakdown.clamp, Some(FeeClamp::Minimum));
}

#[test]
fn fixed_sample_tariff_hides_duplicated_fee() {
    let app = spawn_app(FixedFeeMode::Cumulative);
    let service = app.fee_service();
    let id = tariff_id_by_name(service.catalog(), "Fixed Fee");

    let quote = service.quote(id, dec!(1000)).unwrap();
    assert_eq!(quote.breakdown.raw_fee, dec!(1000));
    assert_eq!(quote.fee, dec!(500));
}

#[test]
fn fixed_fee_mode_changes_unclamped_fixed_tariff() {
    let unclamped = UpdateTariff {
        minimum_fee: Some(Some(dec!(0))),
        maximum_fee: Some(Some(dec!(100000))),
        ..Default::default()
    };

    let mut cumulative = spawn_app(FixedFeeMode::Cumulative);
    let id = tariff_id_by_name(cumulative.fee_service().catalog(), "Fixed Fee");
    cumulative
        .fee_service_mut()
        .catalog_mut()
        .update(id, unclamped.clone())
        .unwrap();
    assert_eq!(
        cumulative.fee_service().quote(id, dec!(1000)).unwrap().fee,
        dec!(1000)
    );

    let mut single = spawn_app(FixedFeeMode::Single);
    let id = tariff_id_by_name(single.fee_service().catalog(), "Fixed Fee");
    single
        .fee_service_mut()
        .catalog_mut()
        .update(id, unclamped)
        .unwrap();
    assert_eq!(
        single.fee_service().quote(id, dec!(1000)).unwrap().fee,
        dec!(500)
    );
}

#[test]
fn quote_rounds_to_configured_scale() {
    let mut app = spawn_app(FixedFeeMode::Cumulative);
    let tariff = app
        .fee_service_mut()
        .catalog_mut()
        .create(percentage_input("Odd Rate", dec!(12.5)))
        .unwrap();

    let quote = app
        .fee_service()
        .quote(tariff.tariff_id, dec!(333.33))
        .unwrap();
    assert_eq!(quote.breakdown.fee, dec!(41.66625));
    assert_eq!(quote.fee, dec!(41.67));

    // Midpoint rounds away from zero.
    let quote = app
        .fee_service()
        .quote(tariff.tariff_id, dec!(0.2))
        .unwrap();
    assert_eq!(quote.breakdown.fee, dec!(0.025));
    assert_eq!(quote.fee, dec!(0.03));
}

#[test]
fn quote_rejects_negative_amount() {
    let app = spawn_app(FixedFeeMode::Cumulative);
    let service = app.fee_service();
    let id = tariff_id_by_name(service.catalog(), "Standard Percentage");

    let result = service.quote(id, dec!(-10));
    assert!(
        matches!(result, Err(AppError::BadRequest(_))),
        "Negative amount should be rejected: {:?}",
        result
    );
    assert!(matches!(
        service.quote_all(dec!(-0.01)),
        Err(AppError::BadRequest(_))
    ));
}

#[test]
fn quote_unknown_tariff_is_not_found() {
    let app = spawn_app(FixedFeeMode::Cumulative);
    let result = app.fee_service().quote(Uuid::new_v4(), dec!(100));
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[test]
fn quote_all_skips_inactive_tariffs() {
    let mut app = spawn_app(FixedFeeMode::Cumulative);
    let quotes = app.fee_service().quote_all(dec!(1000)).unwrap();
    let names: Vec<_> = quotes.iter().map(|q| q.tariff_name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Fixed Fee", "Standard Percentage", "Tiered Volume"]
    );

    let id = tariff_id_by_name(app.fee_service().catalog(), "Fixed Fee");
    app.fee_service_mut().catalog_mut().set_active(id, false);

    let quotes = app.fee_service().quote_all(dec!(1000)).unwrap();
    assert_eq!(quotes.len(), 2);
    assert!(quotes.iter().all(|q| q.tariff_id != id));

    // Inactive tariffs can still be quoted directly.
    assert_eq!(app.fee_service().quote(id, dec!(1000)).unwrap().fee, dec!(500));
}

#[test]
fn quote_serializes_to_json() {
    let app = spawn_app(FixedFeeMode::Cumulative);
    let service = app.fee_service();
    let id = tariff_id_by_name(service.catalog(), "Tiered Volume");

    let quote = service.quote(id, dec!(2000)).unwrap();
    let json = serde_json::to_value(&quote).unwrap();
    assert_eq!(json["tariff_type"], "tiered");
    assert_eq!(json["breakdown"]["matched_tier"], 1);
    assert_eq!(json["breakdown"]["clamp"], serde_json::Value::Null);
}

#[test]
fn quote_all_overflow_is_reported_under_quote_all() {
    let mut app = spawn_app(FixedFeeMode::Cumulative);
    let mut input = percentage_input("Huge Fixed", dec!(0));
    input.tariff_type = TariffType::Fixed;
    input.percentage = None;
    input.fixed_fee = Decimal::MAX;
    app.fee_service_mut().catalog_mut().create(input).unwrap();

    // Cumulative mode adds the fixed fee twice, which leaves the decimal range.
    let result = app.fee_service().quote_all(dec!(1));
    assert!(
        matches!(result, Err(AppError::InternalError(_))),
        "Overflow should surface as an internal error: {:?}",
        result
    );

    let metrics = get_metrics();
    assert!(metrics.contains("error_type=\"overflow\",operation=\"quote_all\""));
}
