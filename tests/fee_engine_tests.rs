//! Tests for the service-fee engine

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use wexcars::persistence::{read_ledger, reconcile_listings, FeeLedger};
    use wexcars::{
        calculate_service_fee, calculate_service_fee_for_tag, fee_model_catalog, format_currency,
        validate_fee_input, CurrencyError, FeeCalculationInput, FeeModel, PartialFeeInput,
    };

    const TOLERANCE: f64 = 1e-9;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= TOLERANCE * a.abs().max(b.abs()).max(1.0)
    }

    fn quote(car_price: f64, vat_rate: f64, model: FeeModel) -> wexcars::FeeCalculationResult {
        calculate_service_fee(&FeeCalculationInput::new(car_price, vat_rate, "EUR", model))
    }

    // ============================================================================
    // Calculation invariants
    // ============================================================================

    #[test]
    fn test_vat_and_total_identities_hold_for_every_model() {
        let prices = [1.0, 45_000.0, 999_999.0, 1_000_000.0, 2_750_000.0, 3_000_001.0, 12e6];
        let vats = [0.0, 5.5, 19.0, 25.0, 25.0001, 27.0, 100.0];

        for model in FeeModel::ALL {
            for price in prices {
                for vat in vats {
                    let r = quote(price, vat, model);
                    assert_eq!(r.vat_on_fee, r.net_fee * vat / 100.0);
                    assert_eq!(r.total_customer_pays, r.net_fee + r.vat_on_fee);
                    assert_eq!(r.business_keeps, r.net_fee);
                    assert!(r.net_fee >= 0.0);
                    assert_eq!(r.fee_model, model.as_tag());
                    assert_eq!(r.currency, "EUR");
                }
            }
        }
    }

    #[test]
    fn test_selection_is_deterministic() {
        for model in FeeModel::ALL {
            assert_eq!(quote(1_234_567.0, 21.0, model), quote(1_234_567.0, 21.0, model));
        }
    }

    // ============================================================================
    // Model branches
    // ============================================================================

    #[test]
    fn test_vat_on_top_ignores_vat() {
        let a = quote(875_000.0, 0.0, FeeModel::VatOnTop);
        let b = quote(875_000.0, 27.0, FeeModel::VatOnTop);
        assert_eq!(a.net_fee, 875_000.0 * 0.01);
        assert_eq!(a.net_fee, b.net_fee);
    }

    #[test]
    fn test_higher_vat_boundary() {
        assert!(close(quote(400_000.0, 25.0, FeeModel::HigherVatIncluded).net_fee, 5_000.0));
        assert!(close(quote(400_000.0, 25.0001, FeeModel::HigherVatIncluded).net_fee, 6_000.0));
    }

    #[test]
    fn test_flat_minimum() {
        assert_eq!(quote(1_000_000.0, 25.0, FeeModel::FlatMinimum).net_fee, 30_000.0);
        assert!(close(quote(5_000_000.0, 25.0, FeeModel::FlatMinimum).net_fee, 50_000.0));
    }

    #[test]
    fn test_tiered_boundaries() {
        let rate = |price: f64| quote(price, 0.0, FeeModel::Tiered).net_fee / price;
        assert!(close(rate(999_999.0), 0.015));
        assert!(close(rate(1_000_000.0), 0.0125));
        assert!(close(rate(3_000_000.0), 0.0125));
        assert!(close(rate(3_000_001.0), 0.01));
    }

    #[test]
    fn test_unknown_model_tag() {
        let r = calculate_service_fee_for_tag(250_000.0, 25.0, "EUR", "vip");
        assert_eq!(r.net_fee, 0.0);
        assert_eq!(r.vat_on_fee, 0.0);
        assert_eq!(r.total_customer_pays, 0.0);
        assert_eq!(r.fee_model_description, "Unknown model");
    }

    #[test]
    fn test_end_to_end_scenario() {
        let r = calculate_service_fee_for_tag(250_000.0, 25.0, "EUR", "higher_vat_included");
        assert_eq!(r.net_fee, 3125.0);
        assert_eq!(r.vat_on_fee, 781.25);
        assert_eq!(r.total_customer_pays, 3906.25);

        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["totalCustomerPays"], 3906.25);
        assert_eq!(json["feeModel"], "higher_vat_included");
        assert!(json["feeModelDescription"].is_string());
    }

    // ============================================================================
    // Validation
    // ============================================================================

    #[test]
    fn test_validation_of_empty_input() {
        assert_eq!(validate_fee_input(&PartialFeeInput::default()).len(), 4);
    }

    #[test]
    fn test_validation_of_good_input() {
        let input = PartialFeeInput {
            car_price: Some(100_000.0),
            vat_rate: Some(25.0),
            currency: Some("EUR".to_string()),
            fee_model: Some("tiered".to_string()),
        };
        assert!(validate_fee_input(&input).is_empty());
    }

    #[test]
    fn test_calculation_does_not_validate() {
        let r = quote(-50_000.0, 150.0, FeeModel::VatOnTop);
        assert!(r.net_fee < 0.0);
        assert_eq!(r.vat_on_fee, r.net_fee * 1.5);
    }

    // ============================================================================
    // Formatting and catalog
    // ============================================================================

    #[test]
    fn test_format_currency() {
        let formatted = format_currency(1234.5, "EUR").unwrap();
        assert!(formatted.contains("1,234.50"));
        assert!(formatted.contains('€'));

        assert_eq!(
            format_currency(100.0, "XXX"),
            Err(CurrencyError::UnknownCurrency("XXX".to_string()))
        );
    }

    #[test]
    fn test_catalog_covers_all_models() {
        let models: Vec<FeeModel> = fee_model_catalog().iter().map(|i| i.model).collect();
        assert_eq!(models, FeeModel::ALL.to_vec());
        assert_eq!(FeeModel::FlatMinimum.display_name(), "Flat Minimum");
    }

    // ============================================================================
    // Batch reconciliation
    // ============================================================================

    fn temp_data_dir(test_name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "wexcars_fee_engine_{}_{}",
            test_name,
            uuid::Uuid::new_v4()
        ))
    }

    #[test]
    fn test_reconcile_listings_prices_valid_rows_and_reports_the_rest() {
        let data_dir = temp_data_dir("reconcile");
        fs::create_dir_all(&data_dir).unwrap();

        let listings = data_dir.join("listings.csv");
        fs::write(
            &listings,
            "listing_id,car_price,vat_rate,currency,fee_model\n\
             L-1,250000,25,EUR,higher_vat_included\n\
             L-2,1000000,25,EUR,flat_minimum\n\
             L-3,0,25,EUR,tiered\n\
             L-4,500000,20,GBP,vip\n\
             L-5,2000000,20,gbp,tiered\n",
        )
        .unwrap();

        let mut ledger = FeeLedger::open(&data_dir, "fee_ledger.csv").unwrap();
        let summary = reconcile_listings(&listings, &mut ledger).unwrap();

        assert_eq!(summary.processed, 5);
        assert_eq!(summary.accepted, 3);
        assert_eq!(summary.rejected.len(), 2);
        assert_eq!(summary.rejected[0].listing_id, "L-3");
        assert_eq!(summary.rejected[0].errors, vec!["Car price must be greater than 0"]);
        assert_eq!(summary.rejected[1].listing_id, "L-4");
        assert_eq!(summary.rejected[1].errors, vec!["Please select a valid fee model"]);

        let eur = summary.totals["EUR"];
        assert_eq!(eur.listings, 2);
        assert!(close(eur.net_fee, 3125.0 + 30_000.0));
        assert!(close(eur.total_customer_pays, 3906.25 + 37_500.0));

        let gbp = summary.totals["GBP"];
        assert_eq!(gbp.listings, 1);
        assert!(close(gbp.net_fee, 25_000.0));

        let records = read_ledger(&data_dir.join("fee_ledger.csv")).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].listing_id, "L-1");
        assert_eq!(records[0].service_fee_amount, 3125.0);
        assert_eq!(records[0].fee_model, "higher_vat_included");
        assert_eq!(records[2].currency, "gbp");

        fs::remove_dir_all(&data_dir).unwrap();
    }
}
