use std::collections::HashSet;

use rust_decimal_macros::dec;

use crate::workflows::underwriting::amortization::{monthly_payment, round_money};
use crate::workflows::underwriting::PreOfferGenerator;

#[test]
fn four_offers_sorted_by_rate() {
    let offers = PreOfferGenerator::default().generate(dec!(200000), 12);

    assert_eq!(offers.len(), 4);
    let rates: Vec<_> = offers.iter().map(|offer| offer.rate).collect();
    assert_eq!(rates, vec![dec!(18), dec!(19), dec!(19), dec!(20)]);
    assert!(offers.windows(2).all(|pair| pair[0].rate <= pair[1].rate));
}

#[test]
fn ties_keep_product_matrix_order() {
    let offers = PreOfferGenerator::default().generate(dec!(200000), 12);
    let flags: Vec<(bool, bool)> = offers
        .iter()
        .map(|offer| (offer.insurance_enabled, offer.salary_client))
        .collect();

    assert_eq!(
        flags,
        vec![(true, true), (false, true), (true, false), (false, false)]
    );
}

#[test]
fn insurance_adds_surcharge_to_total_amount() {
    let offers = PreOfferGenerator::default().generate(dec!(200000), 12);

    for offer in &offers {
        assert_eq!(offer.requested_amount, dec!(200000));
        assert_eq!(offer.term, 12);
        let expected = if offer.insurance_enabled {
            dec!(250000)
        } else {
            dec!(200000)
        };
        assert_eq!(offer.total_amount, expected);
        assert_eq!(
            offer.monthly_payment,
            round_money(monthly_payment(offer.total_amount, offer.term, offer.rate))
        );
        assert!(offer.statement_id.is_none());
    }
}

#[test]
fn every_offer_gets_a_fresh_identifier() {
    let generator = PreOfferGenerator::default();
    let ids: HashSet<_> = generator
        .generate(dec!(200000), 12)
        .into_iter()
        .chain(generator.generate(dec!(200000), 12))
        .map(|offer| offer.offer_id)
        .collect();
    assert_eq!(ids.len(), 8);
}

#[test]
fn base_rate_is_configurable() {
    let offers = PreOfferGenerator::new(dec!(15)).generate(dec!(50000), 6);
    assert_eq!(offers.first().map(|offer| offer.rate), Some(dec!(13)));
    assert_eq!(offers.last().map(|offer| offer.rate), Some(dec!(15)));
}

#[test]
fn insurance_surcharge_saturates_near_the_decimal_limit() {
    let amount = rust_decimal::Decimal::MAX - dec!(10000);
    let offers = PreOfferGenerator::default().generate(amount, 12);

    assert_eq!(offers.len(), 4);
    for offer in offers.iter().filter(|offer| offer.insurance_enabled) {
        assert_eq!(offer.total_amount, rust_decimal::Decimal::MAX);
    }
}
