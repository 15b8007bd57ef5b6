//! End-to-end flows through the public session API: register parts, quote
//! them, and edit the registry, the way the forms drive it.

use partquote_app::forms::{PartForm, QuoteForm, RangeForm, VariationForm};
use partquote_app::{AppConfig, AppError, NotificationVariant, Session, script};
use partquote_core::Money;
use partquote_quoting::QuoteError;

fn money(s: &str) -> Money {
    s.parse().unwrap()
}

fn gear_form(variations: Vec<VariationForm>) -> PartForm {
    PartForm {
        part_type: "Gear".to_string(),
        ranges: vec![RangeForm::new("10", "5.00"), RangeForm::new("50", "4.00")],
        variations,
    }
}

fn session_with_gear() -> Session {
    let mut session = Session::new(&AppConfig::default());
    let submission =
        session.submit_registration(&gear_form(vec![VariationForm::new("Polished", "1.50")]));
    assert!(submission.is_ok());
    session
}

fn total_of(session: &mut Session, form: QuoteForm) -> Money {
    session.submit_quote(&form).outcome.unwrap().total
}

#[test]
fn scenario_a_first_tier() {
    let mut session = session_with_gear();
    let total = total_of(&mut session, QuoteForm::new("Gear", 5, Vec::<String>::new()));
    assert_eq!(total, money("25.00"));
}

#[test]
fn scenario_b_quantity_beyond_all_tiers() {
    let mut session = session_with_gear();
    let total = total_of(&mut session, QuoteForm::new("Gear", 100, Vec::<String>::new()));
    assert_eq!(total, money("400.00"));
}

#[test]
fn scenario_c_variation_surcharge() {
    let mut session = session_with_gear();
    let total = total_of(&mut session, QuoteForm::new("Gear", 5, ["Polished"]));
    assert_eq!(total, money("32.50"));
}

#[test]
fn scenario_d_unknown_part_type() {
    let mut session = session_with_gear();
    let submission = session.submit_quote(&QuoteForm::new("Sprocket", 5, Vec::<String>::new()));

    assert!(matches!(
        submission.outcome,
        Err(AppError::Quote(QuoteError::PartNotFound { .. }))
    ));
    assert_eq!(
        submission.notification.unwrap().variant,
        NotificationVariant::Destructive
    );
}

#[test]
fn unknown_variation_is_ignored_without_error() {
    let mut session = session_with_gear();
    let submission = session.submit_quote(&QuoteForm::new("Gear", 5, ["Polished", "Chromed"]));

    let quote = submission.outcome.unwrap();
    assert_eq!(quote.total, money("32.50"));
    assert_eq!(quote.unmatched_variations, vec!["Chromed".to_string()]);
    assert_eq!(
        submission.notification.unwrap().variant,
        NotificationVariant::Success
    );
}

#[test]
fn quoting_leaves_the_registry_untouched() {
    let mut session = session_with_gear();
    let version = session.registry().version();

    let first = total_of(&mut session, QuoteForm::new("Gear", 12, ["Polished"]));
    let second = total_of(&mut session, QuoteForm::new("Gear", 12, ["Polished"]));

    assert_eq!(first, second);
    assert_eq!(session.registry().version(), version);
}

#[test]
fn duplicate_registrations_quote_the_first() {
    let mut session = session_with_gear();
    let mut pricier = gear_form(vec![]);
    pricier.ranges = vec![RangeForm::new("10", "9.00")];
    assert!(session.submit_registration(&pricier).is_ok());

    assert_eq!(session.registry().len(), 2);
    assert_eq!(session.part_type_choices(), vec!["Gear"]);
    let total = total_of(&mut session, QuoteForm::new("Gear", 1, Vec::<String>::new()));
    assert_eq!(total, money("5.00"));
}

#[test]
fn removing_first_duplicate_exposes_the_next() {
    let mut session = session_with_gear();
    let mut pricier = gear_form(vec![]);
    pricier.ranges = vec![RangeForm::new("10", "9.00")];
    session.submit_registration(&pricier);

    let first = session.resolve_part("Gear").unwrap();
    assert!(session.remove_part(first).is_ok());

    let total = total_of(&mut session, QuoteForm::new("Gear", 1, Vec::<String>::new()));
    assert_eq!(total, money("9.00"));
}

#[test]
fn script_replays_a_whole_session() {
    let actions = script::parse(
        r#"[
            {"action": "register", "part_type": "Bolt",
             "ranges": [{"quantity": 100, "price": "0.25"}, {"quantity": 1000, "price": "0.20"}],
             "variations": [{"name": "Zinc", "surcharge": "0.05"}]},
            {"action": "quote", "part_type": "Bolt", "quantity": 500, "variations": ["Zinc"]},
            {"action": "quote", "part_type": "Bolt", "quantity": 0}
        ]"#,
    )
    .unwrap();

    let mut session = Session::new(&AppConfig::default());
    let report = script::run(&mut session, &actions, false);

    assert_eq!(report.failures, 1);
    let quote = report.reports[1].quote.as_ref().unwrap();
    assert_eq!(quote.total, money("125.00"));
    assert_eq!(
        report.reports[2].field_errors[0].message,
        "quantity must be greater than 0"
    );
}

mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn single_tier_total_is_price_times_quantity(
            cents in 0u64..100_000,
            quantity in 1u32..10_000,
        ) {
            let mut session = Session::new(&AppConfig::default());
            let price = Money::from_cents(cents);
            let form = PartForm {
                part_type: "Washer".to_string(),
                ranges: vec![RangeForm::new("100", price.to_decimal_string())],
                variations: vec![],
            };
            prop_assert!(session.submit_registration(&form).is_ok());

            let form = QuoteForm::new("Washer", quantity, Vec::<String>::new());
            let total = total_of(&mut session, form);
            prop_assert_eq!(total, price.checked_mul(u64::from(quantity)).unwrap());
        }
    }
}
