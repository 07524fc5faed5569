//! Behaviour both storage backends must share. Each backend's test file
//! runs every scenario here against a fresh store.

use std::collections::BTreeMap;

use expense_core::{
    domain::{RecurrenceInterval, Transaction, MAX_OCCURRENCES},
    errors::{StoreError, ValidationError},
    storage::Storage,
};

use super::{at, expense, fixed_now, template};

fn linked(store: &dyn Storage, template_id: &str) -> Vec<Transaction> {
    store
        .transactions()
        .unwrap()
        .into_iter()
        .filter(|txn| txn.belongs_to(template_id))
        .collect()
}

pub fn add_then_get_round_trips(store: &dyn Storage) {
    let mut input = expense("Weekly groceries", "Groceries", -84.25, at(2024, 5, 4));
    input.from = Some("Checking".into());
    input.to = Some("Market".into());
    input.method = Some("Card".into());
    input.note = Some("Bulk buy".into());
    input.currency = Some("eur".into());

    let stored = store.add_transaction(input.clone()).unwrap();
    assert!(!stored.id.is_empty());
    let fetched = store.transaction(&stored.id).unwrap();
    assert_eq!(fetched, Transaction { id: stored.id.clone(), ..input });
}

pub fn add_fills_currency_and_date(store: &dyn Storage) {
    store.update_currency("myr").unwrap();
    let input = Transaction::new(
        "Parking",
        "Travel",
        -4.0,
        expense_core::domain::zero_timestamp(),
    );
    let stored = store.add_transaction(input).unwrap();
    let fetched = store.transaction(&stored.id).unwrap();
    assert_eq!(fetched.currency.as_deref(), Some("myr"));
    assert_eq!(fetched.date, fixed_now());
}

pub fn ids_follow_direction_counters(store: &dyn Storage) {
    let first = store
        .add_transaction(expense("Coffee", "Food", -3.0, at(2024, 6, 1)))
        .unwrap();
    let gain = store
        .add_transaction(expense("Refund", "Shopping", 20.0, at(2024, 6, 2)))
        .unwrap();
    let second = store
        .add_transaction(expense("Tea", "Food", -2.0, at(2024, 6, 3)))
        .unwrap();
    assert_eq!(first.id, "BAU-0001");
    assert_eq!(gain.id, "RES-0001");
    assert_eq!(second.id, "BAU-0002");

    let config = store.config().unwrap();
    assert_eq!(config.voucher_counter, 2);
    assert_eq!(config.receipt_counter, 1);
}

pub fn duplicate_explicit_id_is_rejected(store: &dyn Storage) {
    let txn = expense("Gym", "Healthcare", -30.0, at(2024, 6, 1)).with_id("custom-1");
    store.add_transaction(txn.clone()).unwrap();
    let err = store.add_transaction(txn).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::DuplicateId(ref id)) if id == "custom-1"
    ));
    assert_eq!(store.transactions().unwrap().len(), 1);
}

pub fn listing_is_newest_first(store: &dyn Storage) {
    store
        .add_transactions(vec![
            expense("March", "Food", -1.0, at(2024, 3, 1)),
            expense("May", "Food", -1.0, at(2024, 5, 1)),
            expense("April", "Food", -1.0, at(2024, 4, 1)),
        ])
        .unwrap();
    let order: Vec<String> = store
        .transactions()
        .unwrap()
        .into_iter()
        .map(|txn| txn.description)
        .collect();
    assert_eq!(order, vec!["May", "April", "March"]);
}

pub fn validation_failures_store_nothing(store: &dyn Storage) {
    let err = store
        .add_transaction(expense("<<>>", "Food", -1.0, at(2024, 6, 1)))
        .unwrap_err();
    assert!(err.is_validation());

    let err = store
        .add_transaction(expense("Nothing", "Food", 0.0, at(2024, 6, 1)))
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(ValidationError::ZeroAmount)));

    let err = store
        .add_transaction(expense("Odd", "Food", -1.0, at(2024, 6, 1)).with_currency("xyz"))
        .unwrap_err();
    assert!(err.is_validation());

    assert!(store.transactions().unwrap().is_empty());
    assert_eq!(store.config().unwrap().voucher_counter, 0);
}

pub fn non_finite_numbers_are_rejected(store: &dyn Storage) {
    for amount in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let err = store
            .add_transaction(expense("Bad", "Food", amount, at(2024, 6, 1)))
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::NonFiniteAmount)
        ));

        let err = store
            .add_recurring_template(template(
                "Bad",
                amount,
                at(2024, 6, 1),
                RecurrenceInterval::Monthly,
                2,
            ))
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::NonFiniteAmount)
        ));

        assert!(store.update_opening_balance(amount).unwrap_err().is_validation());
        let balances = BTreeMap::from([("Food".to_string(), 5.0), ("Rent".to_string(), amount)]);
        assert!(store.update_manual_balances(balances).unwrap_err().is_validation());
    }

    let stored = store
        .add_transaction(expense("Good", "Food", -5.0, at(2024, 6, 1)))
        .unwrap();
    let mut changed = stored.clone();
    changed.amount = f64::NAN;
    assert!(store
        .update_transaction(&stored.id, changed)
        .unwrap_err()
        .is_validation());

    assert_eq!(store.transaction(&stored.id).unwrap().amount, -5.0);
    assert_eq!(store.transactions().unwrap().len(), 1);
    assert!(store.recurring_templates().unwrap().is_empty());
    let config = store.config().unwrap();
    assert_eq!(config.opening_balance, 0.0);
    assert!(config.manual_balances.is_empty());
    assert_eq!(config.voucher_counter, 1);
}

pub fn text_is_sanitized_on_add(store: &dyn Storage) {
    let mut input = expense("  Dinner <b>out</b>  ", " Food# ", -40.0, at(2024, 6, 1));
    input.note = Some("@@@".into());
    let stored = store.add_transaction(input).unwrap();
    let fetched = store.transaction(&stored.id).unwrap();
    assert_eq!(fetched.description, "Dinner b out b");
    assert_eq!(fetched.category, "Food");
    assert_eq!(fetched.note, None);
}

pub fn update_replaces_fields(store: &dyn Storage) {
    let stored = store
        .add_transaction(expense("Taxi", "Travel", -18.0, at(2024, 6, 1)))
        .unwrap();
    let mut changed = stored.clone();
    changed.amount = -21.5;
    changed.note = Some("Airport".into());
    changed.id = "ignored".into();

    let updated = store.update_transaction(&stored.id, changed).unwrap();
    assert_eq!(updated.id, stored.id);
    let fetched = store.transaction(&stored.id).unwrap();
    assert_eq!(fetched.amount, -21.5);
    assert_eq!(fetched.note.as_deref(), Some("Airport"));
}

pub fn unknown_ids_are_not_found(store: &dyn Storage) {
    let txn = expense("Ghost", "Food", -1.0, at(2024, 6, 1));
    assert!(store.transaction("BAU-9999").unwrap_err().is_not_found());
    assert!(store
        .update_transaction("BAU-9999", txn)
        .unwrap_err()
        .is_not_found());
    let err = store.remove_transaction("BAU-9999").unwrap_err();
    assert_eq!(err.to_string(), "expense with ID BAU-9999 not found");
    assert!(store.recurring_template("nope").unwrap_err().is_not_found());
    assert!(store
        .remove_recurring_template("nope", true)
        .unwrap_err()
        .is_not_found());
}

pub fn removals_delete_only_named_rows(store: &dyn Storage) {
    let added = store
        .add_transactions(vec![
            expense("A", "Food", -1.0, at(2024, 6, 1)),
            expense("B", "Food", -2.0, at(2024, 6, 2)),
            expense("C", "Food", -3.0, at(2024, 6, 3)),
        ])
        .unwrap();
    store.remove_transaction(&added[0].id).unwrap();
    let removed = store
        .remove_transactions(&[added[1].id.clone(), "missing".to_string()])
        .unwrap();
    assert_eq!(removed, 1);
    let left = store.transactions().unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].id, added[2].id);
}

pub fn config_updates_are_validated(store: &dyn Storage) {
    assert_eq!(store.currency().unwrap(), "usd");
    let err = store.update_currency("xyz").unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::UnsupportedCurrency(_))
    ));
    assert_eq!(store.currency().unwrap(), "usd");
    store.update_currency("EUR").unwrap();
    assert_eq!(store.currency().unwrap(), "eur");

    assert_eq!(store.language().unwrap(), "en");
    assert!(store.update_language("fr").unwrap_err().is_validation());
    store.update_language("ms").unwrap();
    assert_eq!(store.language().unwrap(), "ms");

    assert!(store.update_start_date(0).unwrap_err().is_validation());
    assert!(store.update_start_date(32).unwrap_err().is_validation());
    store.update_start_date(25).unwrap();
    assert_eq!(store.start_date().unwrap(), 25);

    store
        .update_categories(vec!["Food".into(), " Pets! ".into(), "Food".into()])
        .unwrap();
    assert_eq!(store.categories().unwrap(), vec!["Food", "Pets!"]);
    assert!(store
        .update_categories(vec!["###".into()])
        .unwrap_err()
        .is_validation());

    store.update_opening_balance(1250.75).unwrap();
    assert_eq!(store.opening_balance().unwrap(), 1250.75);

    store.update_use_manual_balances(true).unwrap();
    assert!(store.use_manual_balances().unwrap());
    let balances = BTreeMap::from([("Food".to_string(), 310.0), ("Rent".to_string(), -5.5)]);
    store.update_manual_balances(balances.clone()).unwrap();
    assert_eq!(store.manual_balances().unwrap(), balances);

    let config = store.config().unwrap();
    assert_eq!(config.currency, "eur");
    assert_eq!(config.start_date, 25);
    assert_eq!(config.manual_balances, balances);
}

pub fn recurring_add_materializes_series(store: &dyn Storage) {
    let stored = store
        .add_recurring_template(template(
            "Phone plan",
            -35.0,
            at(2024, 1, 31),
            RecurrenceInterval::Monthly,
            3,
        ))
        .unwrap();
    assert!(!stored.id.is_empty());
    assert_eq!(stored.currency.as_deref(), Some("usd"));
    assert_eq!(store.recurring_template(&stored.id).unwrap(), stored);
    assert_eq!(store.recurring_templates().unwrap(), vec![stored.clone()]);
    assert_eq!(store.config().unwrap().recurring_expenses.len(), 1);

    let mut dates: Vec<_> = linked(store, &stored.id).into_iter().map(|t| t.date).collect();
    dates.sort();
    assert_eq!(dates, vec![at(2024, 1, 31), at(2024, 2, 29), at(2024, 3, 31)]);
    assert!(linked(store, &stored.id).iter().all(|t| t.id.starts_with("BAU-")));
}

pub fn recurring_templates_are_validated(store: &dyn Storage) {
    let err = store
        .add_recurring_template(template(
            "Too many",
            -1.0,
            at(2024, 1, 1),
            RecurrenceInterval::Daily,
            MAX_OCCURRENCES + 1,
        ))
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::TooManyOccurrences { .. })
    ));
    assert!(store.recurring_templates().unwrap().is_empty());
    assert!(store.transactions().unwrap().is_empty());
}

pub fn unbounded_template_is_capped(store: &dyn Storage) {
    let stored = store
        .add_recurring_template(template(
            "Daily savings",
            5.0,
            at(2024, 1, 1),
            RecurrenceInterval::Daily,
            0,
        ))
        .unwrap();
    assert_eq!(linked(store, &stored.id).len(), MAX_OCCURRENCES as usize);
}

pub fn remove_all_drops_every_instance(store: &dyn Storage) {
    let stored = store
        .add_recurring_template(template(
            "Insurance",
            -90.0,
            at(2024, 1, 10),
            RecurrenceInterval::Monthly,
            12,
        ))
        .unwrap();
    store
        .add_transaction(expense("Unrelated", "Food", -5.0, at(2024, 2, 1)))
        .unwrap();
    store.remove_recurring_template(&stored.id, true).unwrap();
    assert!(linked(store, &stored.id).is_empty());
    assert!(store.recurring_templates().unwrap().is_empty());
    assert_eq!(store.transactions().unwrap().len(), 1);
}

pub fn remove_future_keeps_past_instances(store: &dyn Storage) {
    let stored = store
        .add_recurring_template(template(
            "Lunch plan",
            -8.0,
            at(2024, 6, 10),
            RecurrenceInterval::Daily,
            10,
        ))
        .unwrap();
    store.remove_recurring_template(&stored.id, false).unwrap();
    let left = linked(store, &stored.id);
    assert_eq!(left.len(), 6);
    assert!(left.iter().all(|txn| txn.date <= fixed_now()));
    assert!(store.recurring_template(&stored.id).unwrap_err().is_not_found());
}

pub fn update_future_only_regenerates_remainder(store: &dyn Storage) {
    let stored = store
        .add_recurring_template(template(
            "Streaming",
            -50.0,
            at(2024, 1, 1),
            RecurrenceInterval::Monthly,
            12,
        ))
        .unwrap();
    let mut changed = stored.clone();
    changed.amount = -60.0;
    let updated = store
        .update_recurring_template(&stored.id, changed, false)
        .unwrap();
    assert_eq!(updated.amount, -60.0);
    assert_eq!(store.recurring_template(&stored.id).unwrap().amount, -60.0);

    let instances = linked(store, &stored.id);
    assert_eq!(instances.len(), 12);
    let old: Vec<_> = instances.iter().filter(|t| t.amount == -50.0).collect();
    let new: Vec<_> = instances.iter().filter(|t| t.amount == -60.0).collect();
    assert_eq!(old.len(), 6);
    assert!(old.iter().all(|t| t.date <= fixed_now()));
    assert_eq!(new.len(), 6);
    assert!(new.iter().all(|t| t.date > fixed_now()));
    let mut new_dates: Vec<_> = new.iter().map(|t| t.date).collect();
    new_dates.sort();
    assert_eq!(new_dates.first(), Some(&at(2024, 7, 1)));
    assert_eq!(new_dates.last(), Some(&at(2024, 12, 1)));
}

pub fn update_all_regenerates_whole_series(store: &dyn Storage) {
    let stored = store
        .add_recurring_template(template(
            "Club",
            -20.0,
            at(2024, 1, 5),
            RecurrenceInterval::Weekly,
            4,
        ))
        .unwrap();
    let mut changed = stored.clone();
    changed.amount = -25.0;
    changed.occurrences = 6;
    store
        .update_recurring_template(&stored.id, changed, true)
        .unwrap();
    let instances = linked(store, &stored.id);
    assert_eq!(instances.len(), 6);
    assert!(instances.iter().all(|t| t.amount == -25.0));
    let mut dates: Vec<_> = instances.iter().map(|t| t.date).collect();
    dates.sort();
    assert_eq!(dates[0], at(2024, 1, 5));
    assert_eq!(dates[5], at(2024, 2, 9));
}

pub fn update_unknown_template_changes_nothing(store: &dyn Storage) {
    let before = store.transactions().unwrap();
    let err = store
        .update_recurring_template(
            "missing",
            template("Ghost", -1.0, at(2024, 1, 1), RecurrenceInterval::Daily, 3),
            true,
        )
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(store.transactions().unwrap(), before);
    assert!(store.recurring_templates().unwrap().is_empty());
}

/// Runs every scenario, each against a fresh store from `make`.
pub fn run_all<S: Storage>(make: impl Fn() -> S) {
    let scenarios: &[(&str, fn(&dyn Storage))] = &[
        ("add_then_get_round_trips", add_then_get_round_trips),
        ("add_fills_currency_and_date", add_fills_currency_and_date),
        ("ids_follow_direction_counters", ids_follow_direction_counters),
        ("duplicate_explicit_id_is_rejected", duplicate_explicit_id_is_rejected),
        ("listing_is_newest_first", listing_is_newest_first),
        ("validation_failures_store_nothing", validation_failures_store_nothing),
        ("non_finite_numbers_are_rejected", non_finite_numbers_are_rejected),
        ("text_is_sanitized_on_add", text_is_sanitized_on_add),
        ("update_replaces_fields", update_replaces_fields),
        ("unknown_ids_are_not_found", unknown_ids_are_not_found),
        ("removals_delete_only_named_rows", removals_delete_only_named_rows),
        ("config_updates_are_validated", config_updates_are_validated),
        ("recurring_add_materializes_series", recurring_add_materializes_series),
        ("recurring_templates_are_validated", recurring_templates_are_validated),
        ("unbounded_template_is_capped", unbounded_template_is_capped),
        ("remove_all_drops_every_instance", remove_all_drops_every_instance),
        ("remove_future_keeps_past_instances", remove_future_keeps_past_instances),
        ("update_future_only_regenerates_remainder", update_future_only_regenerates_remainder),
        ("update_all_regenerates_whole_series", update_all_regenerates_whole_series),
        ("update_unknown_template_changes_nothing", update_unknown_template_changes_nothing),
    ];
    for (name, scenario) in scenarios {
        eprintln!("scenario: {name}");
        let store = make();
        scenario(&store);
    }
}
