use costcalc_core::{
    Collection, CommitEvent, DurableStore, Expense, ExpenseValidationError, MemoryDurableStore,
    Person, PersonValidationError, ShareLink, StoreError, SyncController, UrlShareLink,
    WriteOutcome, EXPENSES_KEY, PEOPLE_KEY,
};
use std::cell::RefCell;
use std::rc::Rc;

fn steady_controller() -> SyncController<MemoryDurableStore, UrlShareLink> {
    let link = UrlShareLink::parse("http://localhost/?tab=ledger").unwrap();
    let mut controller = SyncController::new(MemoryDurableStore::new(), link);
    controller.bootstrap();
    controller
}

fn decoded_people(raw: &str) -> Vec<Person> {
    serde_json::from_str(raw).unwrap()
}

#[test]
fn commit_writes_both_channels() {
    let mut controller = steady_controller();

    controller.add_person("A").unwrap();

    let stored = controller.durable().get(PEOPLE_KEY).unwrap().to_string();
    assert_eq!(decoded_people(&stored), vec![Person::new("A")]);
    assert_eq!(controller.link().read_param(PEOPLE_KEY), Some(stored));
    assert_eq!(controller.link().read_param("tab").as_deref(), Some("ledger"));
    assert!(!controller.durable().contains_key(EXPENSES_KEY));
}

#[test]
fn link_rewrites_replace_the_history_entry() {
    let mut controller = steady_controller();

    controller.add_person("A").unwrap();
    controller.add_person("B").unwrap();
    controller
        .add_expense(Expense::new("Lunch").with_amount("A", 5.0))
        .unwrap();

    assert_eq!(controller.link().history_len(), 1);
}

#[test]
fn duplicate_name_leaves_roster_and_channels_unchanged() {
    let mut controller = steady_controller();
    controller.add_person("A").unwrap();
    let stored_before = controller.durable().get(PEOPLE_KEY).map(str::to_string);
    let revision_before = controller.roster().revision();

    let err = controller.add_person("A").unwrap_err();

    assert_eq!(
        err,
        StoreError::Person(PersonValidationError::DuplicateName("A".to_string()))
    );
    assert_eq!(controller.people(), &[Person::new("A")]);
    assert_eq!(controller.roster().revision(), revision_before);
    assert_eq!(controller.durable().get(PEOPLE_KEY).map(str::to_string), stored_before);
}

#[test]
fn empty_names_are_rejected() {
    let mut controller = steady_controller();

    assert_eq!(
        controller.add_person("").unwrap_err(),
        StoreError::Person(PersonValidationError::EmptyName)
    );
    assert_eq!(
        controller.add_expense(Expense::new("")).unwrap_err(),
        StoreError::Expense(ExpenseValidationError::EmptyName)
    );
    assert_eq!(controller.durable().used_bytes(), 0);
}

#[test]
fn emptied_collection_does_not_erase_persisted_state() {
    let mut controller = steady_controller();
    controller.add_person("A").unwrap();
    controller
        .add_expense(Expense::new("Lunch").with_amount("A", 10.0))
        .unwrap();
    let stored_people = controller.durable().get(PEOPLE_KEY).map(str::to_string);
    let stored_expenses = controller.durable().get(EXPENSES_KEY).map(str::to_string);
    let linked_people = controller.link().read_param(PEOPLE_KEY);
    let linked_expenses = controller.link().read_param(EXPENSES_KEY);

    controller.clear_roster();
    controller.clear_ledger();

    assert!(controller.people().is_empty());
    assert!(controller.expenses().is_empty());
    assert_eq!(controller.durable().get(PEOPLE_KEY).map(str::to_string), stored_people);
    assert_eq!(controller.durable().get(EXPENSES_KEY).map(str::to_string), stored_expenses);
    assert_eq!(controller.link().read_param(PEOPLE_KEY), linked_people);
    assert_eq!(controller.link().read_param(EXPENSES_KEY), linked_expenses);
}

#[test]
fn clear_data_erases_everything() {
    let mut controller = steady_controller();
    controller.add_person("A").unwrap();
    controller
        .add_expense(Expense::new("Lunch").with_amount("A", 10.0))
        .unwrap();

    controller.clear_data();

    assert!(controller.people().is_empty());
    assert!(controller.expenses().is_empty());
    assert!(!controller.durable().contains_key(PEOPLE_KEY));
    assert!(!controller.durable().contains_key(EXPENSES_KEY));
    for key in [PEOPLE_KEY, EXPENSES_KEY] {
        let raw = controller.link().read_param(key).unwrap();
        let decoded: Vec<serde_json::Value> = serde_json::from_str(&raw).unwrap();
        assert!(decoded.is_empty());
    }
    assert_eq!(controller.link().read_param("tab").as_deref(), Some("ledger"));
}

#[test]
fn commit_events_report_write_outcomes() {
    let mut controller = steady_controller();
    let events: Rc<RefCell<Vec<CommitEvent>>> = Rc::default();
    let sink = Rc::clone(&events);
    controller.subscribe(move |event| sink.borrow_mut().push(*event));

    controller.add_person("A").unwrap();
    controller.add_person("A").unwrap_err();
    controller.set_checked("nobody", true);
    controller.clear_roster();
    controller.clear_data();

    let outcomes: Vec<(Collection, WriteOutcome)> = events
        .borrow()
        .iter()
        .map(|event| (event.collection, event.outcome))
        .collect();
    let written = WriteOutcome::Written {
        durable_ok: true,
        link_ok: true,
    };
    assert_eq!(
        outcomes,
        vec![
            (Collection::Roster, written),
            (Collection::Roster, WriteOutcome::SkippedEmpty),
            (Collection::Roster, WriteOutcome::SkippedEmpty),
            (Collection::Ledger, WriteOutcome::SkippedEmpty),
            (Collection::Roster, WriteOutcome::Cleared),
            (Collection::Ledger, WriteOutcome::Cleared),
        ]
    );
}

#[test]
fn storage_quota_failure_is_absorbed() {
    let link = UrlShareLink::parse("http://localhost/").unwrap();
    let mut controller = SyncController::new(MemoryDurableStore::with_quota(8), link);
    controller.bootstrap();
    let events: Rc<RefCell<Vec<CommitEvent>>> = Rc::default();
    let sink = Rc::clone(&events);
    controller.subscribe(move |event| sink.borrow_mut().push(*event));

    controller.add_person("A").unwrap();

    assert_eq!(controller.people(), &[Person::new("A")]);
    assert!(!controller.durable().contains_key(PEOPLE_KEY));
    assert!(controller.link().read_param(PEOPLE_KEY).is_some());
    assert_eq!(
        events.borrow()[0].outcome,
        WriteOutcome::Written {
            durable_ok: false,
            link_ok: true,
        }
    );
}

#[test]
fn unavailable_link_is_absorbed() {
    let mut controller = SyncController::new(MemoryDurableStore::new(), UrlShareLink::detached());
    controller.bootstrap();

    controller.add_person("A").unwrap();
    controller.clear_data();
    controller.add_person("B").unwrap();

    assert_eq!(controller.people(), &[Person::new("B")]);
    let stored = controller.durable().get(PEOPLE_KEY).unwrap();
    assert_eq!(decoded_people(stored), vec![Person::new("B")]);
}

#[test]
fn replace_expense_out_of_range_is_rejected() {
    let mut controller = steady_controller();

    let err = controller
        .replace_expense_at(3, Expense::new("Late"))
        .unwrap_err();

    assert_eq!(err, StoreError::IndexOutOfRange { index: 3, len: 0 });
    assert!(!controller.durable().contains_key(EXPENSES_KEY));
}

#[test]
fn direct_durable_writes_are_visible_to_the_next_session() {
    let mut durable = MemoryDurableStore::new();
    durable
        .save(PEOPLE_KEY, r#"[{"name":"Z","checked":true}]"#)
        .unwrap();
    let mut controller = SyncController::new(durable, UrlShareLink::detached());

    controller.bootstrap();

    assert_eq!(controller.roster().selected(), vec!["Z"]);
}
