use costcalc_core::{
    column_total, equal_split, Expense, ExpenseDraft, MemoryDurableStore, SyncController,
    UrlShareLink,
};

fn controller_with_people(names: &[&str]) -> SyncController<MemoryDurableStore, UrlShareLink> {
    let link = UrlShareLink::parse("http://localhost/").unwrap();
    let mut controller = SyncController::new(MemoryDurableStore::new(), link);
    controller.bootstrap();
    for name in names {
        controller.add_person(name).unwrap();
    }
    controller
}

#[test]
fn column_totals_sum_each_person() {
    let ledger = vec![
        Expense::new("Lunch").with_amount("A", 10.0).with_amount("B", 0.0),
        Expense::new("Taxi").with_amount("A", 0.0).with_amount("B", 20.0),
    ];

    assert_eq!(column_total(&ledger, "A"), 10.0);
    assert_eq!(column_total(&ledger, "B"), 20.0);
}

#[test]
fn totals_row_follows_roster_order_and_ignores_removed_people() {
    let mut controller = controller_with_people(&["B", "A"]);
    controller
        .add_expense(
            Expense::new("Lunch")
                .with_amount("A", 10.0)
                .with_amount("Gone", 7.0),
        )
        .unwrap();

    assert_eq!(
        controller.column_totals(),
        vec![("B".to_string(), 0.0), ("A".to_string(), 10.0)]
    );
}

#[test]
fn equal_split_assigns_same_share() {
    let split = equal_split(30.0, &["A", "B", "C"]).unwrap();

    assert_eq!(split.len(), 3);
    assert!(split.values().all(|share| *share == 10.0));
}

#[test]
fn equal_split_with_nobody_selected_assigns_nothing() {
    let nobody: &[&str] = &[];
    assert!(equal_split(10.0, nobody).is_none());

    let controller = controller_with_people(&["A", "B"]);
    assert!(controller.split_selected(10.0).is_none());
}

#[test]
fn split_uses_checked_people_and_saves_covering_roster() {
    let mut controller = controller_with_people(&["A", "B", "C"]);
    controller.set_checked("A", true);
    controller.set_checked("C", true);

    let draft = ExpenseDraft {
        name: "Dinner".to_string(),
        amounts: controller.split_selected(25.0).unwrap(),
    };
    controller.save_draft(&draft, None).unwrap();
    controller.reset_all_checked();

    let saved = &controller.expenses()[0];
    assert_eq!(saved.amount_for("A"), 12.5);
    assert_eq!(saved.amount_for("B"), 0.0);
    assert_eq!(saved.amount_for("C"), 12.5);
    assert!(controller.roster().selected().is_empty());
}

#[test]
fn edit_draft_only_shows_present_people_until_saved() {
    let mut controller = SyncController::new(
        MemoryDurableStore::new(),
        UrlShareLink::parse(
            "http://localhost/?people=%5B%7B%22name%22%3A%22A%22%7D%5D\
             &expenses=%5B%7B%22name%22%3A%22Old%22%2C%22A%22%3A4%2C%22Gone%22%3A9%7D%5D",
        )
        .unwrap(),
    );
    controller.bootstrap();

    let mut draft = controller.draft_for_edit(0).unwrap();
    assert_eq!(draft.name, "Old");
    assert_eq!(draft.amounts.len(), 1);
    assert_eq!(draft.amounts["A"], 4.0);
    assert!(controller.expenses()[0].amounts.contains_key("Gone"));

    draft.amounts.insert("A".to_string(), 6.0);
    controller.save_draft(&draft, Some(0)).unwrap();

    let saved = &controller.expenses()[0];
    assert_eq!(saved.amount_for("A"), 6.0);
    assert!(!saved.amounts.contains_key("Gone"));
    assert_eq!(controller.expenses().len(), 1);
}

#[test]
fn totals_are_recomputed_after_every_change() {
    let mut controller = controller_with_people(&["A"]);
    controller
        .add_expense(Expense::new("One").with_amount("A", 1.25))
        .unwrap();
    assert_eq!(controller.column_total("A"), 1.25);

    controller
        .replace_expense_at(0, Expense::new("One").with_amount("A", 3.0))
        .unwrap();
    controller
        .add_expense(Expense::new("Two").with_amount("A", 2.0))
        .unwrap();
    assert_eq!(controller.column_total("A"), 5.0);
}

#[test]
fn draft_for_missing_index_is_none() {
    let controller = controller_with_people(&["A"]);
    assert!(controller.draft_for_edit(0).is_none());
}
