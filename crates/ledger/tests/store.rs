use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use ledger::{
    AccountDraft, AccountKind, Category, DebtDraft, DebtKind, DebtPatch, ExpenseDraft,
    FetchOutcome, Frequency, IncomeDraft, Ledger, LedgerError, SectionFetch,
};
use migration::MigratorTrait;

async fn db_with_users() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    for username in ["alice", "bob"] {
        db.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO users (username, password) VALUES (?, ?)",
            vec![username.into(), "password".into()],
        ))
        .await
        .unwrap();
    }
    db
}

async fn ledger_for(db: &DatabaseConnection, owner: &str) -> Ledger {
    let mut ledger = Ledger::builder().owner(owner).database(db.clone()).build();
    ledger.fetch_data().await;
    ledger
}

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn groceries() -> ExpenseDraft {
    ExpenseDraft {
        amount_cents: 4550,
        category: Category::Food,
        date: date("2025-04-05"),
        description: "Grocery shopping".to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn add_then_edit_with_same_values_is_a_round_trip() {
    let db = db_with_users().await;
    let mut ledger = ledger_for(&db, "alice").await;

    let created = ledger.add_expense(groceries()).await.unwrap().unwrap();
    let before = ledger.expenses().to_vec();

    ledger.edit_expense(&created.id, groceries()).await.unwrap();
    assert_eq!(ledger.expenses(), before.as_slice());
}

#[tokio::test]
async fn delete_nonexistent_id_leaves_collection_unchanged() {
    let db = db_with_users().await;
    let mut ledger = ledger_for(&db, "alice").await;

    ledger.add_expense(groceries()).await.unwrap();
    let before = ledger.expenses().to_vec();

    ledger.delete_expense("nonexistent").await.unwrap();
    assert_eq!(ledger.expenses(), before.as_slice());
}

#[tokio::test]
async fn rows_are_invisible_and_immutable_across_owners() {
    let db = db_with_users().await;
    let mut alice = ledger_for(&db, "alice").await;
    let created = alice.add_expense(groceries()).await.unwrap().unwrap();

    let mut bob = ledger_for(&db, "bob").await;
    assert!(bob.expenses().is_empty());

    let mut foreign = groceries();
    foreign.description = "Hijacked".to_string();
    bob.edit_expense(&created.id, foreign).await.unwrap();
    bob.delete_expense(&created.id).await.unwrap();

    // Alice's row survives both attempts untouched.
    let alice_again = ledger_for(&db, "alice").await;
    assert_eq!(alice_again.expenses().len(), 1);
    assert_eq!(alice_again.expenses()[0].description, "Grocery shopping");
}

#[tokio::test]
async fn fetch_orders_expenses_desc_and_debts_by_due_date() {
    let db = db_with_users().await;
    let mut ledger = ledger_for(&db, "alice").await;

    for day in ["2025-04-03", "2025-04-10", "2025-04-07"] {
        let mut draft = groceries();
        draft.date = date(day);
        ledger.add_expense(draft).await.unwrap();
    }
    for due in ["2025-06-01", "2025-05-01", "2025-07-01"] {
        ledger
            .add_debt(DebtDraft {
                name: format!("due {due}"),
                amount_cents: 100_000,
                remaining_cents: 60_000,
                kind: DebtKind::Loan,
                due_date: date(due),
                ..Default::default()
            })
            .await
            .unwrap();
    }

    let refetched = ledger_for(&db, "alice").await;
    let expense_dates: Vec<NaiveDate> = refetched.expenses().iter().map(|e| e.date).collect();
    assert_eq!(
        expense_dates,
        vec![date("2025-04-10"), date("2025-04-07"), date("2025-04-03")]
    );
    let due_dates: Vec<NaiveDate> = refetched.debts().iter().map(|d| d.due_date).collect();
    assert_eq!(
        due_dates,
        vec![date("2025-05-01"), date("2025-06-01"), date("2025-07-01")]
    );
}

#[tokio::test]
async fn totals_match_known_samples() {
    let db = db_with_users().await;
    let mut ledger = ledger_for(&db, "alice").await;

    ledger
        .add_income(IncomeDraft {
            amount_cents: 120_000,
            source: "Salary".to_string(),
            date: date("2025-04-01"),
            description: "Monthly salary".to_string(),
        })
        .await
        .unwrap();
    ledger
        .add_income(IncomeDraft {
            amount_cents: 25_000,
            source: "Freelance".to_string(),
            date: date("2025-04-15"),
            description: "Website project".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(ledger.total_income_cents(), 145_000);

    for (name, cents, kind) in [
        ("Main Bank", 254_050, AccountKind::Bank),
        ("Savings", 500_025, AccountKind::Savings),
        ("Cash", 15_000, AccountKind::Cash),
        ("Credit Card", -45_075, AccountKind::Credit),
    ] {
        ledger
            .add_account(AccountDraft {
                name: name.to_string(),
                balance_cents: cents,
                color: "#3b82f6".to_string(),
                kind,
            })
            .await
            .unwrap();
    }
    assert_eq!(ledger.total_balance_cents(), 724_000);
}

#[tokio::test]
async fn signed_out_store_is_empty_and_soft_noops() {
    let db = db_with_users().await;
    let mut ledger = Ledger::builder().database(db.clone()).build();

    assert!(ledger.loading());
    assert_eq!(ledger.fetch_data().await, FetchOutcome::SignedOut);
    assert!(!ledger.loading());
    assert!(ledger.expenses().is_empty());

    assert_eq!(ledger.add_expense(groceries()).await.unwrap(), None);
    ledger.delete_expense("anything").await.unwrap();
    assert!(ledger.expenses().is_empty());
}

#[tokio::test]
async fn snapshot_for_previous_owner_is_discarded() {
    let db = db_with_users().await;
    let mut alice = ledger_for(&db, "alice").await;
    alice.add_expense(groceries()).await.unwrap();

    let mut ledger = Ledger::builder()
        .owner("alice")
        .database(db.clone())
        .build();
    let stale = ledger.load_snapshot().await;

    // The owner changes while alice's rows are still in flight.
    ledger.bind_owner(Some("bob".to_string()));
    assert_eq!(ledger.apply_snapshot(stale), FetchOutcome::Stale);
    assert!(ledger.expenses().is_empty());

    // A fresh fetch for the new owner works as usual.
    match ledger.fetch_data().await {
        FetchOutcome::Applied(report) => assert!(report.fully_loaded()),
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(ledger.expenses().is_empty());
}

#[tokio::test]
async fn fetch_report_counts_each_section() {
    let db = db_with_users().await;
    let mut ledger = ledger_for(&db, "alice").await;

    ledger.add_expense(groceries()).await.unwrap();
    ledger
        .add_income(IncomeDraft {
            amount_cents: 1000,
            source: "Tip".to_string(),
            date: date("2025-04-02"),
            description: String::new(),
        })
        .await
        .unwrap();

    match ledger.fetch_data().await {
        FetchOutcome::Applied(report) => {
            assert_eq!(report.expenses, SectionFetch::Loaded(1));
            assert_eq!(report.incomes, SectionFetch::Loaded(1));
            assert_eq!(report.accounts, SectionFetch::Loaded(0));
            assert_eq!(report.debts, SectionFetch::Loaded(0));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test]
async fn invalid_debt_is_rejected_before_reaching_the_store() {
    let db = db_with_users().await;
    let mut ledger = ledger_for(&db, "alice").await;

    let result = ledger
        .add_debt(DebtDraft {
            name: "Bad".to_string(),
            amount_cents: 1000,
            remaining_cents: 2000,
            kind: DebtKind::Loan,
            due_date: date("2025-05-01"),
            ..Default::default()
        })
        .await;
    assert!(matches!(result, Err(LedgerError::InvalidDebt(_))));
    assert!(ledger.debts().is_empty());
}

#[tokio::test]
async fn debt_patch_updates_fields_and_keeps_invariant() {
    let db = db_with_users().await;
    let mut ledger = ledger_for(&db, "alice").await;

    let debt = ledger
        .add_debt(DebtDraft {
            name: "Card".to_string(),
            amount_cents: 80_000,
            remaining_cents: 50_000,
            kind: DebtKind::CreditCard,
            closing_date: Some(date("2025-04-28")),
            due_date: date("2025-05-10"),
            ..Default::default()
        })
        .await
        .unwrap()
        .unwrap();

    ledger
        .update_debt(
            &debt.id,
            DebtPatch {
                remaining_cents: Some(30_000),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(ledger.debts()[0].remaining_cents, 30_000);

    let overdrawn = ledger
        .update_debt(
            &debt.id,
            DebtPatch {
                remaining_cents: Some(90_000),
                ..Default::default()
            },
        )
        .await;
    assert!(overdrawn.is_err());
    assert_eq!(ledger.debts()[0].remaining_cents, 30_000);

    // The patched row is what a fresh session sees.
    let refetched = ledger_for(&db, "alice").await;
    assert_eq!(refetched.debts()[0].remaining_cents, 30_000);
}

#[tokio::test]
async fn account_balance_partial_update() {
    let db = db_with_users().await;
    let mut ledger = ledger_for(&db, "alice").await;

    let account = ledger
        .add_account(AccountDraft {
            name: "Main Bank".to_string(),
            balance_cents: 100_000,
            color: "#3b82f6".to_string(),
            kind: AccountKind::Bank,
        })
        .await
        .unwrap()
        .unwrap();

    ledger
        .update_account_balance(&account.id, 42_000)
        .await
        .unwrap();
    assert_eq!(ledger.accounts()[0].balance_cents, 42_000);
    assert_eq!(ledger.accounts()[0].name, "Main Bank");
}

#[tokio::test]
async fn recurring_template_gets_a_cursor_on_insert() {
    let db = db_with_users().await;
    let mut ledger = ledger_for(&db, "alice").await;

    let template = ledger
        .add_expense(ExpenseDraft {
            amount_cents: 9000,
            category: Category::Home,
            date: date("2025-01-31"),
            description: "Internet".to_string(),
            is_recurring: true,
            ..Default::default()
        })
        .await
        .unwrap()
        .unwrap();

    assert_eq!(template.frequency, Some(Frequency::Monthly));
    assert_eq!(template.base_amount_cents, Some(9000));
    assert_eq!(template.next_due_date, Some(date("2025-02-28")));
}

#[tokio::test]
async fn materialize_recurring_creates_due_instances_and_advances() {
    let db = db_with_users().await;
    let mut ledger = ledger_for(&db, "alice").await;

    let template = ledger
        .add_expense(ExpenseDraft {
            amount_cents: 1200,
            category: Category::Entertainment,
            date: date("2025-04-05"),
            description: "Streaming".to_string(),
            is_recurring: true,
            frequency: Some(Frequency::Monthly),
            next_due_date: Some(date("2025-05-05")),
            ..Default::default()
        })
        .await
        .unwrap()
        .unwrap();

    let created = ledger
        .materialize_recurring(date("2025-07-10"))
        .await
        .unwrap();

    let mut dates: Vec<NaiveDate> = created.iter().map(|e| e.date).collect();
    dates.sort();
    assert_eq!(
        dates,
        vec![date("2025-05-05"), date("2025-06-05"), date("2025-07-05")]
    );
    assert!(
        created
            .iter()
            .all(|e| e.parent_expense_id.as_deref() == Some(template.id.as_str()))
    );

    let advanced = ledger
        .expenses()
        .iter()
        .find(|e| e.id == template.id)
        .unwrap();
    assert_eq!(advanced.next_due_date, Some(date("2025-08-05")));
    assert_eq!(advanced.last_occurrence, Some(date("2025-07-05")));

    // Nothing further is due; a second pass is a no-op.
    let again = ledger
        .materialize_recurring(date("2025-07-10"))
        .await
        .unwrap();
    assert!(again.is_empty());
}

#[tokio::test]
async fn category_rename_and_delete_persist() {
    let db = db_with_users().await;
    let mut ledger = ledger_for(&db, "alice").await;

    ledger.add_expense(groceries()).await.unwrap();
    let mut cinema = groceries();
    cinema.category = Category::Entertainment;
    cinema.description = "Movie tickets".to_string();
    ledger.add_expense(cinema).await.unwrap();

    let moved = ledger
        .rename_category(Category::Food, Category::Other)
        .await
        .unwrap();
    assert_eq!(moved, 1);
    assert_eq!(ledger.category_expense_count(Category::Food), 0);
    assert_eq!(ledger.category_expense_count(Category::Other), 1);

    let removed = ledger.delete_category(Category::Entertainment).await.unwrap();
    assert_eq!(removed, 1);

    // Both survive a wholesale refetch.
    let refetched = ledger_for(&db, "alice").await;
    assert_eq!(refetched.expenses().len(), 1);
    assert_eq!(refetched.expenses()[0].category, Category::Other);
}

#[tokio::test]
async fn rename_category_to_itself_is_rejected() {
    let db = db_with_users().await;
    let mut ledger = ledger_for(&db, "alice").await;

    let result = ledger.rename_category(Category::Food, Category::Food).await;
    assert!(matches!(result, Err(LedgerError::InvalidCategory(_))));
}
