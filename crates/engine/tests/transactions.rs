use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{
    Category, Engine, EngineError, NewTransaction, PaymentMethod, TransactionListFilter,
    TransactionPatch,
};
use migration::MigratorTrait;
use uuid::Uuid;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    engine.create_user("alice", "password", None).await.unwrap();
    engine.create_user("bob", "hunter2", None).await.unwrap();
    (engine, db)
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn expense(date: NaiveDate, description: &str, category: Category, amount_minor: i64) -> NewTransaction {
    NewTransaction {
        date,
        description: description.to_string(),
        category,
        amount_minor,
        method: PaymentMethod::Debit,
        unnecessary: false,
        tags: None,
    }
}

#[tokio::test]
async fn create_stores_negative_amount() {
    let (engine, _db) = engine_with_db().await;

    let created = engine
        .create_transaction(
            "alice",
            expense(day(2024, 3, 10), "Almuerzo", Category::Comida, 1250),
        )
        .await
        .unwrap();
    assert_eq!(created.amount_minor, -1250);

    let loaded = engine.transaction("alice", created.id).await.unwrap();
    assert_eq!(loaded.id, created.id);
    assert_eq!(loaded.date, day(2024, 3, 10));
    assert_eq!(loaded.description, "Almuerzo");
    assert_eq!(loaded.category, Category::Comida);
    assert_eq!(loaded.amount_minor, -1250);
}

#[tokio::test]
async fn create_rejects_zero_amount_and_blank_description() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .create_transaction("alice", expense(day(2024, 3, 1), "Bus", Category::Transporte, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    let err = engine
        .create_transaction("alice", expense(day(2024, 3, 1), "   ", Category::Transporte, 5))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));
}

#[tokio::test]
async fn create_for_unknown_user_is_not_found() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .create_transaction("carol", expense(day(2024, 3, 1), "Cine", Category::Entretenimiento, 5))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn foreign_transaction_is_forbidden() {
    let (engine, _db) = engine_with_db().await;

    let created = engine
        .create_transaction("alice", expense(day(2024, 3, 10), "Farmacia", Category::Salud, 900))
        .await
        .unwrap();

    let err = engine.transaction("bob", created.id).await.unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    let err = engine
        .update_transaction(
            "bob",
            created.id,
            TransactionPatch {
                amount_minor: Some(1),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    let err = engine.delete_transaction("bob", created.id).await.unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    // Untouched by the rejected writes.
    let loaded = engine.transaction("alice", created.id).await.unwrap();
    assert_eq!(loaded.amount_minor, -900);

    let err = engine.transaction("alice", Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn update_applies_only_given_fields() {
    let (engine, _db) = engine_with_db().await;

    let created = engine
        .create_transaction("alice", expense(day(2024, 3, 10), "Ropa", Category::Compras, 4000))
        .await
        .unwrap();

    let updated = engine
        .update_transaction(
            "alice",
            created.id,
            TransactionPatch {
                unnecessary: Some(true),
                method: Some(PaymentMethod::Credit),
                tags: Some(Some("impulso".to_string())),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(updated.unnecessary);
    assert_eq!(updated.method, PaymentMethod::Credit);
    assert_eq!(updated.description, "Ropa");
    assert_eq!(updated.amount_minor, -4000);
    assert_eq!(updated.tags.as_deref(), Some("impulso"));

    let err = engine
        .update_transaction("alice", created.id, TransactionPatch::default())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));
}

#[tokio::test]
async fn delete_removes_the_row() {
    let (engine, _db) = engine_with_db().await;

    let created = engine
        .create_transaction("alice", expense(day(2024, 3, 10), "Luz", Category::Servicios, 300))
        .await
        .unwrap();
    engine.delete_transaction("alice", created.id).await.unwrap();

    let err = engine.transaction("alice", created.id).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn list_filters_and_orders_newest_first() {
    let (engine, _db) = engine_with_db().await;

    engine
        .create_transaction("alice", expense(day(2024, 2, 28), "Taxi aeropuerto", Category::Transporte, 100))
        .await
        .unwrap();
    engine
        .create_transaction("alice", expense(day(2024, 3, 1), "Supermercado", Category::Comida, 200))
        .await
        .unwrap();
    engine
        .create_transaction(
            "alice",
            NewTransaction {
                unnecessary: true,
                ..expense(day(2024, 3, 31), "Taxi noche", Category::Transporte, 300)
            },
        )
        .await
        .unwrap();
    engine
        .create_transaction("bob", expense(day(2024, 3, 15), "Taxi", Category::Transporte, 50))
        .await
        .unwrap();

    let all = engine
        .list_transactions("alice", &TransactionListFilter::default())
        .await
        .unwrap();
    let dates: Vec<_> = all.iter().map(|tx| tx.date).collect();
    assert_eq!(dates, vec![day(2024, 3, 31), day(2024, 3, 1), day(2024, 2, 28)]);

    let march = engine
        .list_transactions(
            "alice",
            &TransactionListFilter {
                from: Some(day(2024, 3, 1)),
                to: Some(day(2024, 3, 31)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(march.len(), 2);

    let taxis = engine
        .list_transactions(
            "alice",
            &TransactionListFilter {
                search: Some("TAXI".to_string()),
                category: Some(Category::Transporte),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(taxis.len(), 2);

    let flagged = engine
        .list_transactions(
            "alice",
            &TransactionListFilter {
                unnecessary: Some(true),
                limit: Some(5),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(flagged.len(), 1);
    assert_eq!(flagged[0].description, "Taxi noche");

    let limited = engine
        .list_transactions(
            "alice",
            &TransactionListFilter {
                limit: Some(1),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(limited.len(), 1);
    assert_eq!(limited[0].date, day(2024, 3, 31));
}

#[tokio::test]
async fn search_matches_wildcards_literally() {
    let (engine, _db) = engine_with_db().await;

    for description in ["Cafe", "Cine 50% off", "Pago_luz", "Pagoxluz", "Oferta!"] {
        engine
            .create_transaction(
                "alice",
                expense(day(2024, 3, 4), description, Category::Otros, 100),
            )
            .await
            .unwrap();
    }

    let search = |text: &str| TransactionListFilter {
        search: Some(text.to_string()),
        ..Default::default()
    };
    let descriptions = |found: Vec<engine::Transaction>| {
        found.into_iter().map(|tx| tx.description).collect::<Vec<_>>()
    };

    let percent = engine.list_transactions("alice", &search("%")).await.unwrap();
    assert_eq!(descriptions(percent), vec!["Cine 50% off"]);

    let underscore = engine.list_transactions("alice", &search("o_l")).await.unwrap();
    assert_eq!(descriptions(underscore), vec!["Pago_luz"]);

    let bang = engine.list_transactions("alice", &search("a!")).await.unwrap();
    assert_eq!(descriptions(bang), vec!["Oferta!"]);
}

#[tokio::test]
async fn stored_unknown_category_surfaces_as_error() {
    let (engine, db) = engine_with_db().await;

    let created = engine
        .create_transaction("alice", expense(day(2024, 3, 10), "Viaje", Category::Otros, 100))
        .await
        .unwrap();
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "UPDATE transactions SET category = ? WHERE id = ?",
        vec!["Viajes".into(), created.id.to_string().into()],
    ))
    .await
    .unwrap();

    let err = engine
        .list_transactions("alice", &TransactionListFilter::default())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidCategory(_)));
}

#[tokio::test]
async fn deleting_a_user_removes_its_data() {
    let (engine, _db) = engine_with_db().await;

    engine
        .create_transaction("bob", expense(day(2024, 3, 10), "Curso", Category::Educacion, 100))
        .await
        .unwrap();
    engine.delete_user("bob").await.unwrap();

    let err = engine.user("bob").await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
    let left = engine
        .list_transactions("bob", &TransactionListFilter::default())
        .await
        .unwrap();
    assert!(left.is_empty());

    let users = engine.list_users().await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].username, "alice");
}

#[tokio::test]
async fn authenticate_checks_the_password() {
    let (engine, _db) = engine_with_db().await;

    assert!(engine.authenticate("alice", "password").await.unwrap().is_some());
    assert!(engine.authenticate("alice", "pass").await.unwrap().is_none());
    assert!(engine.authenticate("nobody", "password").await.unwrap().is_none());

    let err = engine.create_user("alice", "x", None).await.unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));

    let renamed = engine.update_user("alice", Some(" Alice ")).await.unwrap();
    assert_eq!(renamed.name.as_deref(), Some("Alice"));
}
