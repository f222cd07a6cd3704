use std::{collections::HashMap, sync::Arc};

use axum::{
    Extension, Json, Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use tokio::sync::RwLock;

use crate::{accounts, categories, debts, expenses, incomes, statistics, user};
use api_types::refresh::{RefreshResponse, SectionStatus};
use ledger::{FetchOutcome, Ledger, SectionFetch};

type LedgerRegistry = Arc<RwLock<HashMap<String, Arc<RwLock<Ledger>>>>>;

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    ledgers: LedgerRegistry,
}

impl ServerState {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            ledgers: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// The session store for `owner`, built (and loaded) on first use.
    pub async fn ledger_for(&self, owner: &str) -> Arc<RwLock<Ledger>> {
        if let Some(existing) = self.ledgers.read().await.get(owner) {
            return existing.clone();
        }

        let mut registry = self.ledgers.write().await;
        // Another request may have built it while we waited for the lock.
        if let Some(existing) = registry.get(owner) {
            return existing.clone();
        }

        let mut built = Ledger::builder()
            .owner(owner)
            .database(self.db.clone())
            .build();
        built.fetch_data().await;
        let entry = Arc::new(RwLock::new(built));
        registry.insert(owner.to_string(), entry.clone());
        entry
    }
}

async fn auth(
    auth_header: TypedHeader<Authorization<Basic>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if auth_header.username().is_empty() || auth_header.password().is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let found: Option<user::Model> = user::Entity::find()
        .filter(user::Column::Username.eq(auth_header.username()))
        .filter(user::Column::Password.eq(auth_header.password()))
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let Some(found) = found else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    request.extensions_mut().insert(found);
    Ok(next.run(request).await)
}

fn section_status(section: SectionFetch) -> SectionStatus {
    match section {
        SectionFetch::Loaded(count) => SectionStatus {
            loaded: true,
            count: Some(count as u64),
        },
        SectionFetch::Failed => SectionStatus {
            loaded: false,
            count: None,
        },
    }
}

/// Re-runs the full fetch for the caller's session store.
async fn refresh(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<RefreshResponse>, crate::ServerError> {
    let store = state.ledger_for(&user.username).await;
    let mut store = store.write().await;

    match store.fetch_data().await {
        FetchOutcome::Applied(report) => Ok(Json(RefreshResponse {
            expenses: section_status(report.expenses),
            incomes: section_status(report.incomes),
            accounts: section_status(report.accounts),
            debts: section_status(report.debts),
        })),
        // Neither can happen for a registry store: the owner is fixed and
        // the write lock is held across the whole fetch.
        FetchOutcome::Stale | FetchOutcome::SignedOut => Err(crate::ServerError::Generic(
            "refresh superseded".to_string(),
        )),
    }
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/expenses", get(expenses::list).post(expenses::create))
        .route("/expenses/materialize", post(expenses::materialize))
        .route(
            "/expenses/{id}",
            axum::routing::patch(expenses::update).delete(expenses::remove),
        )
        .route("/incomes", get(incomes::list).post(incomes::create))
        .route(
            "/incomes/{id}",
            axum::routing::patch(incomes::update).delete(incomes::remove),
        )
        .route("/accounts", get(accounts::list).post(accounts::create))
        .route(
            "/accounts/{id}",
            axum::routing::patch(accounts::update).delete(accounts::remove),
        )
        .route(
            "/accounts/{id}/balance",
            axum::routing::patch(accounts::update_balance),
        )
        .route("/debts", get(debts::list).post(debts::create))
        .route(
            "/debts/{id}",
            axum::routing::patch(debts::update).delete(debts::remove),
        )
        .route("/categories", get(categories::list))
        .route(
            "/categories/{category}",
            axum::routing::patch(categories::rename).delete(categories::remove),
        )
        .route("/stats", get(statistics::totals))
        .route("/stats/monthly", get(statistics::monthly))
        .route("/stats/breakdown", get(statistics::breakdown))
        .route("/stats/urgentDebts", get(statistics::urgent_debts))
        .route("/stats/recentExpenses", get(statistics::recent_expenses))
        .route("/refresh", post(refresh))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .with_state(state)
}

pub async fn run(db: DatabaseConnection) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(db, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState::new(db);

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(db, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, header};
    use base64::Engine;
    use http_body_util::BodyExt;
    use migration::MigratorTrait;
    use sea_orm::{ConnectionTrait, Database, Statement};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    async fn test_app() -> Router {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();
        let backend = db.get_database_backend();
        db.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO users (username, password) VALUES (?, ?)",
            vec!["alice".into(), "password".into()],
        ))
        .await
        .unwrap();
        router(ServerState::new(db))
    }

    fn basic_auth() -> String {
        let encoded = base64::engine::general_purpose::STANDARD.encode("alice:password");
        format!("Basic {encoded}")
    }

    fn request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, basic_auth())
            .header(header::CONTENT_TYPE, "application/json");
        match body {
            Some(value) => builder.body(Body::from(value.to_string())).unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn rejects_missing_credentials() {
        let app = test_app().await;
        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/stats")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn expense_crud_round_trip() {
        let app = test_app().await;

        let created = app
            .clone()
            .oneshot(request(
                "POST",
                "/expenses",
                Some(json!({
                    "amount_cents": 4550,
                    "category": "food",
                    "date": "2025-04-05",
                    "description": "Grocery shopping"
                })),
            ))
            .await
            .unwrap();
        assert_eq!(created.status(), StatusCode::CREATED);
        let created = json_body(created).await;
        let id = created["id"].as_str().unwrap().to_string();
        assert_eq!(created["category"], "food");

        let listed = app
            .clone()
            .oneshot(request("GET", "/expenses", None))
            .await
            .unwrap();
        let listed = json_body(listed).await;
        assert_eq!(listed["expenses"].as_array().unwrap().len(), 1);

        let updated = app
            .clone()
            .oneshot(request(
                "PATCH",
                &format!("/expenses/{id}"),
                Some(json!({
                    "amount_cents": 5000,
                    "category": "food",
                    "date": "2025-04-05",
                    "description": "Grocery shopping"
                })),
            ))
            .await
            .unwrap();
        assert_eq!(updated.status(), StatusCode::NO_CONTENT);

        let removed = app
            .clone()
            .oneshot(request("DELETE", &format!("/expenses/{id}"), None))
            .await
            .unwrap();
        assert_eq!(removed.status(), StatusCode::NO_CONTENT);

        let listed = app
            .oneshot(request("GET", "/expenses", None))
            .await
            .unwrap();
        let listed = json_body(listed).await;
        assert!(listed["expenses"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn totals_reflect_incomes_and_accounts() {
        let app = test_app().await;

        for (amount, source, date) in [
            (120_000, "Salary", "2025-04-01"),
            (25_000, "Freelance", "2025-04-15"),
        ] {
            let response = app
                .clone()
                .oneshot(request(
                    "POST",
                    "/incomes",
                    Some(json!({
                        "amount_cents": amount,
                        "source": source,
                        "date": date,
                        "description": ""
                    })),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        for (name, balance, kind) in [
            ("Main Bank", 254_050, "bank"),
            ("Savings", 500_025, "savings"),
            ("Cash", 15_000, "cash"),
            ("Credit Card", -45_075, "credit"),
        ] {
            let response = app
                .clone()
                .oneshot(request(
                    "POST",
                    "/accounts",
                    Some(json!({
                        "name": name,
                        "balance_cents": balance,
                        "color": "#3b82f6",
                        "kind": kind
                    })),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        let stats = app.oneshot(request("GET", "/stats", None)).await.unwrap();
        let stats = json_body(stats).await;
        assert_eq!(stats["total_income_cents"], 145_000);
        assert_eq!(stats["total_balance_cents"], 724_000);
        assert_eq!(stats["total_expenses_cents"], 0);
    }

    #[tokio::test]
    async fn invalid_debt_is_unprocessable() {
        let app = test_app().await;

        let response = app
            .oneshot(request(
                "POST",
                "/debts",
                Some(json!({
                    "name": "Bad",
                    "amount_cents": 1000,
                    "remaining_cents": 2000,
                    "kind": "loan",
                    "due_date": "2025-05-01"
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn categories_list_covers_the_fixed_set() {
        let app = test_app().await;

        let response = app
            .oneshot(request("GET", "/categories", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        let categories = body["categories"].as_array().unwrap();
        assert_eq!(categories.len(), 7);
        assert!(categories.iter().all(|c| c["total_cents"] == 0));
    }

    #[tokio::test]
    async fn urgent_debts_orders_overdue_first() {
        let app = test_app().await;

        for (name, due) in [
            ("next-month", "2025-05-10"),
            ("overdue", "2025-03-01"),
            ("due-soon", "2025-04-20"),
        ] {
            let response = app
                .clone()
                .oneshot(request(
                    "POST",
                    "/debts",
                    Some(json!({
                        "name": name,
                        "amount_cents": 100_000,
                        "remaining_cents": 60_000,
                        "kind": "loan",
                        "due_date": due
                    })),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        let response = app
            .oneshot(request(
                "GET",
                "/stats/urgentDebts?today=2025-04-15&limit=5",
                None,
            ))
            .await
            .unwrap();
        let body = json_body(response).await;
        let names: Vec<&str> = body["debts"]
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["overdue", "due-soon", "next-month"]);
    }

    #[tokio::test]
    async fn category_rename_moves_expenses() {
        let app = test_app().await;

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/expenses",
                Some(json!({
                    "amount_cents": 4550,
                    "category": "food",
                    "date": "2025-04-05",
                    "description": "Grocery shopping"
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .clone()
            .oneshot(request(
                "PATCH",
                "/categories/food",
                Some(json!({ "new_category": "other" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["moved"], 1);

        let listed = app
            .oneshot(request("GET", "/expenses", None))
            .await
            .unwrap();
        let listed = json_body(listed).await;
        assert_eq!(listed["expenses"][0]["category"], "other");
    }

    #[tokio::test]
    async fn monthly_stats_classify_savings() {
        let app = test_app().await;

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/incomes",
                Some(json!({
                    "amount_cents": 120_000,
                    "source": "Salary",
                    "date": "2025-04-01",
                    "description": "Monthly salary"
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/expenses",
                Some(json!({
                    "amount_cents": 30_000,
                    "category": "home",
                    "date": "2025-04-10",
                    "description": "Electricity bill"
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .oneshot(request("GET", "/stats/monthly?year=2025&month=4", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["income_cents"], 120_000);
        assert_eq!(body["expenses_cents"], 30_000);
        assert_eq!(body["balance_cents"], 90_000);
        assert_eq!(body["signal"], "good_savings");
    }

    #[tokio::test]
    async fn refresh_reports_every_section() {
        let app = test_app().await;

        let response = app
            .oneshot(request("POST", "/refresh", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        for section in ["expenses", "incomes", "accounts", "debts"] {
            assert_eq!(body[section]["loaded"], true);
            assert_eq!(body[section]["count"], 0);
        }
    }
}
