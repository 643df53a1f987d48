#![cfg(feature = "postgres")]

// Needs a reachable server, e.g.
// SQL_TEMPLATE_PG_URL="host=localhost user=postgres password=postgres dbname=postgres"

use chrono::NaiveDateTime;
use serde_json::json;
use sql_template::prelude::*;

fn pg_url() -> Option<String> {
    std::env::var("SQL_TEMPLATE_PG_URL").ok()
}

#[derive(Debug, PartialEq)]
struct Order {
    id: i64,
    customer: String,
    qty: i64,
    placed_at: NaiveDateTime,
    meta: Option<serde_json::Value>,
}

fn order(row: &CustomDbRow) -> Result<Order, DataAccessError> {
    Ok(Order {
        id: row.try_get("id")?,
        customer: row.try_get("customer")?,
        qty: row.try_get("qty")?,
        placed_at: row.try_get("placed_at")?,
        meta: row.try_get("meta")?,
    })
}

#[tokio::test]
async fn postgres_template_round_trip() -> Result<(), DataAccessError> {
    let Some(url) = pg_url() else {
        eprintln!("SQL_TEMPLATE_PG_URL not set; skipping");
        return Ok(());
    };
    let template = SqlTemplate::new(PostgresDataSource::new(PostgresOptions::from_url(&url)?));

    template
        .execute_batch(
            "DROP TABLE IF EXISTS template_orders;
             CREATE TABLE template_orders (
                 id BIGSERIAL PRIMARY KEY,
                 customer TEXT NOT NULL,
                 qty INT NOT NULL,
                 placed_at TIMESTAMP NOT NULL,
                 meta JSONB
             );",
        )
        .await?;

    let placed = NaiveDateTime::parse_from_str("2024-02-03 04:05:06", "%F %T").unwrap();
    for (customer, qty) in [("acme", 3i64), ("acme", 5), ("globex", 1)] {
        let inserted = template
            .update(
                "INSERT INTO template_orders (customer, qty, placed_at, meta) VALUES (?, ?, ?, ?)",
                &[
                    RowValues::from(customer),
                    RowValues::Int(qty),
                    RowValues::Timestamp(placed),
                    RowValues::JSON(json!({"rush": qty > 2})),
                ],
            )
            .await?;
        assert_eq!(inserted, 1);
    }

    let acme = template
        .query(
            "SELECT id, customer, qty, placed_at, meta FROM template_orders WHERE customer = ? ORDER BY id",
            order,
            &[RowValues::from("acme")],
        )
        .await?;
    assert_eq!(acme.len(), 2);
    assert_eq!(acme[1].qty, 5);
    assert_eq!(acme[0].placed_at, placed);
    assert_eq!(acme[0].meta, Some(json!({"rush": true})));

    let err = template
        .query_for_object(
            "SELECT id, customer, qty, placed_at, meta FROM template_orders WHERE customer = ?",
            order,
            &[RowValues::from("acme")],
        )
        .await
        .unwrap_err();
    assert_eq!(err, DataAccessError::IncorrectResultSize { actual: 2 });

    let missing = template
        .query_for_object(
            "SELECT id, customer, qty, placed_at, meta FROM template_orders WHERE customer = ?",
            order,
            &[RowValues::from("initech")],
        )
        .await
        .unwrap_err();
    assert_eq!(missing, DataAccessError::EmptyResult);

    let updated = template
        .update(
            "UPDATE template_orders SET meta = NULL WHERE customer = ?",
            &[RowValues::from("globex")],
        )
        .await?;
    assert_eq!(updated, 1);

    let err = template
        .update("INSERT INTO template_orders (customer) VALUES (?)", &[RowValues::from("x")])
        .await
        .unwrap_err();
    assert!(matches!(err, DataAccessError::ExecutionError(_)));

    template.execute_batch("DROP TABLE template_orders;").await?;
    Ok(())
}

#[tokio::test]
async fn unreachable_server_is_a_connection_error() {
    let ds = PostgresDataSource::builder()
        .host("127.0.0.1")
        .port(1)
        .user("nobody")
        .dbname("nothing")
        .build();
    let template = SqlTemplate::new(ds);
    let err = template.update("SELECT 1", &[]).await.unwrap_err();
    assert!(matches!(err, DataAccessError::ConnectionError(_)));
}
