mod common;

use common::{Behavior, FakeDataSource, Named, named};
use sql_template::prelude::*;

#[tokio::test]
async fn query_maps_every_row_in_order() -> Result<(), DataAccessError> {
    for n in [0usize, 1, 2, 17] {
        let ds = FakeDataSource::new(Behavior::Rows(n));
        let template = SqlTemplate::new(ds.clone());
        let rows = template.query("SELECT id, name FROM t", named, &[]).await?;

        assert_eq!(rows.len(), n);
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row.id, i64::try_from(i + 1).unwrap());
            assert_eq!(row.name, format!("row-{}", i + 1));
        }
        assert_eq!(ds.counters.acquired(), 1);
        assert_eq!(ds.counters.released(), 1);
    }
    Ok(())
}

#[tokio::test]
async fn query_for_object_requires_exactly_one_row() {
    let one = SqlTemplate::new(FakeDataSource::new(Behavior::Rows(1)));
    let row = one
        .query_for_object("SELECT id, name FROM t WHERE id = ?", named, &[RowValues::Int(1)])
        .await
        .unwrap();
    assert_eq!(
        row,
        Named {
            id: 1,
            name: "row-1".into()
        }
    );

    let none = SqlTemplate::new(FakeDataSource::new(Behavior::Rows(0)));
    let err = none
        .query_for_object("SELECT id, name FROM t WHERE id = ?", named, &[RowValues::Int(1)])
        .await
        .unwrap_err();
    assert_eq!(err, DataAccessError::EmptyResult);

    for n in [2usize, 5] {
        let many = SqlTemplate::new(FakeDataSource::new(Behavior::Rows(n)));
        let err = many
            .query_for_object("SELECT id, name FROM t", named, &[])
            .await
            .unwrap_err();
        assert_eq!(err, DataAccessError::IncorrectResultSize { actual: n });
    }
}

#[tokio::test]
async fn update_returns_affected_count_and_releases() {
    let ds = FakeDataSource::new(Behavior::Rows(3));
    let template = SqlTemplate::new(ds.clone());
    let affected = template
        .update("DELETE FROM t WHERE name = ?", &[RowValues::Text("x".into())])
        .await
        .unwrap();
    assert_eq!(affected, 3);
    assert_eq!(ds.counters.acquired(), 1);
    assert_eq!(ds.counters.released(), 1);
    assert_eq!(
        ds.last_call(),
        Some((
            "DELETE FROM t WHERE name = ?".to_string(),
            vec![RowValues::Text("x".into())]
        ))
    );
}

#[tokio::test]
async fn driver_failures_release_the_connection() {
    let ds = FakeDataSource::new(Behavior::FailExecute);
    let template = SqlTemplate::new(ds.clone());

    let err = template.update("UPDATE t SET a = 1", &[]).await.unwrap_err();
    assert_eq!(
        err,
        DataAccessError::ExecutionError("simulated driver failure".into())
    );
    let err = template
        .query("SELECT id, name FROM t", named, &[])
        .await
        .unwrap_err();
    assert!(matches!(err, DataAccessError::ExecutionError(_)));
    let err = template
        .query_for_object("SELECT id, name FROM t", named, &[])
        .await
        .unwrap_err();
    assert!(matches!(err, DataAccessError::ExecutionError(_)));
    template.execute_batch("CREATE TABLE t (a)").await.unwrap_err();

    assert_eq!(ds.counters.acquired(), 4);
    assert_eq!(ds.counters.released(), 4);
}

#[tokio::test]
async fn connect_failure_is_a_connection_error() {
    let ds = FakeDataSource::new(Behavior::FailConnect);
    let template = SqlTemplate::new(ds.clone());
    let err = template
        .query("SELECT id, name FROM t", named, &[])
        .await
        .unwrap_err();
    assert_eq!(
        err,
        DataAccessError::ConnectionError("simulated refusal".into())
    );
    assert_eq!(ds.counters.acquired(), 0);
    assert_eq!(ds.counters.released(), 0);
}

#[tokio::test]
async fn mapper_errors_surface_unchanged_and_release() {
    let ds = FakeDataSource::new(Behavior::Rows(3));
    let template = SqlTemplate::new(ds.clone());
    let reject_second = |row: &CustomDbRow| -> Result<i64, DataAccessError> {
        let id: i64 = row.try_get("id")?;
        if id == 2 {
            Err(DataAccessError::MappingError("bad row 2".into()))
        } else {
            Ok(id)
        }
    };
    let err = template
        .query("SELECT id, name FROM t", reject_second, &[])
        .await
        .unwrap_err();
    assert_eq!(err, DataAccessError::MappingError("bad row 2".into()));
    assert_eq!(ds.counters.released(), 1);
}

#[tokio::test]
async fn arity_mismatch_never_acquires_a_connection() {
    let ds = FakeDataSource::new(Behavior::Rows(1));
    let template = SqlTemplate::new(ds.clone());
    let err = template
        .update("UPDATE t SET a = ? WHERE b = ?", &[RowValues::Int(1)])
        .await
        .unwrap_err();
    assert!(matches!(err, DataAccessError::ParameterError(_)));
    assert_eq!(ds.counters.acquired(), 0);
}

#[tokio::test]
async fn numbered_sources_get_translated_sql() {
    let ds = FakeDataSource::new(Behavior::Rows(1)).numbered();
    let template = SqlTemplate::new(ds.clone());
    let args = [RowValues::Int(1), RowValues::Text("a".into())];
    template
        .query("SELECT id, name FROM t WHERE id = ? AND note <> '?' AND name = ?", named, &args)
        .await
        .unwrap();
    let (sql, params) = ds.last_call().unwrap();
    assert_eq!(
        sql,
        "SELECT id, name FROM t WHERE id = $1 AND note <> '?' AND name = $2"
    );
    assert_eq!(params, args.to_vec());
}

#[tokio::test]
async fn single_column_mapper_over_template() {
    let template = SqlTemplate::new(FakeDataSource::new(Behavior::Rows(2)));
    // Fake rows have two columns, so the single-column mapper must refuse them.
    let err = template
        .query("SELECT id, name FROM t", single_column::<i64>(), &[])
        .await
        .unwrap_err();
    assert!(matches!(err, DataAccessError::MappingError(_)));
}
