#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sql_template::prelude::*;

/// Counts connection checkouts and drops.
#[derive(Debug, Default)]
pub struct Counters {
    pub acquired: AtomicUsize,
    pub released: AtomicUsize,
}

impl Counters {
    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Behavior {
    /// Every select yields this many rows; every dml reports this many affected.
    Rows(usize),
    FailConnect,
    FailExecute,
}

/// In-process data source whose connections report their own lifetime.
#[derive(Debug, Clone)]
pub struct FakeDataSource {
    pub counters: Arc<Counters>,
    pub behavior: Behavior,
    pub style: PlaceholderStyle,
    pub seen: Arc<Mutex<Vec<(String, Vec<RowValues>)>>>,
}

impl FakeDataSource {
    pub fn new(behavior: Behavior) -> Self {
        Self {
            counters: Arc::default(),
            behavior,
            style: PlaceholderStyle::Positional,
            seen: Arc::default(),
        }
    }

    pub fn numbered(mut self) -> Self {
        self.style = PlaceholderStyle::Numbered;
        self
    }

    pub fn last_call(&self) -> Option<(String, Vec<RowValues>)> {
        self.seen.lock().unwrap().last().cloned()
    }
}

pub struct FakeConnection {
    counters: Arc<Counters>,
    behavior: Behavior,
    seen: Arc<Mutex<Vec<(String, Vec<RowValues>)>>>,
}

impl Drop for FakeConnection {
    fn drop(&mut self) {
        self.counters.released.fetch_add(1, Ordering::SeqCst);
    }
}

impl FakeConnection {
    fn record(&self, sql: &str, params: &[RowValues]) -> Result<usize, DataAccessError> {
        self.seen
            .lock()
            .unwrap()
            .push((sql.to_string(), params.to_vec()));
        match self.behavior {
            Behavior::Rows(n) => Ok(n),
            Behavior::FailExecute => Err(DataAccessError::ExecutionError(
                "simulated driver failure".into(),
            )),
            Behavior::FailConnect => unreachable!("connection never handed out"),
        }
    }
}

#[async_trait]
impl DataSource for FakeDataSource {
    type Connection = FakeConnection;

    async fn get_connection(&self) -> Result<FakeConnection, DataAccessError> {
        if let Behavior::FailConnect = self.behavior {
            return Err(DataAccessError::ConnectionError("simulated refusal".into()));
        }
        self.counters.acquired.fetch_add(1, Ordering::SeqCst);
        Ok(FakeConnection {
            counters: Arc::clone(&self.counters),
            behavior: self.behavior,
            seen: Arc::clone(&self.seen),
        })
    }

    fn placeholder_style(&self) -> PlaceholderStyle {
        self.style
    }
}

#[async_trait]
impl DbConnection for FakeConnection {
    async fn execute_dml(
        &mut self,
        sql: &str,
        params: &[RowValues],
    ) -> Result<usize, DataAccessError> {
        self.record(sql, params)
    }

    async fn execute_select(
        &mut self,
        sql: &str,
        params: &[RowValues],
    ) -> Result<ResultSet, DataAccessError> {
        let n = self.record(sql, params)?;
        let mut rs = ResultSet::with_capacity(n);
        rs.set_column_names(Arc::new(vec!["id".to_string(), "name".to_string()]));
        for i in 1..=n {
            let id = i64::try_from(i).unwrap();
            rs.add_row_values(vec![RowValues::Int(id), RowValues::Text(format!("row-{i}"))]);
        }
        Ok(rs)
    }

    async fn execute_batch(&mut self, sql: &str) -> Result<(), DataAccessError> {
        self.record(sql, &[]).map(|_| ())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Named {
    pub id: i64,
    pub name: String,
}

pub fn named(row: &CustomDbRow) -> Result<Named, DataAccessError> {
    Ok(Named {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
    })
}
