//! Event capture for the market simulation.
//!
//! A `tracing` subscriber turns every info-level event into one row of a
//! table named after the event's target. Columns appear the first time a
//! field is seen and earlier rows are back-filled with the column's default,
//! so every column of a table always has `rows()` values.
//!
//! # Usage
//!
//! ```ignore
//! // In simulation code:
//! tracing::info!(target: "produce", round, producer = name.as_str(), quantity);
//!
//! // In test:
//! let (_, recorder) = instrument::capture(|| world.run(10));
//! let produce = recorder.table("produce").unwrap();
//! ```

use std::cell::RefCell;
use std::collections::BTreeMap;

use polars::prelude::{Column, DataFrame, PolarsResult};
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Record};
use tracing::{Event, Id, Metadata, Subscriber};

/// One recorded field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    U64(u64),
    I64(i64),
    F64(f64),
    Bool(bool),
    Str(String),
}

/// All values of one field across the rows of a table.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    U64(Vec<u64>),
    I64(Vec<i64>),
    F64(Vec<f64>),
    Bool(Vec<bool>),
    Str(Vec<String>),
}

impl ColumnData {
    /// A column shaped for `value`, pre-filled with `rows` defaults.
    fn for_value(value: &Value, rows: usize) -> Self {
        match value {
            Value::U64(_) => ColumnData::U64(vec![0; rows]),
            Value::I64(_) => ColumnData::I64(vec![0; rows]),
            Value::F64(_) => ColumnData::F64(vec![0.0; rows]),
            Value::Bool(_) => ColumnData::Bool(vec![false; rows]),
            Value::Str(_) => ColumnData::Str(vec![String::new(); rows]),
        }
    }

    /// Append `value`, widening integers into float or signed columns.
    /// A value of an incompatible type is stored as the default.
    fn push(&mut self, value: Value) {
        match (self, value) {
            (ColumnData::U64(v), Value::U64(x)) => v.push(x),
            (ColumnData::I64(v), Value::I64(x)) => v.push(x),
            (ColumnData::I64(v), Value::U64(x)) => v.push(i64::try_from(x).unwrap_or(i64::MAX)),
            (ColumnData::F64(v), Value::F64(x)) => v.push(x),
            (ColumnData::F64(v), Value::U64(x)) => v.push(x as f64),
            (ColumnData::F64(v), Value::I64(x)) => v.push(x as f64),
            (ColumnData::Bool(v), Value::Bool(x)) => v.push(x),
            (ColumnData::Str(v), Value::Str(x)) => v.push(x),
            (column, _) => column.push_default(),
        }
    }

    fn push_default(&mut self) {
        match self {
            ColumnData::U64(v) => v.push(0),
            ColumnData::I64(v) => v.push(0),
            ColumnData::F64(v) => v.push(0.0),
            ColumnData::Bool(v) => v.push(false),
            ColumnData::Str(v) => v.push(String::new()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnData::U64(v) => v.len(),
            ColumnData::I64(v) => v.len(),
            ColumnData::F64(v) => v.len(),
            ColumnData::Bool(v) => v.len(),
            ColumnData::Str(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_u64(&self) -> Option<&[u64]> {
        match self {
            ColumnData::U64(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<&[f64]> {
        match self {
            ColumnData::F64(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&[String]> {
        match self {
            ColumnData::Str(v) => Some(v),
            _ => None,
        }
    }

    fn to_polars(&self, name: &str) -> Column {
        match self {
            ColumnData::U64(v) => Column::new(name.into(), v),
            ColumnData::I64(v) => Column::new(name.into(), v),
            ColumnData::F64(v) => Column::new(name.into(), v),
            ColumnData::Bool(v) => Column::new(name.into(), v),
            ColumnData::Str(v) => Column::new(name.into(), v),
        }
    }
}

/// Rows recorded under one tracing target.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: BTreeMap<String, ColumnData>,
    rows: usize,
}

impl Table {
    /// Append one row. Columns missing from `row` get their default.
    pub fn push_row(&mut self, row: Vec<(String, Value)>) {
        let rows = self.rows;
        for (name, value) in row {
            let column = self
                .columns
                .entry(name)
                .or_insert_with(|| ColumnData::for_value(&value, rows));
            // a field repeated within one event keeps its first value
            if column.len() == rows {
                column.push(value);
            }
        }

        self.rows += 1;
        for column in self.columns.values_mut() {
            if column.len() < self.rows {
                column.push_default();
            }
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn column(&self, name: &str) -> Option<&ColumnData> {
        self.columns.get(name)
    }

    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let columns = self
            .columns
            .iter()
            .map(|(name, data)| data.to_polars(name))
            .collect();
        DataFrame::new(columns)
    }
}

/// Tables keyed by tracing target.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recorder {
    tables: BTreeMap<String, Table>,
}

impl Recorder {
    pub fn table(&self, target: &str) -> Option<&Table> {
        self.tables.get(target)
    }

    /// Number of rows recorded under `target`, zero if none.
    pub fn count(&self, target: &str) -> usize {
        self.table(target).map_or(0, Table::rows)
    }

    fn record(&mut self, target: &str, row: Vec<(String, Value)>) {
        self.tables.entry(target.to_string()).or_default().push_row(row);
    }

    pub fn to_dataframes(&self) -> PolarsResult<BTreeMap<String, DataFrame>> {
        self.tables
            .iter()
            .map(|(name, table)| Ok((name.clone(), table.to_dataframe()?)))
            .collect()
    }
}

thread_local! {
    static RECORDER: RefCell<Recorder> = RefCell::default();
}

/// Collects the fields of one event in declaration order.
#[derive(Default)]
struct RowVisitor {
    row: Vec<(String, Value)>,
}

impl RowVisitor {
    fn put(&mut self, field: &Field, value: Value) {
        self.row.push((field.name().to_string(), value));
    }
}

impl Visit for RowVisitor {
    fn record_u64(&mut self, field: &Field, value: u64) {
        self.put(field, Value::U64(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.put(field, Value::I64(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.put(field, Value::F64(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.put(field, Value::Bool(value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.put(field, Value::Str(value.to_string()));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.put(field, Value::Str(format!("{value:?}")));
    }
}

/// Subscriber writing info-level events into the thread-local [`Recorder`].
/// Spans are ignored.
pub struct DataFrameSubscriber;

impl Subscriber for DataFrameSubscriber {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.is_event() && *metadata.level() <= tracing::Level::INFO
    }

    fn new_span(&self, _span: &Attributes<'_>) -> Id {
        Id::from_u64(1)
    }

    fn record(&self, _span: &Id, _values: &Record<'_>) {}

    fn record_follows_from(&self, _span: &Id, _follows: &Id) {}

    fn event(&self, event: &Event<'_>) {
        let mut visitor = RowVisitor::default();
        event.record(&mut visitor);
        let target = event.metadata().target();
        RECORDER.with(|r| r.borrow_mut().record(target, visitor.row));
    }

    fn enter(&self, _span: &Id) {}

    fn exit(&self, _span: &Id) {}
}

/// Take everything recorded on this thread so far.
pub fn drain() -> Recorder {
    RECORDER.with(|r| std::mem::take(&mut *r.borrow_mut()))
}

pub fn clear() {
    RECORDER.with(|r| *r.borrow_mut() = Recorder::default());
}

/// Run `f` with a [`DataFrameSubscriber`] scoped to this thread and return
/// its result with the events it emitted.
pub fn capture<T>(f: impl FnOnce() -> T) -> (T, Recorder) {
    clear();
    let out = tracing::subscriber::with_default(DataFrameSubscriber, f);
    (out, drain())
}
