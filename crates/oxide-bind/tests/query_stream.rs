//! Statements streamed through an executor on a producer thread.

mod common;
use common::*;

use std::sync::{Arc, Mutex};

use oxide_bind::executor::{
    BindError, BoundValue, ExecuteError, QueryStream, Row, RowSink, SqlValue, StatementExecutor,
};
use oxide_bind::{ChannelError, ParseError, Statement};

/// Emits `rows` rows, each holding its index and the bound values.
struct Numbers {
    rows: i64,
}

impl StatementExecutor for Numbers {
    fn execute(
        &mut self,
        _sql: &str,
        params: &[BoundValue],
        sink: &RowSink,
    ) -> Result<(), ExecuteError> {
        for i in 0..self.rows {
            let mut values = vec![SqlValue::Int(i)];
            values.extend(params.iter().map(|p| p.value.clone()));
            sink.push(Row::new(values))?;
        }
        Ok(())
    }
}

/// Produces rows until the consumer goes away.
struct Endless;

impl StatementExecutor for Endless {
    fn execute(
        &mut self,
        _sql: &str,
        _params: &[BoundValue],
        sink: &RowSink,
    ) -> Result<(), ExecuteError> {
        let mut i = 0;
        loop {
            sink.push(Row::new(vec![SqlValue::Int(i)]))?;
            i += 1;
        }
    }
}

/// Fails after a couple of rows.
struct Flaky;

impl StatementExecutor for Flaky {
    fn execute(
        &mut self,
        _sql: &str,
        _params: &[BoundValue],
        sink: &RowSink,
    ) -> Result<(), ExecuteError> {
        sink.push(Row::new(vec![SqlValue::Int(0)]))?;
        sink.push(Row::new(vec![SqlValue::Int(1)]))?;
        Err(ExecuteError::Driver(String::from("connection reset")))
    }
}

/// Remembers what it was asked to run.
#[derive(Clone, Default)]
struct Recorder {
    seen: Arc<Mutex<Vec<(String, Vec<(String, SqlValue)>)>>>,
}

impl StatementExecutor for Recorder {
    fn execute(
        &mut self,
        sql: &str,
        params: &[BoundValue],
        _sink: &RowSink,
    ) -> Result<(), ExecuteError> {
        let bound = params
            .iter()
            .map(|p| (p.parameter.column.clone(), p.value.clone()))
            .collect();
        self.seen.lock().unwrap().push((sql.to_owned(), bound));
        Ok(())
    }
}

struct Panics;

impl StatementExecutor for Panics {
    fn execute(
        &mut self,
        _sql: &str,
        _params: &[BoundValue],
        _sink: &RowSink,
    ) -> Result<(), ExecuteError> {
        panic!("driver bug");
    }
}

#[test]
fn rows_arrive_in_order_through_small_buffer() {
    let statement = Statement::from("select * from t where kind = ?");
    let stream = QueryStream::spawn(Numbers { rows: 200 }, &statement, ["widget"], 1).unwrap();

    let rows: Vec<Row> = within(move || {
        let rows: Vec<Row> = stream.collect();
        rows
    });
    assert_eq!(rows.len(), 200);
    for (i, row) in rows.iter().enumerate() {
        assert_eq!(row.get(0), Some(&SqlValue::Int(i64::try_from(i).unwrap())));
        assert_eq!(row.get(1), Some(&SqlValue::Text(String::from("widget"))));
    }
}

#[test]
fn finish_after_drain_is_ok() {
    let statement = Statement::from("select * from t where a = ?");
    let mut stream = QueryStream::spawn(Numbers { rows: 3 }, &statement, [1_i64], 0).unwrap();
    assert_eq!(stream.by_ref().count(), 3);
    within(move || stream.finish()).unwrap();
}

#[test]
fn executor_receives_positional_bindings() {
    let recorder = Recorder::default();
    let statement = Statement::from("insert into user (firstname,lastname) values (?,?);");
    let stream =
        QueryStream::spawn(recorder.clone(), &statement, ["Ada", "Lovelace"], 4).unwrap();
    within(move || stream.finish()).unwrap();

    let seen = recorder.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0, "insert into user (firstname,lastname) values (?,?);");
    assert_eq!(
        seen[0].1,
        vec![
            (String::from("FIRSTNAME"), SqlValue::Text(String::from("Ada"))),
            (String::from("LASTNAME"), SqlValue::Text(String::from("Lovelace"))),
        ]
    );
}

#[test]
fn driver_error_surfaces_from_finish() {
    let statement = Statement::from("select * from t");
    let mut stream =
        QueryStream::spawn(Flaky, &statement, Vec::<SqlValue>::new(), 1).unwrap();
    assert_eq!(stream.by_ref().count(), 2);

    let err = within(move || stream.finish()).unwrap_err();
    assert!(matches!(err, ExecuteError::Driver(ref m) if m == "connection reset"));
}

#[test]
fn abandoning_the_stream_stops_the_producer() {
    let statement = Statement::from("select * from t");
    let mut stream =
        QueryStream::spawn(Endless, &statement, Vec::<SqlValue>::new(), 2).unwrap();
    let first: Vec<Row> = stream.by_ref().take(5).collect();
    assert_eq!(first.len(), 5);

    let err = within(move || stream.finish()).unwrap_err();
    assert!(matches!(
        err,
        ExecuteError::Channel(ChannelError::Cancelled)
    ));
}

#[test]
fn cancel_ends_iteration_cleanly() {
    let statement = Statement::from("select * from t");
    let mut stream =
        QueryStream::spawn(Endless, &statement, Vec::<SqlValue>::new(), 1).unwrap();
    assert!(stream.next().is_some());
    stream.cancel();

    // at most the rows buffered before the cancel, then clean end-of-data
    let rest = within(move || stream.count());
    assert!(rest <= 2, "read {rest} rows after cancel");
}

#[test]
fn panicking_executor_is_reported() {
    let statement = Statement::from("select 1");
    let stream = QueryStream::spawn(Panics, &statement, Vec::<SqlValue>::new(), 1).unwrap();
    let err = within(move || stream.finish()).unwrap_err();
    assert!(matches!(err, ExecuteError::ProducerPanicked));
}

#[test]
fn arity_mismatch_is_rejected_before_spawning() {
    let statement = Statement::from("update t set a = ? where b = ?");
    let err = QueryStream::spawn(Numbers { rows: 1 }, &statement, [1_i64], 1).unwrap_err();
    assert!(matches!(
        err,
        ExecuteError::Bind(BindError::ArityMismatch {
            expected: 2,
            found: 1
        })
    ));
}

#[test]
fn unset_statement_is_rejected() {
    let err =
        QueryStream::spawn(Numbers { rows: 1 }, &Statement::new(), Vec::<SqlValue>::new(), 1)
            .unwrap_err();
    assert!(matches!(
        err,
        ExecuteError::Bind(BindError::Parse(ParseError::NoExpression))
    ));
}
