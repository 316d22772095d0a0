
#[cfg(test)]
use crate::common::{assert_modes_passed, config, trace};
#[cfg(test)]
use encrypted_harness::{for_each_mode, Column, Fixture, Mode, Param};
#[cfg(test)]
use std::fmt::Debug;
#[cfg(test)]
use tracing::info;

///
/// Insert `value` into `column` and read it back, in every mode.
///
#[cfg(test)]
pub async fn map_column<T>(column: &'static str, value: T)
where
    T: Param + Column + PartialEq + Debug + Clone + 'static,
{
    map_column_where(column, value, |_| true).await;
}

///
/// Insert `value` into `column` and read it back, in the modes where `runs` is true.
///
/// Rows are committed and deleted afterwards by id.
/// A failed delete fails the mode.
///
#[cfg(test)]
pub async fn map_column_where<T>(column: &'static str, value: T, runs: fn(&Mode) -> bool)
where
    T: Param + Column + PartialEq + Debug + Clone + 'static,
{
    trace();

    let result = for_each_mode(&config(), move |run| {
        let value = value.clone();

        async move {
            if !runs(&run.mode) {
                info!(mode = %run.mode, column, "Skipped");
                return Ok(());
            }

            let session = run.session().await?;
            let executor = session.executor(run.mode);

            let fixture = Fixture::new();
            let id = fixture.id;

            let sql = format!("INSERT INTO encrypted (id, {column}) VALUES ($1, $2)");
            let params: [&dyn Param; 2] = [&id, &value];
            executor.execute(&sql, &params).await?;

            let sql = format!("SELECT id, {column} FROM encrypted WHERE id = $1");
            let params: [&dyn Param; 1] = [&id];
            let selected = executor.query_row(&sql, &params).await;

            fixture.remove(&executor).await?;

            let row = selected?;
            let actual_id: i64 = row.get(0)?;
            let actual: T = row.get(1)?;

            assert_eq!(actual_id, id);
            assert_eq!(actual, value);
            Ok(())
        }
    })
    .await;

    assert_modes_passed(result);
}
