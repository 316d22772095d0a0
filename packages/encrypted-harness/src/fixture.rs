use crate::{error::Error, executor::Executor, log::FIXTURE, param::Param};
use rand::Rng;
use serde_json::{json, Value};
use tokio_postgres::GenericClient;
use tracing::{debug, error};

const INSERT: &str = "INSERT INTO encrypted (id, encrypted_jsonb) VALUES ($1, $2)";
const DELETE: &str = "DELETE FROM encrypted WHERE id = $1";

///
/// Random positive row id.
/// Concurrent tests never share rows, so ids only need to be unlikely to collide.
///
pub fn random_id() -> i64 {
    rand::rng().random_range(1..=i64::MAX)
}

///
/// The JSON document row that every JSONB query runs against.
///
#[derive(Clone, Debug, PartialEq)]
pub struct Fixture {
    pub id: i64,
}

impl Fixture {
    pub fn new() -> Self {
        Fixture { id: random_id() }
    }

    pub fn json() -> Value {
        json!({
            "string": "hello",
            "number": 42,
            "nested": {
                "number": 1815,
                "string": "world",
            },
            "array_string": ["hello", "world"],
            "array_number": [42, 84],
        })
    }

    pub async fn insert<C>(&self, executor: &Executor<'_, C>) -> Result<(), Error>
    where
        C: GenericClient + Sync,
    {
        let json = Fixture::json();
        let params: [&dyn Param; 2] = [&self.id, &json];

        executor.execute(INSERT, &params).await?;

        debug!(target: FIXTURE, msg = "Inserted", id = self.id, mode = %executor.mode());
        Ok(())
    }

    ///
    /// Delete the fixture row.
    /// Fixtures inserted inside a transaction are removed by the rollback and never need this.
    ///
    pub async fn remove<C>(&self, executor: &Executor<'_, C>) -> Result<(), Error>
    where
        C: GenericClient + Sync,
    {
        let params: [&dyn Param; 1] = [&self.id];

        executor
            .execute(DELETE, &params)
            .await
            .map_err(|err| {
                error!(target: FIXTURE, msg = "Cleanup failed", id = self.id, error = err.to_string());
                Error::Cleanup {
                    id: self.id,
                    source: Box::new(err),
                }
            })?;

        debug!(target: FIXTURE, msg = "Removed", id = self.id);
        Ok(())
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Fixture::new()
    }
}
