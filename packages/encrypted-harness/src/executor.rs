use crate::{
    config::HarnessConfig,
    error::Error,
    literal::{interpolate, Literal},
    log::{EXECUTE, HARNESS},
    mode::Mode,
    param::Param,
    row::ResultRow,
    tls,
};
use postgres_types::{ToSql, Type};
use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};
use tokio::time::timeout;
use tokio_postgres::{Client, GenericClient, Row, SimpleQueryMessage, Statement, Transaction};
use tracing::{debug, error, info, trace};

///
/// Prepared statements and described parameter types, keyed by SQL text.
///
/// Prepared statements belong to a connection, so the cache lives with the `Session`.
/// Locks are only ever held for a map lookup or insert, never across an await.
///
#[derive(Default)]
struct StatementCache {
    statements: Mutex<HashMap<String, Statement>>,
    described: Mutex<HashMap<String, Vec<Type>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // The maps are always left consistent, a poisoned lock is still usable
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl StatementCache {
    fn statement(&self, sql: &str) -> Option<Statement> {
        lock(&self.statements).get(sql).cloned()
    }

    fn insert_statement(&self, sql: &str, statement: Statement) {
        lock(&self.statements).insert(sql.to_string(), statement);
    }

    fn described(&self, sql: &str) -> Option<Vec<Type>> {
        lock(&self.described).get(sql).cloned()
    }

    fn insert_described(&self, sql: &str, types: Vec<Type>) {
        lock(&self.described).insert(sql.to_string(), types);
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        lock(&self.statements).len() + lock(&self.described).len()
    }
}

///
/// One database connection and its statement cache.
///
/// Each execution mode gets its own session, so nothing is shared between modes.
///
pub struct Session {
    client: Client,
    cache: StatementCache,
}

impl Session {
    pub async fn connect(config: &HarnessConfig) -> Result<Session, Error> {
        let connection_config = config.connection_config()?;
        let tls = tls::make_tls_connect();

        let (client, connection) =
            timeout(config.timeout(), connection_config.connect(tls)).await??;

        tokio::spawn(async move {
            if let Err(err) = connection.await {
                error!(target: HARNESS, msg = "Database connection closed", error = err.to_string());
            }
        });

        info!(target: HARNESS, msg = "Connected", database = %config);

        Ok(Session {
            client,
            cache: StatementCache::default(),
        })
    }

    ///
    /// Executor that runs directly on the connection.
    /// Statements are committed as they run.
    ///
    pub fn executor(&self, mode: Mode) -> Executor<'_, Client> {
        Executor {
            client: &self.client,
            cache: &self.cache,
            mode,
        }
    }

    ///
    /// Begin a transaction.
    /// Everything run through the returned executor is rolled back when it is dropped or
    /// `rollback` is called.
    ///
    pub async fn transaction(&mut self) -> Result<Isolated<'_>, Error> {
        let Session { client, cache } = self;
        let transaction = client.transaction().await?;
        trace!(target: EXECUTE, msg = "BEGIN");
        Ok(Isolated { transaction, cache })
    }
}

///
/// An open transaction on a `Session`.
///
pub struct Isolated<'a> {
    transaction: Transaction<'a>,
    cache: &'a StatementCache,
}

impl<'a> Isolated<'a> {
    pub fn executor(&self, mode: Mode) -> Executor<'_, Transaction<'a>> {
        Executor {
            client: &self.transaction,
            cache: self.cache,
            mode,
        }
    }

    pub async fn rollback(self) -> Result<(), Error> {
        self.transaction.rollback().await?;
        trace!(target: EXECUTE, msg = "ROLLBACK");
        Ok(())
    }
}

///
/// Runs statements the way a given execution mode does.
///
/// | mode             | first run                   | later runs                  |
/// |------------------|-----------------------------|-----------------------------|
/// | cache_statement  | prepare, cache, execute     | execute cached statement    |
/// | cache_describe   | describe params, cache      | declare cached param types  |
/// | describe_exec    | describe then execute       | describe then execute       |
/// | exec             | declare each param's own type, no describe                |
/// | simple_protocol  | params inlined as literals, simple query protocol        |
///
pub struct Executor<'a, C> {
    client: &'a C,
    cache: &'a StatementCache,
    mode: Mode,
}

impl<C> Executor<'_, C>
where
    C: GenericClient + Sync,
{
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub async fn query(&self, sql: &str, params: &[&dyn Param]) -> Result<Vec<ResultRow>, Error> {
        debug!(target: EXECUTE, mode = %self.mode, sql, params = params.len());

        let rows = match self.mode {
            Mode::CacheStatement => {
                let statement = self.prepared(sql).await?;
                self.client.query(&statement, &bind(params)).await?
            }
            Mode::CacheDescribe => {
                let types = self.described(sql).await?;
                let params = params
                    .iter()
                    .zip(types)
                    .map(|(param, ty)| (param.as_sql(), ty))
                    .collect::<Vec<_>>();
                self.client.query_typed(sql, &params).await?
            }
            Mode::DescribeExec => self.client.query(sql, &bind(params)).await?,
            Mode::Exec => {
                let params = params
                    .iter()
                    .map(|param| (param.as_sql(), param.type_hint()))
                    .collect::<Vec<_>>();
                self.client.query_typed(sql, &params).await?
            }
            Mode::SimpleProtocol => return self.simple_query(sql, params).await,
        };

        Ok(extended(rows))
    }

    ///
    /// First row of the result.
    /// Returns `Error::NoRows` if there are none.
    ///
    pub async fn query_row(&self, sql: &str, params: &[&dyn Param]) -> Result<ResultRow, Error> {
        self.query(sql, params)
            .await?
            .into_iter()
            .next()
            .ok_or(Error::NoRows)
    }

    pub async fn execute(&self, sql: &str, params: &[&dyn Param]) -> Result<(), Error> {
        self.query(sql, params).await?;
        Ok(())
    }

    async fn prepared(&self, sql: &str) -> Result<Statement, Error> {
        if let Some(statement) = self.cache.statement(sql) {
            trace!(target: EXECUTE, msg = "Cached statement", sql);
            return Ok(statement);
        }

        let statement = self.client.prepare(sql).await?;
        self.cache.insert_statement(sql, statement.clone());
        Ok(statement)
    }

    async fn described(&self, sql: &str) -> Result<Vec<Type>, Error> {
        if let Some(types) = self.cache.described(sql) {
            trace!(target: EXECUTE, msg = "Cached description", sql);
            return Ok(types);
        }

        let types = self.client.prepare(sql).await?.params().to_vec();
        debug!(target: EXECUTE, msg = "Described", sql, ?types);
        self.cache.insert_described(sql, types.clone());
        Ok(types)
    }

    async fn simple_query(
        &self,
        sql: &str,
        params: &[&dyn Param],
    ) -> Result<Vec<ResultRow>, Error> {
        let literals = params
            .iter()
            .map(|param| param.literal())
            .collect::<Vec<Literal>>();

        let sql = interpolate(sql, &literals)?;
        trace!(target: EXECUTE, msg = "Interpolated", sql);

        let rows = self
            .client
            .simple_query(&sql)
            .await?
            .into_iter()
            .filter_map(|message| match message {
                SimpleQueryMessage::Row(row) => Some(ResultRow::from(row)),
                _ => None,
            })
            .collect();

        Ok(rows)
    }
}

fn bind<'a>(params: &'a [&'a dyn Param]) -> Vec<&'a (dyn ToSql + Sync)> {
    params.iter().map(|param| param.as_sql()).collect()
}

fn extended(rows: Vec<Row>) -> Vec<ResultRow> {
    rows.into_iter().map(ResultRow::from).collect()
}
