use crate::{
    error::Error,
    executor::Executor,
    expected::{Expected, Mismatch, Observed},
    literal::interpolate,
    log::HARNESS,
    mode::Mode,
    param::{Param, Selector},
};
use std::{
    fmt::{self, Display},
    future::Future,
};
use tokio_postgres::GenericClient;
use tracing::debug;

///
/// How the selector reaches the server.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallForm {
    /// Bound to `$1`
    Parameterised,
    /// Rendered into the statement text as a quoted literal, nothing bound
    Templated,
}

impl CallForm {
    pub const ALL: [CallForm; 2] = [CallForm::Parameterised, CallForm::Templated];
}

impl Display for CallForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallForm::Parameterised => write!(f, "parameterised"),
            CallForm::Templated => write!(f, "templated"),
        }
    }
}

///
/// A select against a single row of `encrypted`, with the selector as `$1`.
///
#[derive(Clone, Debug, PartialEq)]
pub struct Query {
    id: i64,
    expression: String,
    alias: Option<String>,
}

impl Query {
    ///
    /// `expression` is the select list item and must reference the selector as `$1`.
    ///
    pub fn new(id: i64, expression: &str) -> Self {
        Query {
            id,
            expression: expression.to_string(),
            alias: None,
        }
    }

    pub fn contains(id: i64) -> Self {
        Query::new(id, "encrypted_jsonb @> $1")
    }

    pub fn contained_by(id: i64) -> Self {
        Query::new(id, "$1 <@ encrypted_jsonb")
    }

    pub fn path_query(id: i64) -> Self {
        Query::new(id, "jsonb_path_query(encrypted_jsonb, $1)")
    }

    pub fn path_query_first(id: i64) -> Self {
        Query::new(id, "jsonb_path_query_first(encrypted_jsonb, $1)")
    }

    pub fn path_exists(id: i64) -> Self {
        Query::new(id, "jsonb_path_exists(encrypted_jsonb, $1)")
    }

    /// Name the selected column `selected`
    pub fn aliased(self) -> Self {
        Query {
            alias: Some("selected".to_string()),
            ..self
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn sql(&self) -> String {
        let alias = self
            .alias
            .as_ref()
            .map(|alias| format!(" AS {alias}"))
            .unwrap_or_default();

        format!(
            "SELECT {}{alias} FROM encrypted WHERE id = {}",
            self.expression, self.id
        )
    }

    ///
    /// The statement with the selector inlined as a string literal.
    ///
    pub fn templated(&self, selector: &Selector) -> Result<String, Error> {
        interpolate(&self.sql(), &[selector.literal()])
    }
}

impl Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sql())
    }
}

///
/// Run `query` in both call forms through `executor` and check each result against `expected`.
///
/// Returns the first failure.
/// A result that does not match becomes `Error::Mismatch`, naming the call form and the mode.
/// Any other failure (connection, decoding, malformed JSON) is returned as is.
///
pub async fn verify<C>(
    executor: &Executor<'_, C>,
    query: &Query,
    selector: &Selector,
    expected: &Expected,
) -> Result<(), Error>
where
    C: GenericClient + Sync,
{
    debug!(target: HARNESS, msg = "Verify", mode = %executor.mode(), %query, %selector);

    verify_forms(executor.mode(), expected, |form| {
        observe(executor, query, selector, expected, form)
    })
    .await
}

///
/// Check the outcome of `run` for each call form in turn, parameterised first.
///
/// Stops at the first form that fails.
///
pub async fn verify_forms<F, Fut>(
    mode: Mode,
    expected: &Expected,
    mut run: F,
) -> Result<(), Error>
where
    F: FnMut(CallForm) -> Fut,
    Fut: Future<Output = Result<Observed, Error>>,
{
    for form in CallForm::ALL {
        let outcome = run(form).await;

        expected
            .check(outcome)
            .map_err(|mismatch| match mismatch {
                Mismatch::Actual(actual) => Error::Mismatch {
                    form,
                    mode,
                    expected: expected.to_string(),
                    actual,
                },
                Mismatch::Error(err) => err,
            })?;

        debug!(target: HARNESS, msg = "Matched", %form, %mode, %expected);
    }

    Ok(())
}

async fn observe<C>(
    executor: &Executor<'_, C>,
    query: &Query,
    selector: &Selector,
    expected: &Expected,
    form: CallForm,
) -> Result<Observed, Error>
where
    C: GenericClient + Sync,
{
    let row = match form {
        CallForm::Parameterised => {
            let params: [&dyn Param; 1] = [selector];
            executor.query_row(&query.sql(), &params).await?
        }
        CallForm::Templated => {
            let sql = query.templated(selector)?;
            executor.query_row(&sql, &[]).await?
        }
    };

    if expected.reads_bool() {
        Ok(Observed::Bool(row.get(0)?))
    } else {
        Ok(Observed::Payload(row.get(0)?))
    }
}
