mod jsonb_contains;

#[cfg(test)]
use crate::common::{assert_modes_passed, config, trace};
#[cfg(test)]
use encrypted_harness::{for_each_mode, verify, Expected, Fixture, Query, Selector};

///
/// Insert a fixture and check `query` with `selector` in both call forms, once per mode.
///
/// Each mode works in its own transaction, so the fixture never outlives the test.
///
#[cfg(test)]
pub async fn select_jsonb(query: fn(i64) -> Query, selector: Selector, expected: Expected) {
    trace();

    let result = for_each_mode(&config(), move |run| {
        let selector = selector.clone();
        let expected = expected.clone();

        async move {
            let mut session = run.session().await?;
            let transaction = session.transaction().await?;
            let executor = transaction.executor(run.mode);

            let fixture = Fixture::new();
            fixture.insert(&executor).await?;

            verify(&executor, &query(fixture.id), &selector, &expected).await?;

            transaction.rollback().await
        }
    })
    .await;

    assert_modes_passed(result);
}
