#[cfg(test)]
mod tests {
    use crate::common::{assert_modes_passed, config, trace};
    use encrypted_harness::{for_each_mode, Error, Fixture, Param};

    ///
    /// Fixtures inserted inside a transaction are gone once it rolls back.
    ///
    #[tokio::test]
    async fn rollback_removes_fixture() {
        trace();

        let result = for_each_mode(&config(), |run| async move {
            let mut session = run.session().await?;
            let fixture = Fixture::new();

            let sql = "SELECT id FROM encrypted WHERE id = $1";
            let params: [&dyn Param; 1] = [&fixture.id];

            {
                let transaction = session.transaction().await?;
                let executor = transaction.executor(run.mode);

                fixture.insert(&executor).await?;

                let row = executor.query_row(sql, &params).await?;
                assert_eq!(row.get::<i64>(0)?, fixture.id);

                transaction.rollback().await?;
            }

            let executor = session.executor(run.mode);
            let result = executor.query_row(sql, &params).await;

            assert!(matches!(result, Err(Error::NoRows)));
            Ok(())
        })
        .await;

        assert_modes_passed(result);
    }

    #[tokio::test]
    async fn dropped_transaction_rolls_back() {
        trace();

        let result = for_each_mode(&config(), |run| async move {
            let mut session = run.session().await?;
            let fixture = Fixture::new();

            {
                let transaction = session.transaction().await?;
                fixture.insert(&transaction.executor(run.mode)).await?;
            }

            let sql = "SELECT id FROM encrypted WHERE id = $1";
            let params: [&dyn Param; 1] = [&fixture.id];
            let rows = session.executor(run.mode).query(sql, &params).await?;

            assert!(rows.is_empty());
            Ok(())
        })
        .await;

        assert_modes_passed(result);
    }
}
