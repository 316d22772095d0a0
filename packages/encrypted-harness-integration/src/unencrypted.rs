#[cfg(test)]
mod tests {
    use crate::common::{assert_modes_passed, config, trace};
    use encrypted_harness::{for_each_mode, Param};

    #[tokio::test]
    async fn unencrypted_insert_and_select() {
        trace();

        let result = for_each_mode(&config(), |run| async move {
            let session = run.session().await?;
            let executor = session.executor(run.mode);

            // Temporary tables belong to the session, every mode gets its own
            let sql = "CREATE TEMPORARY TABLE t (name text not null unique)";
            executor.execute(sql, &[]).await?;

            let names = ["Ada", "Grace", "Susan"].map(String::from);
            let params: Vec<&dyn Param> = names.iter().map(|name| name as &dyn Param).collect();

            let sql = "INSERT INTO t (name) VALUES ($1), ($2), ($3)";
            executor.execute(sql, &params).await?;

            let sql = "SELECT name FROM t ORDER BY name";
            let rows = executor.query(sql, &[]).await?;

            let actual = rows
                .iter()
                .map(|row| row.get::<String>(0))
                .collect::<Result<Vec<_>, _>>()?;

            assert_eq!(actual, names);
            Ok(())
        })
        .await;

        assert_modes_passed(result);
    }
}
