#[cfg(test)]
mod tests {
    use crate::common::{assert_modes_passed, config, trace};
    use encrypted_harness::for_each_mode;

    #[tokio::test]
    async fn select_one_in_every_mode() {
        trace();

        let result = for_each_mode(&config(), |run| async move {
            let session = run.session().await?;
            let executor = session.executor(run.mode);

            let row = executor.query_row("SELECT 1", &[]).await?;
            let result: i32 = row.get(0)?;

            assert_eq!(result, 1);
            Ok(())
        })
        .await;

        assert_modes_passed(result);
    }
}
