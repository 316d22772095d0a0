#[cfg(test)]
mod tests {
    use crate::select::select_jsonb;
    use encrypted_harness::{Expected, Query, Selector};
    use serde_json::{json, Value};

    async fn select_jsonb_contains(selector: Value, expected: bool) {
        select_jsonb(
            Query::contains,
            Selector::json(&selector),
            Expected::NativeBool(expected),
        )
        .await;
    }

    #[tokio::test]
    async fn select_jsonb_contains_with_string() {
        select_jsonb_contains(json!({"string": "hello"}), true).await;
    }

    #[tokio::test]
    async fn select_jsonb_contains_with_string_negative() {
        select_jsonb_contains(json!({"string": "blah"}), false).await;
    }

    #[tokio::test]
    async fn select_jsonb_contains_with_number() {
        select_jsonb_contains(json!({"number": 42}), true).await;
    }

    #[tokio::test]
    async fn select_jsonb_contains_with_number_negative() {
        select_jsonb_contains(json!({"number": 11}), false).await;
    }

    #[tokio::test]
    async fn select_jsonb_contains_with_numeric_array() {
        select_jsonb_contains(json!({"array_number": [42, 84]}), true).await;
    }

    #[tokio::test]
    async fn select_jsonb_contains_with_numeric_array_negative() {
        select_jsonb_contains(json!({"array_number": [1, 2]}), false).await;
    }

    #[tokio::test]
    async fn select_jsonb_contains_with_string_array() {
        select_jsonb_contains(json!({"array_string": ["hello", "world"]}), true).await;
    }

    #[tokio::test]
    async fn select_jsonb_contains_with_string_array_negative() {
        select_jsonb_contains(json!({"array_string": ["blah", "vtha"]}), false).await;
    }

    #[tokio::test]
    async fn select_jsonb_contains_with_nested_object() {
        let selector = json!({"nested": {"number": 1815, "string": "world"}});
        select_jsonb_contains(selector, true).await;
    }

    #[tokio::test]
    async fn select_jsonb_contains_with_nested_object_negative() {
        let selector = json!({"nested": {"number": 1914, "string": "world"}});
        select_jsonb_contains(selector, false).await;
    }
}
