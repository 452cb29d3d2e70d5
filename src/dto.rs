use serde::Deserialize;

/// Query string for the user-scoped read endpoints.
#[derive(Debug, Deserialize)]
pub struct UserQuery {
    #[serde(rename = "userId")]
    pub user_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_query_uses_the_wire_field_name() {
        let q: UserQuery = serde_json::from_str(r#"{"userId":"user123"}"#).unwrap();
        assert_eq!(q.user_id, "user123");
    }
}
