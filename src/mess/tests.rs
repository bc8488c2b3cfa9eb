#[cfg(test)]
mod tests {
    use crate::common::test_support::test_state;
    use crate::mess::models::{Mess, MessListResponse};
    use crate::mess::validators;
    use crate::sequence::{MemoryCounterStore, SequenceAllocator, MESS_ID_KEY};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use serde::de::DeserializeOwned;
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Vec<u8>) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    fn parse<T: DeserializeOwned>(bytes: &[u8]) -> T {
        serde_json::from_slice(bytes).unwrap()
    }

    #[test]
    fn test_validate_mess_name() {
        assert!(validators::validate_mess_name("North Wing Mess").is_ok());

        assert!(validators::validate_mess_name("").is_err());
        assert!(validators::validate_mess_name("   ").is_err());
        assert!(validators::validate_mess_name(&"a".repeat(101)).is_err());
        assert!(validators::validate_mess_name(&"a".repeat(100)).is_ok());
    }

    #[test]
    fn test_validate_description() {
        assert!(validators::validate_description(None).is_ok());
        assert!(validators::validate_description(Some("Veg only")).is_ok());
        assert!(validators::validate_description(Some(&"d".repeat(1001))).is_err());
    }

    #[tokio::test]
    async fn test_create_mess_assigns_sequential_ids() {
        let app = crate::build_app(test_state(true).await);

        for expected in 1..=3 {
            let body = format!(r#"{{"name":"Mess {}"}}"#, expected);
            let (status, bytes) = send(&app, "POST", "/api/mess", Some(&body)).await;
            assert_eq!(status, StatusCode::CREATED);

            let mess: Mess = parse(&bytes);
            assert_eq!(mess.mess_id, expected);
            assert_eq!(mess.owner_id, crate::common::config::DEV_USER_ID);
        }

        let (status, bytes) = send(&app, "GET", "/api/mess", None).await;
        assert_eq!(status, StatusCode::OK);
        let list: MessListResponse = parse(&bytes);
        assert_eq!(list.total, 3);
        let ids: Vec<i64> = list.messes.iter().map(|m| m.mess_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_get_mess_by_id() {
        let app = crate::build_app(test_state(true).await);

        send(&app, "POST", "/api/mess", Some(r#"{"name":" Hall A ","description":"Lunch"}"#)).await;

        let (status, bytes) = send(&app, "GET", "/api/mess/1", None).await;
        assert_eq!(status, StatusCode::OK);
        let mess: Mess = parse(&bytes);
        assert_eq!(mess.name, "Hall A");
        assert_eq!(mess.description.as_deref(), Some("Lunch"));

        let (status, _) = send(&app, "GET", "/api/mess/99", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_my_messes() {
        let app = crate::build_app(test_state(true).await);

        send(&app, "POST", "/api/mess", Some(r#"{"name":"Mine"}"#)).await;

        let (status, bytes) = send(&app, "GET", "/api/mess/mine", None).await;
        assert_eq!(status, StatusCode::OK);
        let list: MessListResponse = parse(&bytes);
        assert_eq!(list.total, 1);
        assert_eq!(list.messes[0].name, "Mine");
    }

    #[tokio::test]
    async fn test_invalid_input_does_not_consume_id() {
        let state = test_state(true).await;
        let sequences = state.sequences.clone();
        let app = crate::build_app(state);

        let (status, _) = send(&app, "POST", "/api/mess", Some(r#"{"name":"   "}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(sequences.current_value(MESS_ID_KEY).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_failed_insert_burns_id() {
        let state = test_state(true).await;
        let db = state.db.clone();
        let app = crate::build_app(state);

        // Occupy mess_id 1 behind the allocator's back so the first insert fails
        sqlx::query(
            "INSERT INTO messes (mess_id, name, owner_id, created_at) VALUES (1, 'Legacy', 0, '2024-01-01')",
        )
        .execute(&db)
        .await
        .unwrap();

        let (status, _) = send(&app, "POST", "/api/mess", Some(r#"{"name":"First"}"#)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let (status, bytes) = send(&app, "POST", "/api/mess", Some(r#"{"name":"Second"}"#)).await;
        assert_eq!(status, StatusCode::CREATED);
        let mess: Mess = parse(&bytes);
        assert_eq!(mess.mess_id, 2);
    }

    #[tokio::test]
    async fn test_store_unavailable_returns_503() {
        let mut state = test_state(true).await;
        let store = Arc::new(MemoryCounterStore::new());
        store.set_available(false);
        state.sequences = SequenceAllocator::new(store);
        let db = state.db.clone();
        let app = crate::build_app(state);

        let (status, bytes) = send(&app, "POST", "/api/mess", Some(r#"{"name":"Offline"}"#)).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        let error: serde_json::Value = parse(&bytes);
        assert_eq!(error["code"], "STORE_UNAVAILABLE");

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM messes")
            .fetch_one(&db)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_create_requires_auth_outside_dev_mode() {
        let app = crate::build_app(test_state(false).await);

        let (status, _) = send(&app, "POST", "/api/mess", Some(r#"{"name":"Nope"}"#)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(&app, "GET", "/api/mess", None).await;
        assert_eq!(status, StatusCode::OK);
    }
}
