#[cfg(test)]
mod tests {
    use axum::Json;
    use axum::Router;
    use axum::extract::{Path, Query, State};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{delete, get};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use wxa_core::{ApiError, WxaError};
    use wxa_skills_service::*;

    const DEV: &str = "dev-1";
    const TOKEN: &str = "tok-123";

    #[derive(Default)]
    struct Recorded {
        auth: Vec<String>,
        deletes: Vec<(String, String)>,
        created: Vec<serde_json::Value>,
    }

    type Shared = Arc<Mutex<Recorded>>;

    async fn list(State(rec): State<Shared>, headers: HeaderMap) -> (StatusCode, Json<serde_json::Value>) {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        rec.lock().unwrap().auth.push(auth.clone());
        if auth != format!("Bearer {TOKEN}") {
            return (StatusCode::UNAUTHORIZED, Json(serde_json::json!({})));
        }
        (
            StatusCode::OK,
            Json(serde_json::json!([
                {"skill_id": "s-1", "name": "Echo", "url": "https://echo.example.com"},
                {"skill_id": "s-2", "name": "Weather", "deleted": true}
            ])),
        )
    }

    async fn create(
        State(rec): State<Shared>,
        Json(body): Json<serde_json::Value>,
    ) -> (StatusCode, Json<serde_json::Value>) {
        rec.lock().unwrap().created.push(body.clone());
        let mut stored = body;
        stored["skill_id"] = serde_json::json!("s-new");
        stored["developer_id"] = serde_json::json!(DEV);
        (StatusCode::CREATED, Json(stored))
    }

    async fn remove(
        State(rec): State<Shared>,
        Path((_dev, id)): Path<(String, String)>,
        Query(q): Query<HashMap<String, String>>,
    ) -> StatusCode {
        let hard = q.get("HARD_DELETE").cloned().unwrap_or_default();
        rec.lock().unwrap().deletes.push((id, hard));
        StatusCode::NO_CONTENT
    }

    async fn spawn(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/skills/api/developers/{DEV}")
    }

    async fn service() -> (SkillsClient, Shared) {
        let rec: Shared = Arc::default();
        let app = Router::new()
            .route("/skills/api/developers/{dev}/skills", get(list).post(create))
            .route("/skills/api/developers/{dev}/skills/{id}", delete(remove))
            .with_state(rec.clone());
        let base = spawn(app).await;
        let client = SkillsClient::new(DEV, TOKEN).unwrap().with_base_url(base);
        (client, rec)
    }

    async fn status_service(status: StatusCode) -> SkillsClient {
        let app = Router::new().route(
            "/skills/api/developers/{dev}/skills",
            get(move || async move { status }),
        );
        let base = spawn(app).await;
        SkillsClient::new(DEV, TOKEN).unwrap().with_base_url(base)
    }

    // ── Construction tests ─────────────────────────────────────

    #[test]
    fn test_new_requires_token() {
        let err = SkillsClient::new(DEV, "").unwrap_err();
        assert_eq!(err.to_string(), "config error: token required");
    }

    #[test]
    fn test_new_requires_developer_id() {
        let err = SkillsClient::new("", TOKEN).unwrap_err();
        assert_eq!(err.to_string(), "config error: developer id required");
    }

    #[test]
    fn test_default_base_url() {
        let client = SkillsClient::new("abc", TOKEN).unwrap();
        assert_eq!(
            client.base_url(),
            "https://assistant.us-east-2.intelligence.webex.com/skills/api/developers/abc"
        );
        assert_eq!(client.developer_id(), "abc");
    }

    #[test]
    fn test_debug_hides_token() {
        let client = SkillsClient::new(DEV, TOKEN).unwrap();
        assert!(!format!("{client:?}").contains(TOKEN));
    }

    // ── Request tests ──────────────────────────────────────────

    #[tokio::test]
    async fn test_list_skills() {
        let (client, rec) = service().await;
        let skills = client.list_skills().await.unwrap();
        assert_eq!(skills.len(), 2);
        assert_eq!(skills[0].name.as_deref(), Some("Echo"));
        assert!(skills[1].is_deleted());
        assert_eq!(rec.lock().unwrap().auth, vec![format!("Bearer {TOKEN}")]);
    }

    #[tokio::test]
    async fn test_create_skill() {
        let (client, rec) = service().await;
        let skill = Skill::registration("Echo", "https://echo.example.com", "me@example.com")
            .with_keys("PUBLIC", "secret")
            .with_languages(vec!["en".into()]);

        let created = client.create_skill(&skill).await.unwrap();
        assert_eq!(created.skill_id.as_deref(), Some("s-new"));
        assert_eq!(created.developer_id.as_deref(), Some(DEV));
        assert_eq!(created.name.as_deref(), Some("Echo"));

        let sent = rec.lock().unwrap().created[0].clone();
        assert_eq!(sent["public_key"], "PUBLIC");
        assert_eq!(sent["languages"][0], "en");
        assert!(sent.get("skill_id").is_none());
    }

    #[tokio::test]
    async fn test_delete_skill_passes_hard_flag() {
        let (client, rec) = service().await;
        client.delete_skill("s-1", true).await.unwrap();
        client.delete_skill("s-2", false).await.unwrap();
        let deletes = rec.lock().unwrap().deletes.clone();
        assert_eq!(
            deletes,
            vec![
                ("s-1".to_string(), "true".to_string()),
                ("s-2".to_string(), "false".to_string())
            ]
        );
    }

    // ── Error mapping tests ────────────────────────────────────

    #[tokio::test]
    async fn test_wrong_token_is_unauthorized() {
        let (good, _rec) = service().await;
        let bad = SkillsClient::new(DEV, "wrong")
            .unwrap()
            .with_base_url(good.base_url().to_string());
        let err = bad.list_skills().await.unwrap_err();
        assert!(matches!(err, WxaError::Api(ApiError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let cases = [
            (StatusCode::BAD_REQUEST, ApiError::BadRequest),
            (StatusCode::FORBIDDEN, ApiError::Forbidden),
            (StatusCode::NOT_FOUND, ApiError::NotFound),
            (StatusCode::INTERNAL_SERVER_ERROR, ApiError::Internal),
            (StatusCode::BAD_GATEWAY, ApiError::Unknown(502)),
        ];
        for (status, expected) in cases {
            let client = status_service(status).await;
            match client.list_skills().await {
                Err(WxaError::Api(kind)) => assert_eq!(kind, expected),
                other => panic!("expected api error for {status}, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_no_content_is_empty_success() {
        let client = status_service(StatusCode::NO_CONTENT).await;
        let skills = client.list_skills().await.unwrap();
        assert!(skills.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_service_is_http_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client = SkillsClient::new(DEV, TOKEN)
            .unwrap()
            .with_base_url(format!("http://{addr}/skills/api/developers/{DEV}"));
        let err = client.list_skills().await.unwrap_err();
        assert!(matches!(err, WxaError::Http(_)));
    }
}
