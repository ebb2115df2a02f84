//! HTTP client integration tests
//!
//! `HttpBatchApi` against a wiremock server: paths, query strings, auth,
//! request bodies, error mapping and envelope handling through the board.

#[cfg(test)]
mod tests {
    use crate::common::{BoardAssertions, NewBatchFactory};
    use coursedesk::core::batch::reconcile_batches;
    use coursedesk::{
        BatchApi, BatchBoard, BatchFilter, BatchStatus, BatchType, ConfigBuilder, DeskError,
        HttpBatchApi, LoadSource,
    };
    use chrono::Utc;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use wiremock::matchers::{
        body_json, body_partial_json, header, method, path, query_param, query_param_is_missing,
    };
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> HttpBatchApi {
        let config = ConfigBuilder::new()
            .base_url(format!("{}/api", server.uri()))
            .token("secret-token")
            .timeout_secs(5)
            .build()
            .unwrap();
        HttpBatchApi::new(&config.api).unwrap()
    }

    fn wire_batch(id: &str, status: &str) -> Value {
        json!({
            "_id": id,
            "batch_name": format!("Batch {}", id),
            "batch_code": format!("B-{}", id),
            "course": { "_id": "c1", "title": "Rust in Practice" },
            "capacity": 20,
            "enrolled_students": ["s1", "s2"],
            "start_date": "2025-04-01",
            "end_date": "2025-06-30T00:00:00.000Z",
            "schedule": [{ "day": "Monday", "start_time": "10:00", "end_time": "12:00" }],
            "instructor": { "_id": "i1", "name": "Ada" },
            "batch_type": "group",
            "status": status,
            "createdAt": "2025-03-01T08:00:00.000Z",
            "updatedAt": "2025-03-02T08:00:00.000Z"
        })
    }

    // ==================== Requests ====================

    #[tokio::test]
    async fn test_list_sends_filter_and_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/batches"))
            .and(query_param("status", "Active"))
            .and(query_param("batch_type", "individual"))
            .and(query_param("search", "rust"))
            .and(query_param("page", "2"))
            .and(query_param_is_missing("course"))
            .and(header("authorization", "Bearer secret-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let filter = BatchFilter {
            status: Some(BatchStatus::Active),
            batch_type: Some(BatchType::Individual),
            search: Some(" rust ".to_string()),
            page: Some(2),
            ..BatchFilter::default()
        };
        let body = client(&server).list_batches(&filter).await.unwrap();
        assert_eq!(body, json!({ "data": [] }));
    }

    #[tokio::test]
    async fn test_status_change_is_a_patch_with_status_body() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/api/batches/b1/status"))
            .and(body_json(json!({ "status": "Cancelled" })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "success": true, "data": wire_batch("b1", "Cancelled") })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let body = client(&server)
            .update_batch_status("b1", BatchStatus::Cancelled)
            .await
            .unwrap();
        assert_eq!(body["data"]["status"], "Cancelled");
    }

    #[tokio::test]
    async fn test_individual_create_posts_to_its_own_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/batches/individual"))
            .and(body_partial_json(json!({
                "batch_name": "Rust Mentoring",
                "course": "sample-course-1",
                "capacity": 1,
                "batch_type": "individual",
                "status": "Upcoming",
                "student_id": "student-9"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "success": true })))
            .expect(1)
            .mount(&server)
            .await;

        client(&server)
            .create_individual_batch(&NewBatchFactory::individual(1))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_delete_with_empty_body() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/batches/b1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let body = client(&server).delete_batch("b1").await.unwrap();
        assert_eq!(body, Value::Null);
    }

    #[tokio::test]
    async fn test_id_with_reserved_characters_stays_in_its_segment() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/batches/term%201%2F2%3Fx"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        client(&server).delete_batch("term 1/2?x").await.unwrap();
    }

    #[tokio::test]
    async fn test_catalog_endpoints() {
        let server = MockServer::start().await;
        for (route, body) in [
            ("/api/courses", json!([{ "_id": "c1", "title": "Rust" }])),
            ("/api/instructors", json!({ "data": [{ "_id": "i1", "name": "Ada" }] })),
        ] {
            Mock::given(method("GET"))
                .and(path(route))
                .respond_with(ResponseTemplate::new(200).set_body_json(body))
                .expect(1)
                .mount(&server)
                .await;
        }
        Mock::given(method("GET"))
            .and(path("/api/students"))
            .and(query_param("page", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "data": [{ "_id": "s1", "fullName": "Grace", "email": "g@example.com" }] }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let board = BatchBoard::new(Arc::new(client(&server)));
        assert_eq!(board.courses().await[0].title, "Rust");
        assert_eq!(board.instructors().await[0].name, "Ada");
        let students = board.students(Some(3)).await.unwrap();
        assert_eq!(students[0].name, "Grace");
    }

    // ==================== Error mapping ====================

    #[tokio::test]
    async fn test_json_error_message_is_extracted() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/batches/missing"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(json!({ "success": false, "message": "Batch not found" })),
            )
            .mount(&server)
            .await;

        let err = client(&server).get_batch("missing").await.unwrap_err();
        match err {
            DeskError::Api { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Batch not found");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_plain_text_error_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/batches"))
            .respond_with(ResponseTemplate::new(502).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let err = client(&server)
            .list_batches(&BatchFilter::default())
            .await
            .unwrap_err();
        assert!(err.is_network());
        assert_eq!(err.status_code(), Some(502));
        assert!(err.to_string().contains("upstream down"));
    }

    #[tokio::test]
    async fn test_invalid_json_is_a_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/courses"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client(&server).list_courses().await.unwrap_err();
        assert!(matches!(err, DeskError::Parse(_)));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_a_network_error() {
        let config = ConfigBuilder::new()
            .base_url("http://127.0.0.1:9/api")
            .timeout_secs(2)
            .build()
            .unwrap();
        let api = HttpBatchApi::new(&config.api).unwrap();

        let err = api.list_batches(&BatchFilter::default()).await.unwrap_err();
        assert!(matches!(err, DeskError::Network(_)));
        assert!(err.is_network());
    }

    // ==================== Through the board ====================

    #[tokio::test]
    async fn test_board_reconciles_success_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/batches"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "success": true,
                    "data": [wire_batch("b1", "Active"), { "batch_name": "no id" }, wire_batch("b2", "Upcoming")]
                }
            })))
            .mount(&server)
            .await;

        let board = BatchBoard::new(Arc::new(client(&server)));
        assert_eq!(board.load().await.unwrap(), LoadSource::Server);

        let batches = board.batches();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].enrolled, 2);
        assert_eq!(batches[0].course_name.as_deref(), Some("Rust in Practice"));
        assert_eq!(batches[0].instructor.display_name(), Some("Ada"));
        assert_eq!(batches[1].status, BatchStatus::Upcoming);
    }

    #[tokio::test]
    async fn test_board_status_change_resyncs_over_http() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/batches"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([wire_batch("b1", "Active")])),
            )
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/api/batches/b1/status"))
            .and(body_json(json!({ "status": "Completed" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/batches"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([wire_batch("b1", "Completed")])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let board = BatchBoard::new(Arc::new(client(&server)));
        board.load().await.unwrap();
        board
            .change_status("b1", BatchStatus::Completed)
            .await
            .unwrap();
        board.assert_status("b1", BatchStatus::Completed);
    }

    #[tokio::test]
    async fn test_board_rolls_back_on_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/batches"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "data": [wire_batch("b1", "Active")] })),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/api/batches/b1/status"))
            .respond_with(
                ResponseTemplate::new(409).set_body_json(json!({ "message": "Batch has sessions" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let board = BatchBoard::new(Arc::new(client(&server)));
        board.load().await.unwrap();
        let err = board
            .change_status("b1", BatchStatus::Cancelled)
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), Some(409));
        board.assert_status("b1", BatchStatus::Active);
        let notices = board.take_notices();
        assert!(notices[0].message.contains("Batch has sessions"));
    }

    #[tokio::test]
    async fn test_unrecognized_envelope_reads_as_empty() {
        let body = json!({ "data": { "items": [wire_batch("b1", "Active")] } });
        let reconciled = reconcile_batches(&body, Utc::now());
        assert!(reconciled.records.is_empty());
        assert!(matches!(reconciled.error, Some(DeskError::Shape(_))));
    }
}
