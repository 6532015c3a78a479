use crate::domain::{ApiTransport, NormalizedError};
use serde_json::Value;
use std::sync::Arc;

// Body sent by `create_room` when the caller supplies none.
pub const DEFAULT_ROOM_PAYLOAD: i64 = 1;

// Interview rooms and their metadata.
#[derive(Clone)]
pub struct InterviewApi {
    transport: Arc<dyn ApiTransport>,
}

impl InterviewApi {
    pub async fn create_room(&self, data: Option<Value>) -> Result<Value, NormalizedError> {
        let body = data.unwrap_or_else(|| Value::from(DEFAULT_ROOM_PAYLOAD));
        self.transport
            .post_json("/api/interview/createroom", body)
            .await
    }

    pub async fn get_interview_metadata(&self, interview_id: &str) -> Result<Value, NormalizedError> {
        self.transport
            .get_json(&format!("/api/interview/{interview_id}"))
            .await
    }
}

#[derive(Clone)]
pub struct IntervieweeApi {
    transport: Arc<dyn ApiTransport>,
}

impl IntervieweeApi {
    pub async fn get_all(&self) -> Result<Value, NormalizedError> {
        self.transport.get_json("/interviewee/showAll").await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Value, NormalizedError> {
        self.transport.get_json(&format!("/interviewee/{id}")).await
    }
}

// Scoring records, searchable per interview or per interviewee.
#[derive(Clone)]
pub struct EvaluationApi {
    transport: Arc<dyn ApiTransport>,
}

impl EvaluationApi {
    pub async fn add(&self, data: Value) -> Result<Value, NormalizedError> {
        self.transport.post_json("/evaluation/add", data).await
    }

    pub async fn search(&self, page_size: u32, interview_id: &str) -> Result<Value, NormalizedError> {
        self.transport
            .get_json(&format!("/evaluation/search/{page_size}/{interview_id}"))
            .await
    }

    pub async fn select_by_interviewee(
        &self,
        page_size: u32,
        interviewee_id: &str,
    ) -> Result<Value, NormalizedError> {
        self.transport
            .get_json(&format!("/evaluation/select/{page_size}/{interviewee_id}"))
            .await
    }
}

// One handle per backend resource, all sharing a transport.
#[derive(Clone)]
pub struct Api {
    pub interview: InterviewApi,
    pub interviewee: IntervieweeApi,
    pub evaluation: EvaluationApi,
}

impl Api {
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self {
            interview: InterviewApi {
                transport: Arc::clone(&transport),
            },
            interviewee: IntervieweeApi {
                transport: Arc::clone(&transport),
            },
            evaluation: EvaluationApi { transport },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorCode, TransportFailure};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Get(String),
        Post(String, Value),
    }

    // Fake transport that records calls and answers with a canned payload.
    #[derive(Default)]
    struct RecordingTransport {
        calls: Mutex<Vec<Call>>,
        reply: Option<Value>,
    }

    impl RecordingTransport {
        fn replying(reply: Value) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                reply: Some(reply),
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().expect("calls mutex poisoned").clone()
        }

        fn answer(&self) -> Result<Value, NormalizedError> {
            self.reply.clone().ok_or_else(|| NormalizedError {
                code: ErrorCode::Status(404),
                message: "resource not found".into(),
                original_error: TransportFailure::ServerError {
                    status: 404,
                    body: None,
                },
            })
        }
    }

    #[async_trait]
    impl ApiTransport for RecordingTransport {
        async fn get_json(&self, path: &str) -> Result<Value, NormalizedError> {
            self.calls
                .lock()
                .expect("calls mutex poisoned")
                .push(Call::Get(path.to_string()));
            self.answer()
        }

        async fn post_json(&self, path: &str, body: Value) -> Result<Value, NormalizedError> {
            self.calls
                .lock()
                .expect("calls mutex poisoned")
                .push(Call::Post(path.to_string(), body));
            self.answer()
        }
    }

    #[tokio::test]
    async fn interview_metadata_is_fetched_by_id_and_returned_unmodified() {
        let payload = json!({ "code": 0, "data": { "id": "abc123", "status": "open" } });
        let transport = Arc::new(RecordingTransport::replying(payload.clone()));
        let api = Api::new(transport.clone());

        let result = api
            .interview
            .get_interview_metadata("abc123")
            .await
            .expect("metadata request should succeed");

        assert_eq!(result, payload);
        assert_eq!(transport.calls(), vec![Call::Get("/api/interview/abc123".into())]);
    }

    #[tokio::test]
    async fn create_room_sends_default_body_when_none_given() {
        let transport = Arc::new(RecordingTransport::replying(json!({ "roomId": "r-1" })));
        let api = Api::new(transport.clone());

        api.interview.create_room(None).await.expect("room created");
        api.interview
            .create_room(Some(json!({ "title": "Backend" })))
            .await
            .expect("room created");

        assert_eq!(
            transport.calls(),
            vec![
                Call::Post("/api/interview/createroom".into(), json!(1)),
                Call::Post(
                    "/api/interview/createroom".into(),
                    json!({ "title": "Backend" })
                ),
            ]
        );
    }

    #[tokio::test]
    async fn resource_paths_follow_backend_routes() {
        let transport = Arc::new(RecordingTransport::replying(json!([])));
        let api = Api::new(transport.clone());

        api.interviewee.get_all().await.expect("list");
        api.interviewee.get_by_id("42").await.expect("by id");
        api.evaluation
            .add(json!({ "score": 8 }))
            .await
            .expect("add");
        api.evaluation.search(10, "abc123").await.expect("search");
        api.evaluation
            .select_by_interviewee(20, "42")
            .await
            .expect("select");

        assert_eq!(
            transport.calls(),
            vec![
                Call::Get("/interviewee/showAll".into()),
                Call::Get("/interviewee/42".into()),
                Call::Post("/evaluation/add".into(), json!({ "score": 8 })),
                Call::Get("/evaluation/search/10/abc123".into()),
                Call::Get("/evaluation/select/20/42".into()),
            ]
        );
    }

    #[tokio::test]
    async fn transport_errors_pass_through_to_the_caller() {
        let transport = Arc::new(RecordingTransport::default());
        let api = Api::new(transport);

        let err = api
            .interviewee
            .get_by_id("missing")
            .await
            .expect_err("missing interviewee should fail");

        assert_eq!(err.code, ErrorCode::Status(404));
    }
}
