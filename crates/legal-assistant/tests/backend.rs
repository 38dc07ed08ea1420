/*
 * Copyright 2026 sukawasatoru
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! Runs the HTTP client against an in-process fake backend.

use axum::extract::{Multipart, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use legal_assistant::data::repository::{
    LegalAssistantRepository, LegalAssistantRepositoryImpl, RepositoryConfig,
};
use legal_assistant::model::{ApiError, ConversationID, Feedback, Language, RequestKind};
use serde_json::{Value, json};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Debug)]
struct Recorded {
    accept_language: Option<String>,
    body: Value,
}

#[derive(Clone, Default)]
struct Recorder(Arc<Mutex<Vec<Recorded>>>);

impl Recorder {
    fn record(&self, headers: &HeaderMap, body: Value) {
        self.0.lock().unwrap().push(Recorded {
            accept_language: headers
                .get(header::ACCEPT_LANGUAGE)
                .and_then(|data| data.to_str().ok())
                .map(ToOwned::to_owned),
            body,
        });
    }

    fn take(&self) -> Vec<Recorded> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

async fn spawn_backend(router: Router) -> Url {
    init_tracing();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
    format!("http://{addr}/").parse().unwrap()
}

fn repository(base_url: Url) -> LegalAssistantRepositoryImpl {
    LegalAssistantRepositoryImpl::create(RepositoryConfig {
        base_url,
        ..Default::default()
    })
    .unwrap()
}

async fn chat_handler(
    State(recorder): State<Recorder>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    recorder.record(&headers, body);
    Json(json!({
        "response": "1. Selon l'article 12",
        "language": "french",
        "conversation_id": "abc",
    }))
}

async fn feedback_handler(
    State(recorder): State<Recorder>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    recorder.record(&headers, body);
    Json(json!({"status": "success", "message": "Feedback enregistré"}))
}

async fn upload_handler(State(recorder): State<Recorder>, mut multipart: Multipart) -> Json<Value> {
    let mut fields = serde_json::Map::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap().to_owned();
        let value = match field.file_name().map(ToOwned::to_owned) {
            Some(file_name) => {
                let content_type = field.content_type().map(ToOwned::to_owned);
                let data = field.bytes().await.unwrap();
                json!({
                    "file_name": file_name,
                    "content_type": content_type,
                    "data": String::from_utf8_lossy(&data),
                })
            }
            None => Value::String(field.text().await.unwrap()),
        };
        fields.insert(name, value);
    }

    let file_name = fields["file"]["file_name"].as_str().unwrap().to_owned();
    recorder.record(&HeaderMap::new(), Value::Object(fields));
    Json(json!({
        "status": "success",
        "filename": file_name,
        "size": "0.00MB",
        "summary": format!("Document TXT {file_name} enregistré."),
    }))
}

#[tokio::test]
async fn chat_contract() {
    let recorder = Recorder::default();
    let base_url = spawn_backend(
        Router::new()
            .route("/chat/", post(chat_handler))
            .with_state(recorder.clone()),
    )
    .await;

    let reply = repository(base_url)
        .send_chat(&ConversationID("abc".into()), "Bonjour", Language::French)
        .await
        .unwrap();
    assert_eq!("1. Selon l'article 12", reply.content);
    assert_eq!(Language::French, reply.language);

    let recorded = recorder.take();
    assert_eq!(1, recorded.len());
    assert_eq!(Some("fr"), recorded[0].accept_language.as_deref());
    assert_eq!(
        json!({"message": "Bonjour", "role": "user", "conversation_id": "abc"}),
        recorded[0].body,
    );
}

#[tokio::test]
async fn chat_answer_language() {
    let base_url = spawn_backend(Router::new().route(
        "/chat/",
        post(|| async { Json(json!({"response": "مرحبا", "language": "arabic"})) }),
    ))
    .await;

    let reply = repository(base_url)
        .send_chat(&ConversationID("abc".into()), "مرحبا", Language::Arabic)
        .await
        .unwrap();
    assert_eq!(Language::Arabic, reply.language);
}

#[tokio::test]
async fn base_url_with_path() {
    let recorder = Recorder::default();
    let base_url = spawn_backend(
        Router::new()
            .route("/api/chat/", post(chat_handler))
            .with_state(recorder.clone()),
    )
    .await;

    repository(base_url.join("api").unwrap())
        .send_chat(&ConversationID("abc".into()), "q", Language::French)
        .await
        .unwrap();
    assert_eq!(1, recorder.take().len());
}

#[tokio::test]
async fn chat_error_detail() {
    let base_url = spawn_backend(Router::new().route(
        "/chat/",
        post(|| async {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({"detail": "Service indisponible"})),
            )
        }),
    ))
    .await;

    let err = repository(base_url)
        .send_chat(&ConversationID("abc".into()), "q", Language::French)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ApiError::Status {
            status,
            detail: Some(ref detail),
        } if status == reqwest::StatusCode::SERVICE_UNAVAILABLE && detail == "Service indisponible"
    ));
    assert!(err.is_transient());
    assert_eq!(
        "Erreur serveur: 503 - Service indisponible",
        err.localized_message(Language::French, RequestKind::Chat),
    );
}

#[tokio::test]
async fn chat_error_without_detail() {
    let base_url = spawn_backend(Router::new().route(
        "/chat/",
        post(|| async { (StatusCode::BAD_REQUEST, "bad request") }),
    ))
    .await;

    let err = repository(base_url)
        .send_chat(&ConversationID("abc".into()), "q", Language::Arabic)
        .await
        .unwrap_err();
    assert!(!err.is_transient());
    assert_eq!(
        "خطأ في الخادم: 400",
        err.localized_message(Language::Arabic, RequestKind::Chat),
    );
}

#[tokio::test]
async fn chat_empty_response() {
    let base_url = spawn_backend(
        Router::new()
            .route(
                "/chat/",
                post(|| async { Json(json!({"response": "  ", "language": "french"})) }),
            )
            .route("/empty/chat/", post(|| async { StatusCode::OK.into_response() })),
    )
    .await;

    let err = repository(base_url.clone())
        .send_chat(&ConversationID("abc".into()), "q", Language::French)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::EmptyResponse), "{err:?}");

    let err = repository(base_url.join("empty/").unwrap())
        .send_chat(&ConversationID("abc".into()), "q", Language::French)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::EmptyResponse), "{err:?}");
}

#[tokio::test]
async fn chat_malformed_response() {
    let base_url = spawn_backend(Router::new().route("/chat/", post(|| async { "<html>" }))).await;

    let err = repository(base_url)
        .send_chat(&ConversationID("abc".into()), "q", Language::French)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::MalformedResponse(_)), "{err:?}");
}

#[tokio::test]
async fn chat_timeout() {
    let base_url = spawn_backend(Router::new().route(
        "/chat/",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({"response": "late"}))
        }),
    ))
    .await;

    let repo = LegalAssistantRepositoryImpl::create(RepositoryConfig {
        base_url,
        chat_timeout: Duration::from_millis(100),
        ..Default::default()
    })
    .unwrap();
    let err = repo
        .send_chat(&ConversationID("abc".into()), "q", Language::French)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Timeout), "{err:?}");
    assert_eq!(
        "La requête a expiré (timeout).",
        err.localized_message(Language::French, RequestKind::Chat),
    );
}

#[tokio::test]
async fn connection_refused() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = repository(format!("http://{addr}/").parse().unwrap())
        .send_chat(&ConversationID("abc".into()), "q", Language::French)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Network(_)), "{err:?}");
    assert_eq!(
        "Une erreur s'est produite lors de la communication avec le serveur.",
        err.localized_message(Language::French, RequestKind::Chat),
    );
}

#[tokio::test]
async fn feedback_contract() {
    let recorder = Recorder::default();
    let base_url = spawn_backend(
        Router::new()
            .route("/feedback/", post(feedback_handler))
            .with_state(recorder.clone()),
    )
    .await;

    repository(base_url)
        .send_feedback(&Feedback {
            conversation_id: ConversationID("abc".into()),
            message_id: "1".into(),
            rating: 4,
            comment: "très utile".into(),
        })
        .await
        .unwrap();

    let recorded = recorder.take();
    assert_eq!(
        json!({
            "conversation_id": "abc",
            "message_id": "1",
            "rating": 4,
            "comment": "très utile",
        }),
        recorded[0].body,
    );
}

#[tokio::test]
async fn upload_contract() {
    let recorder = Recorder::default();
    let base_url = spawn_backend(
        Router::new()
            .route("/upload_document/", post(upload_handler))
            .with_state(recorder.clone()),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contrat.txt");
    let content = "Article 1\n".repeat(20_000);
    std::fs::write(&path, &content).unwrap();

    let seen = Arc::new(Mutex::new(vec![]));
    let seen_cb = seen.clone();
    let report = repository(base_url)
        .upload_document(
            &ConversationID("abc".into()),
            &path,
            Language::Arabic,
            Arc::new(move |percent| seen_cb.lock().unwrap().push(percent)),
        )
        .await
        .unwrap();

    assert_eq!("contrat.txt", report.file_name);
    assert_eq!("Document TXT contrat.txt enregistré.", report.summary);
    assert_eq!(Some("0.00MB"), report.size.as_deref());

    let seen = seen.lock().unwrap();
    assert_eq!(Some(&100), seen.last());
    assert!(seen.windows(2).all(|data| data[0] <= data[1]), "{seen:?}");
    assert!(1 < seen.len());

    let recorded = recorder.take();
    let body = &recorded[0].body;
    assert_eq!("abc", body["conversation_id"]);
    assert_eq!("ar", body["language"]);
    assert_eq!("contrat.txt", body["file"]["file_name"]);
    assert_eq!("text/plain; charset=utf-8", body["file"]["content_type"]);
    assert_eq!(content.as_str(), body["file"]["data"]);
}

#[tokio::test]
async fn upload_rejected_locally() {
    let base_url = spawn_backend(Router::new()).await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("photo.png");
    std::fs::write(&path, b"png").unwrap();

    let progress = Arc::new(AtomicU8::new(0));
    let progress_cb = progress.clone();
    let err = repository(base_url)
        .upload_document(
            &ConversationID("abc".into()),
            &path,
            Language::French,
            Arc::new(move |percent| progress_cb.store(percent, Ordering::Relaxed)),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidDocument(_)), "{err:?}");
    assert_eq!(0, progress.load(Ordering::Relaxed));
    assert!(
        err.localized_message(Language::French, RequestKind::Upload)
            .starts_with("Erreur lors de l'upload du document: ")
    );
}

#[tokio::test]
async fn upload_server_error() {
    let base_url = spawn_backend(Router::new().route(
        "/upload_document/",
        post(|| async {
            (
                StatusCode::PAYLOAD_TOO_LARGE,
                Json(json!({"detail": "Fichier trop volumineux. Taille maximale: 50MB"})),
            )
        }),
    ))
    .await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.pdf");
    std::fs::write(&path, b"%PDF").unwrap();

    let err = repository(base_url)
        .upload_document(
            &ConversationID("abc".into()),
            &path,
            Language::Arabic,
            Arc::new(|_| {}),
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ApiError::Status { status, .. } if status == reqwest::StatusCode::PAYLOAD_TOO_LARGE
    ));
    assert_eq!(
        "حدث خطأ أثناء رفع المستند",
        err.localized_message(Language::Arabic, RequestKind::Upload),
    );
}
