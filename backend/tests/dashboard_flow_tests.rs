//! Full dashboard flow: upload through the analysis client, render the
//! panels, then notify a guardian through a running relay.
#![cfg(feature = "http-server")]

use std::sync::{Arc, Mutex};

use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};

use intellectus::analysis::{AnalysisClient, AnalysisClientConfig, UploadFile, ANALYZE_PATH, SUMMARY_PATH};
use intellectus::config::RelayConfig;
use intellectus::dashboard::{
    confirmation_prompt, render_student_table, DashboardView, NotifyOutcome, RelayClient,
    StudentDetail, SummaryPanel, UploadCycle, UploadSelection, MISSING_FILES_MESSAGE,
};
use intellectus::http::{create_router, AppState};

mod support;

fn fixture_students() -> Value {
    json!([
        {"student_id": "S1", "full_name": "Ada Lovelace", "predicted_risk": "High",
         "overall_grade_avg": 38.5, "attendance_percentage": 55.0, "failed_subjects_count": 3,
         "fee_status": "Overdue", "guardian_email": "ada.parent@example.com"},
        {"student_id": "S2", "full_name": "Alan Turing", "predicted_risk": "Medium",
         "overall_grade_avg": 61.0, "attendance_percentage": 74.5, "failed_subjects_count": 1,
         "fee_status": "Paid", "guardian_email": "alan.parent@example.com"},
        {"student_id": "S3", "full_name": "Grace Hopper", "predicted_risk": "Low",
         "overall_grade_avg": 88.0, "attendance_percentage": 97.0, "failed_subjects_count": 0,
         "fee_status": "Paid", "guardian_email": "grace.parent@example.com"},
        {"student_id": "S4", "full_name": "Edsger Dijkstra", "predicted_risk": "Low",
         "overall_grade_avg": 79.0, "attendance_percentage": 91.0, "failed_subjects_count": 0,
         "fee_status": "Paid", "guardian_email": "edsger.parent@example.com"}
    ])
}

fn fixture_summary() -> Value {
    json!({
        "risk_distribution": {"High": 1, "Medium": 1, "Low": 2},
        "scatter_data": [
            {"attendance_percentage": 55.0, "overall_grade_avg": 38.5},
            {"attendance_percentage": 74.5, "overall_grade_avg": 61.0},
            {"attendance_percentage": 97.0, "overall_grade_avg": 88.0},
            {"attendance_percentage": 91.0, "overall_grade_avg": 79.0}
        ],
        "total_students": 4,
        "average_attendance": 79.375,
        "average_grade": 66.625
    })
}

async fn analysis_service() -> String {
    let addr = support::serve(
        Router::new()
            .route(ANALYZE_PATH, post(|| async { Json(fixture_students()) }))
            .route(SUMMARY_PATH, post(|| async { Json(fixture_summary()) })),
    )
    .await;
    format!("http://{}", addr)
}

#[derive(Clone, Default)]
struct Outbox {
    sent: Arc<Mutex<Vec<Value>>>,
    reject: bool,
}

async fn provider(State(outbox): State<Outbox>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    outbox.sent.lock().unwrap().push(body);
    if outbox.reject {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"message": "invalid recipient"})),
        )
    } else {
        (StatusCode::ACCEPTED, Json(json!({})))
    }
}

/// Starts a stub provider and a real relay in front of it; returns the relay URL.
async fn relay(outbox: &Outbox) -> String {
    let provider_addr = support::serve(
        Router::new()
            .route("/v1/email", post(provider))
            .with_state(outbox.clone()),
    )
    .await;
    let mut config = RelayConfig::new("key", "alerts@school.example");
    config.provider_url = format!("http://{}/v1/email", provider_addr);
    let relay_addr = support::serve(create_router(AppState::mailersend(&config).unwrap())).await;
    format!("http://{}", relay_addr)
}

async fn loaded_cycle() -> UploadCycle {
    let selection = UploadSelection {
        students: Some(UploadFile::new("students.csv", "x")),
        academic: Some(UploadFile::new("academic_records.csv", "x")),
        activity: Some(UploadFile::new("activity_records.csv", "x")),
    };
    let client = AnalysisClient::new(AnalysisClientConfig {
        base_url: analysis_service().await,
        timeout: None,
    })
    .unwrap();

    let mut cycle = UploadCycle::new();
    cycle.begin().unwrap();
    let outcome = client.analyze(&selection.to_bundle().unwrap()).await;
    assert!(cycle.finish(outcome).unwrap().is_none());
    cycle
}

#[tokio::test]
async fn test_dashboard_panels_from_mock_service() {
    let cycle = loaded_cycle().await;
    let students = cycle.students().unwrap();
    let summary = cycle.summary().unwrap();

    // Distribution must account for every student.
    assert_eq!(summary.distributed_total(), summary.total_students);
    assert_eq!(summary.total_students as usize, students.len());

    let panel = SummaryPanel::new(students, summary);
    assert_eq!(panel.total_students, 4);
    assert_eq!(panel.high_risk, 1);
    assert_eq!(panel.medium_risk, 1);
    assert_eq!(panel.average_attendance, "79.4%");

    let view = DashboardView::new(summary);
    assert_eq!(view.slice_total(), summary.total_students);
    assert_eq!(view.scatter.len(), students.len());
    assert_eq!(view.cards[2].value, "66.6%");

    let table = render_student_table(students);
    for student in students {
        assert!(table.contains(&student.student_id));
    }

    let detail = StudentDetail::from(cycle.student("S1").unwrap());
    assert_eq!(detail.risk_class, "high");
    assert_eq!(detail.metrics[2], ("Backlogs", "3".to_string()));
}

#[tokio::test]
async fn test_notify_guardian_through_relay() {
    let cycle = loaded_cycle().await;
    let outbox = Outbox::default();
    let relay = RelayClient::new(&relay(&outbox).await, None).unwrap();
    let student = cycle.student("S2").unwrap();

    assert_eq!(confirmation_prompt(student), "Send notification for Alan Turing?");

    let outcome = relay.notify_student(student).await;
    assert_eq!(outcome, NotifyOutcome::Sent);
    assert_eq!(
        outcome.acknowledgment(relay.port()).message,
        "Notification sent successfully!"
    );

    let sent = outbox.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0]["to"], json!([{"email": "alan.parent@example.com"}]));
    assert_eq!(sent[0]["subject"], json!("Student Risk Alert: Alan Turing"));
    assert_eq!(
        sent[0]["text"],
        json!("This is an alert for Alan Turing (S2), who is currently at Medium risk.")
    );
}

#[tokio::test]
async fn test_provider_rejection_reaches_the_user() {
    let cycle = loaded_cycle().await;
    let outbox = Outbox {
        reject: true,
        ..Default::default()
    };
    let relay = RelayClient::new(&relay(&outbox).await, None).unwrap();

    let outcome = relay.notify_student(cycle.student("S1").unwrap()).await;

    assert_eq!(
        outcome,
        NotifyOutcome::Failed(json!({"message": "invalid recipient"}))
    );
    assert_eq!(
        outcome.acknowledgment(relay.port()).message,
        r#"Failed to send notification: {"message":"invalid recipient"}"#
    );
}

#[tokio::test]
async fn test_relay_down_acknowledgment() {
    let cycle = loaded_cycle().await;
    let addr = support::closed_addr().await;
    let relay = RelayClient::new(&format!("http://{}", addr), None).unwrap();

    let outcome = relay.notify_student(cycle.student("S3").unwrap()).await;

    assert!(matches!(outcome, NotifyOutcome::Unreachable(_)));
    assert_eq!(
        outcome.acknowledgment(relay.port()).message,
        format!("Error: Is the notification server running on port {}?", addr.port())
    );
}

#[tokio::test]
async fn test_missing_file_never_reaches_the_service() {
    let selection = UploadSelection {
        students: Some(UploadFile::new("students.csv", "x")),
        ..Default::default()
    };
    let err = selection.to_bundle().unwrap_err();
    assert_eq!(err.to_string(), MISSING_FILES_MESSAGE);
    assert_eq!(err.kind(), "validation");
}

#[tokio::test]
async fn test_failed_upload_keeps_no_data() {
    let addr = support::closed_addr().await;
    let client = AnalysisClient::new(AnalysisClientConfig {
        base_url: format!("http://{}", addr),
        timeout: None,
    })
    .unwrap();
    let bundle = UploadSelection {
        students: Some(UploadFile::new("students.csv", "x")),
        academic: Some(UploadFile::new("academic_records.csv", "x")),
        activity: Some(UploadFile::new("activity_records.csv", "x")),
    }
    .to_bundle()
    .unwrap();

    let mut cycle = UploadCycle::new();
    cycle.begin().unwrap();
    let ack = cycle.finish(client.analyze(&bundle).await).unwrap();

    assert_eq!(ack.unwrap().message, "Analysis failed. Check server logs.");
    assert!(cycle.students().is_none());
    assert!(cycle.summary().is_none());
    assert!(!cycle.is_loading());
}
