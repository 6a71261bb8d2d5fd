//! End-to-end wizard flow: key events drive the state machine through a
//! real (stubbed) HTTP round trip and back.

use churnwatch::client::PredictionClient;
use churnwatch::schema::TOTAL_STEPS;
use churnwatch::tui::app::App;
use churnwatch::tui::events::{EventHandler, TuiEvent};
use churnwatch::wizard::{Submission, GENERIC_ERROR_MESSAGE};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Minimal single-request backend stub
async fn stub_backend(status_line: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        // Drain whatever the client sends before responding
        let mut buf = [0u8; 8192];
        let _ = stream.read(&mut buf).await;
        let response = format!(
            "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        stream.shutdown().await.ok();
    });

    format!("http://{}", addr)
}

fn press(app: &mut App, code: KeyCode) {
    app.handle_event(TuiEvent::Key(KeyEvent::new(code, KeyModifiers::empty())));
}

async fn app_against(base_url: &str) -> (App, EventHandler) {
    let client = Arc::new(PredictionClient::new(base_url).unwrap());
    let handler = EventHandler::new();
    let app = App::new(client, handler.sender());
    (app, handler)
}

/// Pump the completion event from the spawned request task into the app
async fn pump_completion(app: &mut App, handler: &mut EventHandler) {
    let event = tokio::time::timeout(std::time::Duration::from_secs(5), handler.next())
        .await
        .expect("request task never completed")
        .expect("event channel closed");
    app.handle_event(event);
}

#[tokio::test]
async fn submit_success_shows_result_then_reset_restarts() {
    let base_url = stub_backend(
        "HTTP/1.1 200 OK",
        r#"{"prediction":"Yes","probability":87}"#,
    )
    .await;
    let (mut app, mut handler) = app_against(&base_url).await;

    // Walk to the final step and submit
    for _ in 1..TOTAL_STEPS {
        press(&mut app, KeyCode::Enter);
    }
    press(&mut app, KeyCode::Enter);
    assert!(app.wizard.is_loading());

    // A second submit while loading must not fire another request; the
    // stub only serves one connection, so a duplicate would hang or fail
    press(&mut app, KeyCode::Enter);

    pump_completion(&mut app, &mut handler).await;
    match app.wizard.submission() {
        Submission::Succeeded(result) => {
            assert!(result.is_high_risk());
            assert_eq!(result.probability, 87.0);
        }
        other => panic!("expected success, got {:?}", other),
    }

    // 'R' starts another prediction from step 1
    press(&mut app, KeyCode::Char('r'));
    assert_eq!(app.wizard.current_step(), 1);
    assert_eq!(*app.wizard.submission(), Submission::Idle);
}

#[tokio::test]
async fn backend_failure_shows_generic_message_and_allows_reset() {
    let base_url = stub_backend(
        "HTTP/1.1 500 Internal Server Error",
        r#"{"detail":"boom"}"#,
    )
    .await;
    let (mut app, mut handler) = app_against(&base_url).await;

    for _ in 1..TOTAL_STEPS {
        press(&mut app, KeyCode::Enter);
    }
    press(&mut app, KeyCode::Enter);
    pump_completion(&mut app, &mut handler).await;

    assert_eq!(
        *app.wizard.submission(),
        Submission::Failed(GENERIC_ERROR_MESSAGE.to_string())
    );
    // Failure is not terminal: the form is interactive and Esc walks back
    press(&mut app, KeyCode::Esc);
    assert_eq!(app.wizard.current_step(), TOTAL_STEPS - 1);
}

#[tokio::test]
async fn late_response_after_reset_is_discarded() {
    let base_url = stub_backend(
        "HTTP/1.1 200 OK",
        r#"{"prediction":"Yes","probability":99}"#,
    )
    .await;
    let (mut app, mut handler) = app_against(&base_url).await;

    for _ in 1..TOTAL_STEPS {
        press(&mut app, KeyCode::Enter);
    }
    press(&mut app, KeyCode::Enter);
    assert!(app.wizard.is_loading());

    // User gives up before the response lands
    app.wizard.reset();

    pump_completion(&mut app, &mut handler).await;
    assert_eq!(*app.wizard.submission(), Submission::Idle);
    assert_eq!(app.wizard.current_step(), 1);
}
