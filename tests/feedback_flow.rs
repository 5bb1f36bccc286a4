//! End-to-end exercise of the session flow against the library surface:
//! ingest -> details -> analysis (with the external endpoint unreachable,
//! so the deterministic fallback kicks in) -> feedback -> reset, plus the
//! stale-resolution discard after a mid-flight reset.

use std::io::Write;

use artelier_lib::feedback::{fallback_feedback, FeedbackOutcome};
use artelier_lib::flow::{ArtworkSession, FlowStep};
use artelier_lib::ingest::read_artwork_data_url;
use artelier_lib::openrouter::{OpenRouterClient, DEFAULT_MODEL};

fn write_sample_artwork(name: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!("artelier-e2e-{}-{}", std::process::id(), name));
    let mut file = std::fs::File::create(&path).unwrap();
    // GIF magic bytes are enough for format sniffing.
    file.write_all(b"GIF89a\x01\x00\x01\x00\x00\x00\x00;").unwrap();
    path
}

fn unreachable_client() -> OpenRouterClient {
    OpenRouterClient::new("test-key".to_string(), DEFAULT_MODEL.to_string())
        .with_base_url("http://127.0.0.1:9".to_string())
}

#[tokio::test]
async fn failed_analysis_lands_on_feedback_with_the_fallback() {
    let path = write_sample_artwork("cat.png");
    let data_url = read_artwork_data_url(&path).await.unwrap();
    std::fs::remove_file(&path).ok();

    let mut session = ArtworkSession::new();
    session.complete_upload(data_url).unwrap();
    assert_eq!(session.step(), FlowStep::Details);

    session
        .set_details(
            "Portrait Photography".to_string(),
            "Lighting & Shadows".to_string(),
        )
        .unwrap();
    let generation = session.begin_analysis().unwrap();
    assert_eq!(session.step(), FlowStep::Analyzing);

    let outcome = unreachable_client()
        .critique_or_fallback(
            session.image().unwrap(),
            session.course(),
            session.focus_area(),
        )
        .await;

    assert!(session.apply_outcome(generation, outcome));
    assert_eq!(session.step(), FlowStep::Feedback);

    let applied = session.feedback().unwrap();
    assert!(applied.degraded);
    assert_eq!(applied.feedback, fallback_feedback("Portrait Photography"));
    assert!(applied
        .feedback
        .techniques
        .iter()
        .any(|t| t.contains("Practice from Portrait Photography")));

    session.reset();
    assert_eq!(session.step(), FlowStep::Upload);
    assert!(session.image().is_none());
    assert!(session.course().is_empty());
    assert!(session.focus_area().is_empty());
    assert!(session.feedback().is_none());
}

#[tokio::test]
async fn reset_while_in_flight_discards_the_late_resolution() {
    let path = write_sample_artwork("late.gif");
    let data_url = read_artwork_data_url(&path).await.unwrap();
    std::fs::remove_file(&path).ok();

    let mut session = ArtworkSession::new();
    session.complete_upload(data_url).unwrap();
    session
        .set_details(
            "Watercolor Fundamentals".to_string(),
            "Overall Improvement".to_string(),
        )
        .unwrap();
    let generation = session.begin_analysis().unwrap();

    // User navigates away before the request resolves.
    session.reset();

    let outcome = unreachable_client()
        .critique_or_fallback(
            "data:image/gif;base64,AAAA",
            "Watercolor Fundamentals",
            "Overall Improvement",
        )
        .await;

    assert!(!session.apply_outcome(generation, outcome));
    assert_eq!(session.step(), FlowStep::Upload);
    assert!(session.feedback().is_none());
}

#[test]
fn analysis_gate_rejects_empty_selections() {
    let mut session = ArtworkSession::new();
    session
        .complete_upload("data:image/png;base64,AAAA".to_string())
        .unwrap();

    assert!(session.begin_analysis().is_err());
    session
        .set_details("Logo Design Principles".to_string(), String::new())
        .unwrap();
    assert!(session.begin_analysis().is_err());
    assert_eq!(session.step(), FlowStep::Details);
}

#[test]
fn stale_generation_cannot_force_a_feedback_transition() {
    let mut session = ArtworkSession::new();
    session
        .complete_upload("data:image/png;base64,AAAA".to_string())
        .unwrap();
    session
        .set_details(
            "Digital Illustration Basics".to_string(),
            "Technique & Brushwork".to_string(),
        )
        .unwrap();
    let generation = session.begin_analysis().unwrap();
    session.reset();

    // A second upload begins while the first request is still out there.
    session
        .complete_upload("data:image/png;base64,BBBB".to_string())
        .unwrap();
    assert!(!session.apply_outcome(
        generation,
        FeedbackOutcome::fallback("Digital Illustration Basics")
    ));
    assert_eq!(session.step(), FlowStep::Details);
    assert!(session.feedback().is_none());
}
