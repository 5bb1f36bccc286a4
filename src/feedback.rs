use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Structured critique returned to the front end: four ordered lists of
/// short text items. Wire names follow the JSON contract the model is asked
/// to produce, so a successful strict parse maps 1:1 onto this struct.
///
/// Fields default to empty: a response that parses as a JSON object but is
/// missing categories simply renders as empty lists. No deeper schema
/// validation is applied.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ArtworkFeedback {
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub improvements: Vec<String>,
    #[serde(default)]
    pub techniques: Vec<String>,
    #[serde(default)]
    pub next_steps: Vec<String>,
}

/// What the requester hands back to the flow: the critique plus whether the
/// deterministic fallback produced it. The user always sees a populated
/// feedback screen either way; `degraded` lets the front end show a small
/// indicator when the external call did not succeed.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FeedbackOutcome {
    pub feedback: ArtworkFeedback,
    pub degraded: bool,
}

impl FeedbackOutcome {
    pub fn live(feedback: ArtworkFeedback) -> Self {
        Self {
            feedback,
            degraded: false,
        }
    }

    pub fn fallback(course: &str) -> Self {
        Self {
            feedback: fallback_feedback(course),
            degraded: true,
        }
    }
}

/// Strict parse of the model's message content. Anything that is not valid
/// JSON for the feedback shape is an error; the caller substitutes the
/// fallback.
pub fn parse_feedback(content: &str) -> Result<ArtworkFeedback> {
    let feedback = serde_json::from_str::<ArtworkFeedback>(content.trim())?;
    Ok(feedback)
}

/// Fixed critique used whenever the external call fails or returns content
/// that does not parse. Deterministic apart from the selected course name
/// woven into the first technique.
pub fn fallback_feedback(course: &str) -> ArtworkFeedback {
    ArtworkFeedback {
        strengths: vec![
            "Strong composition".to_string(),
            "Good use of color".to_string(),
            "Balanced layout".to_string(),
        ],
        improvements: vec![
            "Add contrast".to_string(),
            "Refine lighting".to_string(),
            "Vary textures".to_string(),
        ],
        techniques: vec![
            format!("Practice from {}", course),
            "Apply brushwork demos".to_string(),
            "Study sample lessons".to_string(),
        ],
        next_steps: vec![
            "Rework highlights".to_string(),
            "Upload again after revision".to_string(),
            "Discuss with peers".to_string(),
        ],
    }
}
