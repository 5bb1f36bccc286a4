use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::feedback::FeedbackOutcome;

/// The four mutually exclusive phases a session can occupy. Transitions are
/// monotonic along Upload -> Details -> Analyzing -> Feedback, with the
/// single exception of the full reset back to Upload.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FlowStep {
    Upload,
    Details,
    Analyzing,
    Feedback,
}

/// All session state in one place, owned by the app shell and mutated only
/// through the transition methods below. Nothing here is persisted; the
/// session dies with the process.
#[derive(Clone, Debug)]
pub struct ArtworkSession {
    step: FlowStep,
    image: Option<String>,
    course: String,
    focus_area: String,
    feedback: Option<FeedbackOutcome>,
    // Bumped on every reset. A request carries the generation it was sent
    // under; a resolution whose generation no longer matches is stale and
    // must not touch the session.
    generation: u64,
}

/// Serialized copy of the session handed to the front end.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SessionSnapshot {
    pub step: FlowStep,
    pub image: Option<String>,
    pub course: String,
    pub focus_area: String,
    pub feedback: Option<FeedbackOutcome>,
}

impl Default for ArtworkSession {
    fn default() -> Self {
        Self {
            step: FlowStep::Upload,
            image: None,
            course: String::new(),
            focus_area: String::new(),
            feedback: None,
            generation: 0,
        }
    }
}

impl ArtworkSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> FlowStep {
        self.step
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn course(&self) -> &str {
        &self.course
    }

    pub fn focus_area(&self) -> &str {
        &self.focus_area
    }

    pub fn feedback(&self) -> Option<&FeedbackOutcome> {
        self.feedback.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            step: self.step,
            image: self.image.clone(),
            course: self.course.clone(),
            focus_area: self.focus_area.clone(),
            feedback: self.feedback.clone(),
        }
    }

    /// Upload -> Details, carrying the ingested data URL.
    pub fn complete_upload(&mut self, image_data_url: String) -> Result<(), String> {
        if self.step != FlowStep::Upload {
            return Err(format!(
                "Cannot accept an upload while in the {:?} step",
                self.step
            ));
        }
        self.image = Some(image_data_url);
        self.step = FlowStep::Details;
        info!("🖼️ Artwork ingested, session moved to details step");
        Ok(())
    }

    /// Stores the contextual selections. Valid only while on the details
    /// step; empty values are allowed here (the user may still be choosing),
    /// the gate lives in `begin_analysis`.
    pub fn set_details(&mut self, course: String, focus_area: String) -> Result<(), String> {
        if self.step != FlowStep::Details {
            return Err(format!(
                "Cannot update details while in the {:?} step",
                self.step
            ));
        }
        self.course = course;
        self.focus_area = focus_area;
        Ok(())
    }

    /// Details -> Analyzing, gated on both selections being non-empty.
    /// Returns the generation the caller must present when applying the
    /// outcome.
    pub fn begin_analysis(&mut self) -> Result<u64, String> {
        if self.step != FlowStep::Details {
            return Err(format!(
                "Cannot start analysis while in the {:?} step",
                self.step
            ));
        }
        if self.course.is_empty() || self.focus_area.is_empty() {
            return Err("Select a course and a focus area before requesting feedback".to_string());
        }
        self.step = FlowStep::Analyzing;
        info!(
            "🚀 Analysis started for course '{}' / focus '{}'",
            self.course, self.focus_area
        );
        Ok(self.generation)
    }

    /// Analyzing -> Feedback. Every resolution of the external call lands
    /// here, success and fallback alike; there is no failure step. A stale
    /// resolution (generation mismatch after a reset) is discarded.
    pub fn apply_outcome(&mut self, generation: u64, outcome: FeedbackOutcome) -> bool {
        if generation != self.generation || self.step != FlowStep::Analyzing {
            warn!(
                "⚠️ Discarding stale analysis result (sent under generation {}, session at {} in {:?})",
                generation, self.generation, self.step
            );
            return false;
        }
        self.feedback = Some(outcome);
        self.step = FlowStep::Feedback;
        info!("🎉 Feedback ready, session moved to feedback step");
        true
    }

    /// Back to a pristine Upload state from anywhere. Bumps the generation
    /// so an in-flight request cannot write into the fresh session.
    pub fn reset(&mut self) {
        let generation = self.generation + 1;
        *self = Self::default();
        self.generation = generation;
        info!("🔄 Session reset (generation {})", generation);
    }
}
