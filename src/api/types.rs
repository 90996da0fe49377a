// API type definitions
// Request and response payloads of the three endpoints

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Per-label emotion scores, each in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmotionScores {
    pub happy: f64,
    pub sad: f64,
    pub anxious: f64,
    pub calm: f64,
}

/// Emotional state estimated from an audio sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmotionEstimate {
    pub stress: f64,
    pub anxiety: f64,
    pub mood: f64,
    pub energy: f64,
    pub emotions: EmotionScores,
}

impl EmotionEstimate {
    /// The fixed estimate returned until real audio analysis exists
    pub const PLACEHOLDER: Self = Self {
        stress: 0.5,
        anxiety: 0.5,
        mood: 0.5,
        energy: 0.5,
        emotions: EmotionScores {
            happy: 0.3,
            sad: 0.3,
            anxious: 0.5,
            calm: 0.5,
        },
    };

    /// Whether every score lies in `[0, 1]`
    pub fn is_normalized(&self) -> bool {
        [
            self.stress,
            self.anxiety,
            self.mood,
            self.energy,
            self.emotions.happy,
            self.emotions.sad,
            self.emotions.anxious,
            self.emotions.calm,
        ]
        .iter()
        .all(|v| (0.0..=1.0).contains(v))
    }
}

/// `POST /train-model` body. Fields are opaque and unvalidated.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingRequest {
    #[serde(default)]
    pub user_id: Option<Value>,
    #[serde(default)]
    pub responses: Option<Value>,
    #[serde(default)]
    pub emotions: Option<Value>,
}

/// `POST /get-suggestions` body. Accepted but not used.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRequest {
    #[serde(default)]
    pub emotional_state: Option<Value>,
    #[serde(default)]
    pub history: Option<Value>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TrainingAck {
    pub success: bool,
    pub message: &'static str,
}

impl TrainingAck {
    pub const UPDATED: Self = Self {
        success: true,
        message: "Model updated",
    };
}

#[allow(dead_code)] // Easy and Hard are valid wire values; the static list only uses Medium
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Suggestion {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    /// Minutes
    pub duration: u32,
    pub difficulty: Difficulty,
}

/// The static suggestion list
pub const SUGGESTIONS: &[Suggestion] = &[Suggestion {
    id: "1",
    title: "Personalized Activity",
    description: "Based on your patterns",
    category: "custom",
    duration: 10,
    difficulty: Difficulty::Medium,
}];

/// Body of every handler failure response
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
}
