//! Multi-modal signal fusion.
//!
//! A journal submission may carry text, an image, both, or neither. Each
//! present modality is classified elsewhere into a [`ModalityReading`];
//! [`combine`] folds up to two readings into the single sentiment/emotion
//! pair that gets stored.
//!
//! Text is trusted more than images. Sentiment is a fixed 0.7/0.3 blend,
//! while the emotion label comes from text whenever text has one. Labels
//! are categorical and are never averaged.

use serde::{Deserialize, Serialize};

/// Weight of the text sentiment when both modalities are present.
pub const TEXT_WEIGHT: f64 = 0.7;

/// Weight of the image sentiment when both modalities are present.
pub const IMAGE_WEIGHT: f64 = 0.3;

/// Label used when no modality supplies one.
pub const NEUTRAL_EMOTION: &str = "neutral";

/// One classifier's estimate for one modality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModalityReading {
    /// Expected to lie in `[-1, 1]`
    pub sentiment: f64,

    #[serde(default)]
    pub emotion: Option<String>,
}

impl ModalityReading {
    pub fn new(sentiment: f64, emotion: impl Into<String>) -> Self {
        Self {
            sentiment,
            emotion: Some(emotion.into()),
        }
    }

    pub fn sentiment_only(sentiment: f64) -> Self {
        Self {
            sentiment,
            emotion: None,
        }
    }

    /// Reading derived from a facial-expression label.
    pub fn from_face_label(label: &str) -> Self {
        let emotion = label.trim().to_lowercase();
        Self {
            sentiment: face_emotion_sentiment(&emotion),
            emotion: Some(emotion),
        }
    }

    /// The emotion label, treating an empty string as absent.
    pub fn label(&self) -> Option<&str> {
        self.emotion.as_deref().filter(|label| !label.is_empty())
    }
}

/// Fused result ready to be stored with an entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusedSignal {
    pub sentiment: f64,
    pub emotion: String,
}

impl FusedSignal {
    pub fn neutral() -> Self {
        Self {
            sentiment: 0.0,
            emotion: NEUTRAL_EMOTION.to_string(),
        }
    }
}

/// Combine optional text and image readings into one signal.
///
/// | text | image | sentiment | emotion |
/// |------|-------|-----------|---------|
/// | -    | -     | 0.0 | neutral |
/// | t    | -     | t | t, else neutral |
/// | -    | i     | i | i, else neutral |
/// | t    | i     | 0.7 t + 0.3 i | t, else i, else neutral |
pub fn combine(text: Option<&ModalityReading>, image: Option<&ModalityReading>) -> FusedSignal {
    match (text, image) {
        (None, None) => FusedSignal::neutral(),
        (Some(only), None) | (None, Some(only)) => FusedSignal {
            sentiment: only.sentiment,
            emotion: only.label().unwrap_or(NEUTRAL_EMOTION).to_string(),
        },
        (Some(text), Some(image)) => FusedSignal {
            sentiment: TEXT_WEIGHT * text.sentiment + IMAGE_WEIGHT * image.sentiment,
            emotion: text
                .label()
                .or_else(|| image.label())
                .unwrap_or(NEUTRAL_EMOTION)
                .to_string(),
        },
    }
}

/// Sentiment scalar for a facial-expression label.
///
/// Unknown labels map to `0.0`. Matching is case-insensitive.
pub fn face_emotion_sentiment(label: &str) -> f64 {
    match label.trim().to_lowercase().as_str() {
        "happy" => 1.0,
        "neutral" => 0.0,
        "sad" | "angry" | "fear" | "disgust" => -1.0,
        "surprise" => 0.2,
        _ => 0.0,
    }
}

/// Contract of an external text classifier.
pub trait TextClassifier {
    /// Classify text known to contain something other than whitespace.
    ///
    /// Failures are reported as `None`, never as errors.
    fn classify_nonblank(&self, text: &str) -> Option<ModalityReading>;

    /// Classify `text`; blank input yields `None` without consulting the model.
    fn classify_text(&self, text: &str) -> Option<ModalityReading> {
        if text.trim().is_empty() {
            return None;
        }
        self.classify_nonblank(text)
    }
}

/// Contract of an external image classifier.
pub trait ImageClassifier {
    /// Classify raw image bytes. Any processing failure yields `None`.
    fn classify_image(&self, image: &[u8]) -> Option<ModalityReading>;
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    #[test]
    fn test_weights_sum_to_one() {
        assert!((TEXT_WEIGHT + IMAGE_WEIGHT - 1.0).abs() < EPSILON);
        assert_eq!(TEXT_WEIGHT, 0.7);
        assert_eq!(IMAGE_WEIGHT, 0.3);
    }

    #[test]
    fn test_combine_nothing_is_neutral() {
        assert_eq!(combine(None, None), FusedSignal::neutral());
    }

    #[test]
    fn test_combine_both_blends_sentiment_and_prefers_text_label() {
        let text = ModalityReading::new(0.5, "joy");
        let image = ModalityReading::new(-1.0, "sad");
        let fused = combine(Some(&text), Some(&image));

        assert!((fused.sentiment - 0.05).abs() < EPSILON);
        assert_eq!(fused.emotion, "joy");
    }

    #[test]
    fn test_combine_both_falls_back_to_image_label() {
        let text = ModalityReading::new(1.0, "");
        let image = ModalityReading::new(0.0, "surprise");
        let fused = combine(Some(&text), Some(&image));

        assert!((fused.sentiment - 0.7).abs() < EPSILON);
        assert_eq!(fused.emotion, "surprise");

        let unlabeled = combine(
            Some(&ModalityReading::sentiment_only(-1.0)),
            Some(&ModalityReading::sentiment_only(1.0)),
        );
        assert!((unlabeled.sentiment + 0.4).abs() < EPSILON);
        assert_eq!(unlabeled.emotion, NEUTRAL_EMOTION);
    }

    #[test]
    fn test_combine_single_modality_passes_through() {
        let image = ModalityReading::new(0.8, "happy");
        assert_eq!(
            combine(None, Some(&image)),
            FusedSignal {
                sentiment: 0.8,
                emotion: "happy".to_string()
            }
        );

        let text = ModalityReading::sentiment_only(-0.25);
        assert_eq!(
            combine(Some(&text), None),
            FusedSignal {
                sentiment: -0.25,
                emotion: NEUTRAL_EMOTION.to_string()
            }
        );
    }

    #[test]
    fn test_face_label_mapping() {
        assert_eq!(face_emotion_sentiment("happy"), 1.0);
        assert_eq!(face_emotion_sentiment("neutral"), 0.0);
        for negative in ["sad", "angry", "fear", "disgust"] {
            assert_eq!(face_emotion_sentiment(negative), -1.0);
        }
        assert_eq!(face_emotion_sentiment("surprise"), 0.2);
        assert_eq!(face_emotion_sentiment("HAPPY"), 1.0);
        assert_eq!(face_emotion_sentiment("contempt"), 0.0);

        let reading = ModalityReading::from_face_label(" Sad ");
        assert_eq!(reading.sentiment, -1.0);
        assert_eq!(reading.label(), Some("sad"));
        assert_eq!(ModalityReading::from_face_label("").label(), None);
    }

    struct Echo;

    impl TextClassifier for Echo {
        fn classify_nonblank(&self, text: &str) -> Option<ModalityReading> {
            Some(ModalityReading::new(1.0, text))
        }
    }

    #[test]
    fn test_blank_text_is_never_classified() {
        assert_eq!(Echo.classify_text("   \n"), None);
        assert_eq!(
            Echo.classify_text("calm").and_then(|r| r.emotion),
            Some("calm".to_string())
        );
    }
}
