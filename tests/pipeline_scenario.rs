//! End-to-end scenarios over the request pipeline without HTTP:
//! prediction -> similarity lookup -> prompt.

use std::sync::Arc;

use dreamscape::features::parse_sample;
use dreamscape::model::PredictError;
use dreamscape::prompt::FALLBACK_PROMPT;
use dreamscape::similarity::find_similar;
use dreamscape::{
    DreamEngine, DreamRecord, DreamTable, EmotionPredictor, FeatureSequence, Prediction,
    SequenceRegressor,
};

struct FixedPredictor(Prediction);

impl EmotionPredictor for FixedPredictor {
    fn predict(&self, _input: &FeatureSequence) -> Result<Prediction, PredictError> {
        Ok(self.0)
    }
}

fn tags(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| (*s).to_string()).collect()
}

fn dream(id: u64, valence: f64, arousal: f64, theme: &str, setting: &str, emotion: &str) -> DreamRecord {
    DreamRecord {
        dream_id: Some(id),
        mood_valence: valence,
        mood_arousal: arousal,
        themes: tags(&[theme]),
        settings: tags(&[setting]),
        emotions: tags(&[emotion]),
        ..DreamRecord::default()
    }
}

fn three_dreams() -> DreamTable {
    DreamTable::new(vec![
        dream(0, 0.9, 0.8, "flying", "home", "happy"),
        dream(1, -0.8, -0.7, "chase", "city", "fear"),
        dream(2, 0.0, 0.0, "everyday", "unknown", "neutral"),
    ])
}

fn sample_json() -> &'static [u8] {
    br#"{"eeg_theta_power": 91.9, "eeg_gamma_power": 14.8, "eeg_delta_power": 80.5,
         "heart_rate_bpm": 80.8, "hrv_ms": 41.0, "rem_bursts": 1, "chin_emg": 12.7,
         "respiration_rate": 12.3, "resp_irregularity": 0.041, "skin_conductance": 2.35}"#
}

#[test]
fn test_nearest_dream_drives_prompt() {
    let engine = DreamEngine::new(
        Arc::new(FixedPredictor(Prediction::new(0.85, 0.75))),
        Arc::new(three_dreams()),
        1,
    );
    let sample = parse_sample(sample_json()).unwrap();
    let response = engine.generate(&sample).unwrap();

    assert_eq!(
        response.prompt,
        "A dreamlike, surreal scene about 'flying' taking place in a 'home'. The atmosphere feels 'happy'."
    );
    assert_eq!(response.predicted_emotion, Prediction::new(0.85, 0.75));
}

#[test]
fn test_empty_table_falls_back() {
    let engine = DreamEngine::new(
        Arc::new(FixedPredictor(Prediction::new(0.0, 0.0))),
        Arc::new(DreamTable::default()),
        3,
    );
    let response = engine.generate_from_prediction(Prediction::new(0.3, -0.2));
    assert_eq!(response.prompt, FALLBACK_PROMPT);
    assert_eq!(response.predicted_emotion, Prediction::new(0.3, -0.2));
}

#[test]
fn test_k_beyond_table_returns_all_sorted() {
    let table = three_dreams();
    let neighbors = find_similar(table.records(), Prediction::new(0.1, 0.1), 10);
    let ids: Vec<_> = neighbors.iter().filter_map(|n| n.record.dream_id).collect();
    assert_eq!(ids, vec![2, 0, 1]);
    assert!(neighbors.windows(2).all(|w| w[0].distance <= w[1].distance));
}

#[test]
fn test_response_serializes_to_wire_shape() {
    let engine = DreamEngine::new(
        Arc::new(FixedPredictor(Prediction::new(-0.75, -0.6))),
        Arc::new(three_dreams()),
        1,
    );
    let response = engine.generate_from_prediction(Prediction::new(-0.75, -0.6));
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "prompt": "A dreamlike, surreal scene about 'chase' taking place in a 'city'. The atmosphere feels 'fear'.",
            "predicted_emotion": { "valence": -0.75, "arousal": -0.6 }
        })
    );
}

#[test]
fn test_seeded_model_runs_through_engine() {
    let model = SequenceRegressor::seeded(42, 16);
    let engine = DreamEngine::new(Arc::new(model), Arc::new(three_dreams()), 3);
    let sample = parse_sample(sample_json()).unwrap();

    let first = engine.generate(&sample).unwrap();
    let second = engine.generate(&sample).unwrap();
    assert_eq!(first, second);
    assert!(first.predicted_emotion.valence.is_finite());
    assert!(first.predicted_emotion.arousal.is_finite());
    assert!(first.prompt.starts_with("A dreamlike, surreal scene about '"));
}
