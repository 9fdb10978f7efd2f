use serde::{Deserialize, Serialize};

/// Timing of turn animation and idle spin, in frames.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Frames spent on a quarter turn. Half turns take twice as many.
    pub steps_per_quarter_turn: u32,
    /// Radians the whole assembly spins about +y per idle frame.
    pub idle_spin_step: f32,
    /// Pending turns held while another turn animates.
    pub max_queued_turns: usize,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            steps_per_quarter_turn: 15,
            idle_spin_step: 0.01,
            max_queued_turns: 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn animation_config_defaults() {
        let config = AnimationConfig::default();
        assert_eq!(config.steps_per_quarter_turn, 15);
        assert_eq!(config.idle_spin_step, 0.01);
        assert_eq!(config.max_queued_turns, 64);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: AnimationConfig =
            serde_json::from_str(r#"{ "steps_per_quarter_turn": 4 }"#).unwrap();
        assert_eq!(config.steps_per_quarter_turn, 4);
        assert_eq!(config.max_queued_turns, 64);
    }
}
