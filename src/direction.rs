//! Translation direction and the fixed language pair it selects from.
//!
//! The translator works between exactly two languages.  [`Direction`] says
//! which of them is the source for an exchange; [`LanguagePair`] maps a
//! direction to everything that depends on it:
//!
//! | Direction | Recognition tag | Synthesis tag | Wire code |
//! |-----------|-----------------|---------------|-----------|
//! | Forward   | source tag      | target tag    | `forward_code` |
//! | Reverse   | target tag      | source tag    | `reverse_code` |
//!
//! [`DirectionState`] is the session-scoped value the UI swaps.  The labels
//! and the direction live in one value so a swap can never be observed
//! half-applied.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// Which of the two fixed languages is the source of a translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    /// Source language → target language.
    #[default]
    Forward,
    /// Target language → source language.
    Reverse,
}

impl Direction {
    /// The opposite direction.
    pub fn flipped(self) -> Self {
        match self {
            Direction::Forward => Direction::Reverse,
            Direction::Reverse => Direction::Forward,
        }
    }
}

// ---------------------------------------------------------------------------
// Language / LanguagePair
// ---------------------------------------------------------------------------

/// One side of the pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    /// Display label, e.g. `"English"`.
    pub label: String,
    /// BCP-47 tag handed to speech recognition / synthesis, e.g. `"en-US"`.
    pub tag: String,
}

impl Language {
    pub fn new(label: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            tag: tag.into(),
        }
    }
}

/// The two languages plus the wire codes the backend expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguagePair {
    pub source: Language,
    pub target: Language,
    /// Value of the `direction` field for [`Direction::Forward`].
    pub forward_code: String,
    /// Value of the `direction` field for [`Direction::Reverse`].
    pub reverse_code: String,
}

impl Default for LanguagePair {
    fn default() -> Self {
        Self {
            source: Language::new("English", "en-US"),
            target: Language::new("Darija", "ar-MA"),
            forward_code: "EN_DA".into(),
            reverse_code: "DA_EN".into(),
        }
    }
}

impl LanguagePair {
    /// Language spoken *into* the microphone for `direction`.
    pub fn input(&self, direction: Direction) -> &Language {
        match direction {
            Direction::Forward => &self.source,
            Direction::Reverse => &self.target,
        }
    }

    /// Language the translation is produced (and spoken) in.
    pub fn output(&self, direction: Direction) -> &Language {
        self.input(direction.flipped())
    }

    /// Recognition language tag for `direction`.
    pub fn input_tag(&self, direction: Direction) -> &str {
        &self.input(direction).tag
    }

    /// Synthesis language tag for `direction`; always the other side.
    pub fn output_tag(&self, direction: Direction) -> &str {
        &self.output(direction).tag
    }

    /// `direction` field value sent to the backend.
    pub fn wire_code(&self, direction: Direction) -> &str {
        match direction {
            Direction::Forward => &self.forward_code,
            Direction::Reverse => &self.reverse_code,
        }
    }

    /// Parse a wire code back into a direction (case-insensitive).
    pub fn parse_code(&self, code: &str) -> Option<Direction> {
        if code.eq_ignore_ascii_case(&self.forward_code) {
            Some(Direction::Forward)
        } else if code.eq_ignore_ascii_case(&self.reverse_code) {
            Some(Direction::Reverse)
        } else {
            None
        }
    }

    /// Source/target labels as displayed for `direction`.
    pub fn labels(&self, direction: Direction) -> Labels {
        Labels {
            source: self.input(direction).label.clone(),
            target: self.output(direction).label.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// DirectionState
// ---------------------------------------------------------------------------

/// Label pair shown next to the input and result areas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    pub source: String,
    pub target: String,
}

/// Current direction together with its display labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectionState {
    direction: Direction,
    labels: Labels,
}

impl DirectionState {
    /// Start in [`Direction::Forward`].
    pub fn new(pair: &LanguagePair) -> Self {
        Self::with_direction(pair, Direction::Forward)
    }

    pub fn with_direction(pair: &LanguagePair, direction: Direction) -> Self {
        Self {
            direction,
            labels: pair.labels(direction),
        }
    }

    pub fn current(&self) -> Direction {
        self.direction
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    /// Flip the direction and exchange the labels in one step.
    pub fn swap(&mut self) -> Direction {
        self.direction = self.direction.flipped();
        std::mem::swap(&mut self.labels.source, &mut self.labels.target);
        self.direction
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_maps_source_to_target() {
        let pair = LanguagePair::default();
        assert_eq!(pair.input_tag(Direction::Forward), "en-US");
        assert_eq!(pair.output_tag(Direction::Forward), "ar-MA");
        assert_eq!(pair.wire_code(Direction::Forward), "EN_DA");
    }

    #[test]
    fn reverse_maps_target_to_source() {
        let pair = LanguagePair::default();
        assert_eq!(pair.input_tag(Direction::Reverse), "ar-MA");
        assert_eq!(pair.output_tag(Direction::Reverse), "en-US");
        assert_eq!(pair.wire_code(Direction::Reverse), "DA_EN");
    }

    #[test]
    fn parse_code_is_case_insensitive() {
        let pair = LanguagePair::default();
        assert_eq!(pair.parse_code("en_da"), Some(Direction::Forward));
        assert_eq!(pair.parse_code("DA_EN"), Some(Direction::Reverse));
        assert_eq!(pair.parse_code("FR_EN"), None);
    }

    #[test]
    fn swap_flips_direction_and_labels_together() {
        let mut state = DirectionState::new(&LanguagePair::default());
        assert_eq!(state.current(), Direction::Forward);
        assert_eq!(state.labels().source, "English");

        assert_eq!(state.swap(), Direction::Reverse);
        assert_eq!(state.labels().source, "Darija");
        assert_eq!(state.labels().target, "English");
        assert_eq!(state.labels(), &LanguagePair::default().labels(Direction::Reverse));
    }

    #[test]
    fn swap_twice_restores_original() {
        let pair = LanguagePair::default();
        let original = DirectionState::new(&pair);
        let mut state = original.clone();
        state.swap();
        state.swap();
        assert_eq!(state, original);
    }

    #[test]
    fn with_direction_sets_matching_labels() {
        let pair = LanguagePair::default();
        let state = DirectionState::with_direction(&pair, Direction::Reverse);
        assert_eq!(state.current(), Direction::Reverse);
        assert_eq!(state.labels().source, "Darija");
    }
}
