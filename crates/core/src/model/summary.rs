use std::collections::BTreeMap;

/// Topic bucket for questions that carry no topic label.
pub const UNLABELED_TOPIC: &str = "unlabeled";

/// Per-topic correct/total tally inside a summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TopicScore {
    correct: usize,
    total: usize,
}

impl TopicScore {
    fn record(&mut self, is_correct: bool) {
        self.total += 1;
        if is_correct {
            self.correct += 1;
        }
    }

    #[must_use]
    pub fn correct(&self) -> usize {
        self.correct
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }
}

/// Final score for a quiz attempt.
///
/// Computed once when the session finishes and cached verbatim thereafter;
/// also computable on demand for "finish anyway" previews.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizSummary {
    correct: usize,
    total: usize,
    percent: f64,
    passed: bool,
    by_topic: BTreeMap<String, TopicScore>,
}

impl QuizSummary {
    /// Aggregates per-question results into a summary.
    ///
    /// `results` yields `(topic, is_correct)` per question in display
    /// order; questions without a topic are grouped under
    /// [`UNLABELED_TOPIC`], never dropped. An empty result set scores
    /// `0.0`, not a division fault.
    pub(crate) fn from_results<'a>(
        pass_threshold: f64,
        results: impl IntoIterator<Item = (Option<&'a str>, bool)>,
    ) -> Self {
        let mut correct = 0;
        let mut total = 0;
        let mut by_topic: BTreeMap<String, TopicScore> = BTreeMap::new();

        for (topic, is_correct) in results {
            total += 1;
            if is_correct {
                correct += 1;
            }
            by_topic
                .entry(topic.unwrap_or(UNLABELED_TOPIC).to_owned())
                .or_default()
                .record(is_correct);
        }

        #[allow(clippy::cast_precision_loss)]
        let percent = if total == 0 {
            0.0
        } else {
            correct as f64 / total as f64
        };

        Self {
            correct,
            total,
            percent,
            passed: percent >= pass_threshold,
            by_topic,
        }
    }

    // Accessors
    #[must_use]
    pub fn correct(&self) -> usize {
        self.correct
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Fraction of correct answers in `[0.0, 1.0]`.
    #[must_use]
    pub fn percent(&self) -> f64 {
        self.percent
    }

    #[must_use]
    pub fn passed(&self) -> bool {
        self.passed
    }

    #[must_use]
    pub fn by_topic(&self) -> &BTreeMap<String, TopicScore> {
        &self.by_topic
    }

    #[must_use]
    pub fn topic_score(&self, topic: &str) -> Option<TopicScore> {
        self.by_topic.get(topic).copied()
    }
}
