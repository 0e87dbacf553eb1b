//! Conversation history rendering
//!
//! Clients resend prior turns with every request; the most recent ones are
//! folded into a plain-text block shared by competitor and judge prompts.

use serde::{Deserialize, Serialize};

/// One earlier question with the answers and ranking it produced
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub question: String,
    /// Answers in competitor order
    #[serde(default)]
    pub answers: Vec<String>,
    /// Ranking as shown to the user, best first
    #[serde(default)]
    pub ranking: Vec<String>,
}

impl ConversationTurn {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            ..Default::default()
        }
    }

    pub fn with_answers(mut self, answers: Vec<String>) -> Self {
        self.answers = answers;
        self
    }

    pub fn with_ranking(mut self, ranking: Vec<String>) -> Self {
        self.ranking = ranking;
        self
    }
}

/// The turns that will be rendered: the last `max_turns`, oldest first
pub fn recent_turns(turns: &[ConversationTurn], max_turns: usize) -> &[ConversationTurn] {
    let start = turns.len().saturating_sub(max_turns);
    &turns[start..]
}

/// Render the context block, or `None` when there is nothing to render
pub fn render_context(turns: &[ConversationTurn], max_turns: usize) -> Option<String> {
    let recent = recent_turns(turns, max_turns);
    if recent.is_empty() {
        return None;
    }

    let mut out = String::from("Previous Conversation Context:\n\n");
    for (idx, turn) in recent.iter().enumerate() {
        out.push_str(&format!("Turn {}:\n", idx + 1));
        out.push_str(&format!("Question: {}\n", turn.question));
        for (i, answer) in turn.answers.iter().enumerate() {
            out.push_str(&format!("Competitor {}: {}\n", i + 1, answer));
        }
        out.push_str(&format!("Ranking: {}\n\n", turn.ranking.join(", ")));
    }

    Some(out.trim_end().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(n: usize) -> ConversationTurn {
        ConversationTurn::new(format!("q{}", n))
            .with_answers(vec![format!("a{}-1", n), format!("a{}-2", n)])
            .with_ranking(vec!["beta".into(), "alpha".into()])
    }

    #[test]
    fn test_empty_history_renders_nothing() {
        assert!(render_context(&[], 5).is_none());
        assert!(render_context(&[turn(1)], 0).is_none());
    }

    #[test]
    fn test_render_single_turn() {
        let block = render_context(&[turn(1)], 5).unwrap();
        assert_eq!(
            block,
            "Previous Conversation Context:\n\n\
             Turn 1:\n\
             Question: q1\n\
             Competitor 1: a1-1\n\
             Competitor 2: a1-2\n\
             Ranking: beta, alpha"
        );
    }

    #[test]
    fn test_only_last_turns_are_kept() {
        let turns: Vec<_> = (1..=7).map(turn).collect();
        let recent = recent_turns(&turns, 5);
        assert_eq!(recent.len(), 5);
        assert_eq!(recent[0].question, "q3");

        let block = render_context(&turns, 5).unwrap();
        assert!(!block.contains("Question: q2\n"));
        assert!(block.contains("Turn 5:\nQuestion: q7"));
    }

    #[test]
    fn test_turn_deserializes_without_answers() {
        let turn: ConversationTurn = serde_json::from_str(r#"{"question": "hi"}"#).unwrap();
        assert!(turn.answers.is_empty());
        assert!(turn.ranking.is_empty());
    }
}
