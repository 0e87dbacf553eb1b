//! Prompt templates for question generation, competitors and the judge

use llm::{ChatRequest, Message};

pub const QUESTION_GENERATION_PROMPT: &str = "Please come up with a challenging, nuanced question \
that I can ask a number of LLMs to evaluate their intelligence. Answer only with the question, \
no explanation.";

pub const JUDGE_SYSTEM_PROMPT: &str = "You are a strict ranking engine. Output JSON only.";

const JUDGE_OUTPUT_RULES: &str = r#"Return ONLY valid JSON in this exact structure:

{"results": [list_of_competitor_numbers_in_best_to_worst_order]}

Rules:
- No explanations
- No markdown
- No commentary
- No extra text
- Strict JSON only"#;

/// Request asking a model to invent a question
pub fn question_generation_request() -> ChatRequest {
    ChatRequest::new(vec![Message::user(QUESTION_GENERATION_PROMPT)])
}

/// Prompt sent to every competitor
pub fn competitor_prompt(context: Option<&str>, question: &str) -> String {
    let prompt = format!(
        "{}\n\nCurrent Question:\n{}\n\nProvide your best possible answer considering the previous context if relevant.",
        context.unwrap_or_default(),
        question
    );
    prompt.trim().to_string()
}

/// Prompt asking the judge to order numbered answers
pub fn judge_prompt(context: Option<&str>, question: &str, answers: &[&str]) -> String {
    let mut responses = String::new();
    for (idx, answer) in answers.iter().enumerate() {
        responses.push_str(&format!("Competitor {}:\n{}\n\n", idx + 1, answer));
    }

    format!(
        "You must rank the competitors from best to worst.\n\n{}\n\nCurrent Question:\n{}\n\nResponses:\n{}{}",
        context.unwrap_or_default(),
        question,
        responses,
        JUDGE_OUTPUT_RULES
    )
}

/// Judge request: fixed system message, zero temperature, JSON output
pub fn judge_request(prompt: String) -> ChatRequest {
    ChatRequest::new(vec![Message::system(JUDGE_SYSTEM_PROMPT), Message::user(prompt)])
        .with_temperature(0.0)
        .with_json_output()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_competitor_prompt_without_context() {
        let prompt = competitor_prompt(None, "What is ownership?");
        assert!(prompt.starts_with("Current Question:\nWhat is ownership?"));
        assert!(prompt.ends_with("considering the previous context if relevant."));
    }

    #[test]
    fn test_competitor_prompt_with_context() {
        let prompt = competitor_prompt(Some("Previous Conversation Context:\n\nTurn 1:"), "next?");
        assert!(prompt.starts_with("Previous Conversation Context:"));
        assert!(prompt.contains("\n\nCurrent Question:\nnext?\n\n"));
    }

    #[test]
    fn test_judge_prompt_numbers_answers() {
        let prompt = judge_prompt(None, "q", &["first", "second"]);
        assert!(prompt.starts_with("You must rank the competitors from best to worst."));
        assert!(prompt.contains("Competitor 1:\nfirst\n\nCompetitor 2:\nsecond\n\n"));
        assert!(prompt.contains(r#"{"results": [list_of_competitor_numbers_in_best_to_worst_order]}"#));
    }

    #[test]
    fn test_judge_request_settings() {
        let request = judge_request("rank".into());
        assert_eq!(request.messages[0].content, JUDGE_SYSTEM_PROMPT);
        assert_eq!(request.temperature, Some(0.0));
        assert!(request.json_output);
    }
}
