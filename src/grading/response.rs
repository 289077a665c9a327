//! Grading prompt construction and response extraction.

use serde_json::Value;

use crate::domain::GradingResult;

/// Build the prompt asking the model to grade one answer
pub fn grading_prompt(question: &str, correct_answer: &str, candidate_answer: &str) -> String {
  format!(
    r#"You are grading a flashcard answer. Compare the student's answer with the reference answer
and score it from 0.0 to 1.0 for correctness and semantic similarity. Give partial credit
when the answer is close but incomplete.

Question: {question}
Reference Answer: {correct_answer}
Student Answer: {candidate_answer}

Reply with a single JSON object and nothing else:
- "score": number between 0.0 and 1.0
- "confidence": number between 0.0 and 1.0, how sure you are of the score
- "feedback": one or two sentences explaining the score

Example:
{{"score": 0.85, "confidence": 0.9, "feedback": "Covers the main idea but misses one detail."}}"#
  )
}

/// Extract the grading JSON from free text.
///
/// Only the slice from the first `{` to the last `}` is parsed, so prose or
/// code fences around the object are tolerated. Missing or mistyped fields
/// are an error; nothing is defaulted.
pub fn parse_grading_response(raw: &str) -> Result<GradingResult, String> {
  let start = raw.find('{').ok_or("no JSON object in response")?;
  let end = raw.rfind('}').ok_or("no JSON object in response")?;
  if end < start {
    return Err("no JSON object in response".to_string());
  }

  let value: Value =
    serde_json::from_str(&raw[start..=end]).map_err(|e| format!("invalid JSON: {}", e))?;

  let score = unit_interval(&value, "score")?;
  let confidence = unit_interval(&value, "confidence")?;
  let feedback = value
    .get("feedback")
    .and_then(Value::as_str)
    .ok_or("missing or non-string field `feedback`")?
    .to_string();

  Ok(GradingResult {
    score,
    confidence,
    feedback,
  })
}

fn unit_interval(value: &Value, field: &str) -> Result<f64, String> {
  let number = value
    .get(field)
    .and_then(Value::as_f64)
    .ok_or_else(|| format!("missing or non-numeric field `{}`", field))?;
  if !(0.0..=1.0).contains(&number) {
    return Err(format!("field `{}` out of range: {}", field, number));
  }
  Ok(number)
}
