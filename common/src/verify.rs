//! Character-level longest-common-prefix verification, shared by the cloud's
//! `/verify` handler and any in-process verifier fakes used in tests.
//!
//! Grounded in `original_source/cloud/draft_verifier.py::verify_draft`.

use crate::types::VerifyResponse;

/// Compares a draft continuation against a ground-truth continuation of the
/// same prompt, accepting the longest matching character prefix and
/// patching in the cloud's correction for the rest.
pub fn verify_by_longest_common_prefix(prompt: &str, draft_text: &str, ground_truth: &str, latency_ms: f32) -> VerifyResponse {
    let draft_chars: Vec<char> = draft_text.chars().collect();
    let truth_chars: Vec<char> = ground_truth.chars().collect();

    let match_len = draft_chars
        .iter()
        .zip(truth_chars.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let total_chars = draft_chars.len();
    let acceptance_rate = if total_chars > 0 {
        match_len as f32 / total_chars as f32
    } else {
        1.0
    };

    let accepted: String = draft_chars[..match_len].iter().collect();
    let correction: String = truth_chars[match_len..].iter().collect();
    let final_text = format!("{prompt}{accepted}{correction}");

    let is_fully_accepted = match_len == total_chars;
    let corrected_positions = if is_fully_accepted { vec![] } else { vec![-1] };

    VerifyResponse {
        verified_tokens: vec![accepted, correction],
        accepted_count: match_len as u32,
        total_count: total_chars as u32,
        acceptance_rate,
        corrected_positions,
        final_text,
        latency_ms,
    }
}
