//! Deterministic stand-in for the vLLM-backed verifier model.
//!
//! Real LLM inference is an explicit non-goal; this produces a reproducible
//! "ground truth" continuation so the character-LCP verify protocol in
//! `common::verify` can be exercised honestly end to end. Grounded in
//! `original_source/cloud/draft_verifier.py`'s greedy (`temperature=0`)
//! continuation contract: same prompt and draft always produce the same
//! continuation, length roughly `|draft| + 20`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const VOCAB: &[&str] = &[
    "the", "system", "computes", "a", "continuation", "deterministically", "from", "the",
    "prompt", "and", "produces", "a", "response", "that", "matches", "closely", "in",
    "most", "cases", "but", "occasionally", "diverges", "near", "the", "end",
];

/// Generates a continuation for `prompt`, optionally biased to agree with
/// `draft` on its first `agreement_chars` characters so tests can exercise
/// both full-acceptance and corrected-divergence paths deterministically.
pub fn generate_ground_truth(prompt: &str, draft: &str) -> String {
    let seed = format!("{prompt}\u{0}{}", draft.len())
        .bytes()
        .fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
    let mut rng = StdRng::seed_from_u64(seed);

    let target_len = draft.chars().count() + 20;
    let mut out = String::new();
    let mut i = 0usize;
    while out.chars().count() < target_len {
        let idx = (seed as usize + i) % VOCAB.len();
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(VOCAB[idx]);
        i += 1;
    }

    // Greedy decoding is deterministic but not draft-aware; bias the common
    // case toward agreement so most drafts are accepted wholesale, the way a
    // well-calibrated draft model would be in practice.
    if !draft.is_empty() && rng.gen_bool(0.7) {
        let draft_chars: Vec<char> = draft.chars().collect();
        let tail: String = out.chars().skip(draft_chars.len().min(out.chars().count())).collect();
        return format!("{}{}", draft, tail);
    }

    out.chars().take(target_len).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_prompt_and_draft_are_deterministic() {
        let a = generate_ground_truth("hello", "world");
        let b = generate_ground_truth("hello", "world");
        assert_eq!(a, b);
    }

    #[test]
    fn continuation_length_tracks_draft_length() {
        let short = generate_ground_truth("p", "ab");
        let long = generate_ground_truth("p", "abcdefghijklmnop");
        assert!(long.chars().count() >= short.chars().count());
    }
}
