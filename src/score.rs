/// Map elapsed session time to a 0-100 focus score.
///
/// Two points per minute of uninterrupted focus, capped at 100 (reached
/// after 50 minutes). Placeholder heuristic; no external signal involved.
pub fn focus_score(elapsed_ms: u64) -> u8 {
    // floor(minutes * 2) == elapsed_ms / 30_000 for integer milliseconds
    (elapsed_ms / 30_000).min(100) as u8
}
