use crate::consts::PROBE_DELIMITER;

/// Parser-level error code for a prefix/suffix that cannot be reconciled
/// with the configured literal. Owned by the downstream parsing
/// collaborator; exposed here because this module defines the matching
/// contract the parser applies.
pub const FRAMING_MISMATCH_CODE: u16 = 1003;

/// A literal split into alternating runs of spaces and non-space text.
fn runs(text: &str) -> Vec<(bool, &str)> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut in_space: Option<bool> = None;

    for (i, c) in text.char_indices() {
        let space = c == PROBE_DELIMITER;
        match in_space {
            Some(s) if s == space => {}
            _ => {
                if let Some(s) = in_space {
                    out.push((s, &text[start..i]));
                }
                start = i;
                in_space = Some(space);
            }
        }
    }
    if let Some(s) = in_space {
        out.push((s, &text[start..]));
    }
    out
}

/// Strips `literal` from the head of `received` under space-run
/// equivalence: a run of one-or-more literal spaces matches a run of
/// one-or-more received spaces (greedily consumed); zero spaces match only
/// zero. Returns the remainder on success.
pub fn strip_prefix<'a>(received: &'a str, literal: &str) -> Option<&'a str> {
    let mut rest = received;
    for (space, run) in runs(literal) {
        if space {
            let consumed = rest.len() - rest.trim_start_matches(PROBE_DELIMITER).len();
            if consumed == 0 {
                return None;
            }
            rest = &rest[consumed..];
        } else {
            rest = rest.strip_prefix(run)?;
        }
    }
    Some(rest)
}

/// Mirror of [`strip_prefix`] for the tail of `received`.
pub fn strip_suffix<'a>(received: &'a str, literal: &str) -> Option<&'a str> {
    let mut rest = received;
    for (space, run) in runs(literal).into_iter().rev() {
        if space {
            let consumed = rest.len() - rest.trim_end_matches(PROBE_DELIMITER).len();
            if consumed == 0 {
                return None;
            }
            rest = &rest[..rest.len() - consumed];
        } else {
            rest = rest.strip_suffix(run)?;
        }
    }
    Some(rest)
}

/// Whole-string match under space-run equivalence.
pub fn matches_with_space_runs(literal: &str, received: &str) -> bool {
    strip_prefix(received, literal) == Some("")
}
