use std::collections::BTreeMap;
use tracing::debug;

/// Result of resolving the AIM flag sub-probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AimOutcome {
    /// The flag key produced the given sequence (a bare NUL is legal: the
    /// key was pressed but produced no visible character).
    Resolved(String),
    /// No flag character preceded the symbology code.
    NotReported,
    /// The probe tail does not align with the symbology-code images.
    Misaligned,
}

/// Resolves `aimFlagCharacterSequence` from the wrapped probe token.
///
/// The probe encodes the flag character immediately followed by a known
/// two-character symbology code. The flag itself may be remapped or
/// suppressed by the host layout, so it is resolved independently of the
/// main character map: the token must end with the images of the two code
/// characters, and whatever precedes them is the flag sequence.
pub fn resolve_aim(
    token: &[char],
    code: &str,
    images: &BTreeMap<char, char>,
) -> AimOutcome {
    let code_images: Option<Vec<char>> = code.chars().map(|c| images.get(&c).copied()).collect();
    let code_images = match code_images {
        Some(imgs) => imgs,
        None => {
            debug!("symbology code characters have no baseline image");
            return AimOutcome::Misaligned;
        }
    };

    if token.len() < code_images.len() || !token.ends_with(&code_images) {
        return AimOutcome::Misaligned;
    }

    let head = &token[..token.len() - code_images.len()];
    if head.is_empty() {
        AimOutcome::NotReported
    } else {
        AimOutcome::Resolved(head.iter().collect())
    }
}
