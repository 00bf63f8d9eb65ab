use crate::aim::{resolve_aim, AimOutcome};
use crate::consts::{
    compose, ASCII_NUL, AIM_SYMBOLOGY_CODE, GROUP_SEPARATOR, LINE_FEED,
    LOW_PERFORMANCE_DROP_RATIO, PROBE_DELIMITER, UNRECOGNISED_OVERLAP_THRESHOLD,
};
use crate::framing;
use crate::rounds::{CalibrationRound, ExpectedSlot};
use itertools::Itertools;
use scancal_protocol::{InformationType, KeyboardScript, ScannerKeyboardPerformance};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// Framing literals to strip from a received response before alignment.
#[derive(Debug, Clone, Copy, Default)]
pub struct FramingConfig<'a> {
    pub prefix: Option<&'a str>,
    pub suffix: Option<&'a str>,
    /// A pre-seeded literal prefix as the host actually reports it, taking
    /// precedence over `prefix` so ambiguous space runs inside the literal
    /// need not be re-discovered.
    pub reported_prefix: Option<&'a str>,
}

/// Everything the baseline round teaches the engine.
#[derive(Debug, Clone, Default)]
pub struct BaselineInference {
    pub character_map: BTreeMap<char, char>,
    pub dead_keys_map: BTreeMap<String, String>,
    pub scanner_dead_keys_map: BTreeMap<char, String>,
    pub scanner_unassigned_keys: Vec<char>,
    /// Expected character -> received image, for every answered printable
    /// slot. Drives AIM resolution and dead-key round alignment.
    pub images: BTreeMap<char, char>,
    /// Discovered host-side dead key -> its standalone echo character.
    pub dead_key_echoes: BTreeMap<char, char>,
    pub reported_characters: String,
    pub aim_flag_character_sequence: String,
    pub aim_flag_reported: bool,
    pub line_feed_character: Option<char>,
    pub group_separator_reported: bool,
    pub keyboard_script: KeyboardScript,
    pub performance: ScannerKeyboardPerformance,
    pub discovered_prefix: Option<String>,
    pub discovered_suffix: Option<String>,
}

#[derive(Debug)]
pub enum BaselineOutcome {
    Failure(InformationType),
    Success(Box<BaselineInference>),
}

/// What one dead-key round adds to the draft.
#[derive(Debug, Clone, Default)]
pub struct DeadKeyInference {
    pub dead_key_character_map: BTreeMap<String, String>,
    pub dead_keys_map: BTreeMap<String, String>,
    pub ligature_map: BTreeMap<String, char>,
    /// True when at least one slot admitted both the standalone-echo and
    /// the plain character-map reading; the character-map reading won.
    pub ambiguous: bool,
}

/// Splits a received character stream into probe-slot tokens.
fn tokenize(received: &[char]) -> Vec<Vec<char>> {
    let mut tokens = vec![Vec::new()];
    for &c in received {
        if c == PROBE_DELIMITER {
            tokens.push(Vec::new());
        } else {
            tokens.last_mut().expect("tokens never empty").push(c);
        }
    }
    tokens
}

fn strip_framing(text: &str, framing_cfg: &FramingConfig) -> String {
    let mut rest = text;

    let head = framing_cfg.reported_prefix.or(framing_cfg.prefix);
    if let Some(literal) = head {
        match framing::strip_prefix(rest, literal) {
            Some(r) => rest = r,
            None => warn!("configured prefix did not match the reported data"),
        }
    }
    if let Some(literal) = framing_cfg.suffix {
        match framing::strip_suffix(rest, literal) {
            Some(r) => rest = r,
            None => warn!("configured suffix did not match the reported data"),
        }
    }
    rest.to_string()
}

/// Classifies a response that is shorter than the probe expects.
fn classify_shortfall(text: &str, payload: &str) -> InformationType {
    if !text.is_empty() && payload.starts_with(text) {
        return InformationType::PartialCalibrationDataReported;
    }

    let repertoire: BTreeSet<char> = payload.chars().collect();
    let considered: Vec<char> = text
        .chars()
        .filter(|&c| c != PROBE_DELIMITER && c != ASCII_NUL)
        .collect();
    if considered.is_empty() {
        return InformationType::UnrecognisedData;
    }

    let hits = considered.iter().filter(|c| repertoire.contains(c)).count();
    if (hits as f32) < UNRECOGNISED_OVERLAP_THRESHOLD * considered.len() as f32 {
        InformationType::UnrecognisedData
    } else {
        InformationType::IncorrectCalibrationDataReported
    }
}

/// Shape check used when sliding the expected window over a longer
/// response to locate an unconfigured prefix/suffix.
fn window_plausible(slots: &[ExpectedSlot], window: &[Vec<char>]) -> bool {
    slots.iter().zip_eq(window.iter()).all(|(slot, token)| {
        let len = token.len();
        match slot {
            ExpectedSlot::SectionBreak => len == 0,
            ExpectedSlot::Printable(_) => match len {
                0 | 1 => true,
                2 | 3 => token[0] == ASCII_NUL,
                _ => false,
            },
            ExpectedSlot::Control(_) => len <= 1,
            ExpectedSlot::AimProbe => (2..=6).contains(&len),
            ExpectedSlot::DeadKeyPair { .. } => len <= 3,
        }
    })
}

fn find_expected_window(slots: &[ExpectedSlot], tokens: &[Vec<char>]) -> Option<usize> {
    let surplus = tokens.len() - slots.len();
    let starts: Vec<usize> = (0..=surplus)
        .filter(|&s| window_plausible(slots, &tokens[s..s + slots.len()]))
        .collect();
    match starts.as_slice() {
        [only] => Some(*only),
        _ => {
            debug!(candidates = starts.len(), "expected-window alignment not unique");
            None
        }
    }
}

fn join_tokens(tokens: &[Vec<char>]) -> Option<String> {
    if tokens.is_empty() {
        return None;
    }
    Some(
        tokens
            .iter()
            .map(|t| t.iter().collect::<String>())
            .join(&PROBE_DELIMITER.to_string()),
    )
}

fn classify_script(images: &BTreeMap<char, char>) -> KeyboardScript {
    let mut greek = 0usize;
    let mut cyrillic = 0usize;
    let mut other = 0usize;

    for &r in images.values() {
        match r as u32 {
            0x0000..=0x024F => {}
            0x0370..=0x03FF | 0x1F00..=0x1FFF => greek += 1,
            0x0400..=0x052F => cyrillic += 1,
            _ => other += 1,
        }
    }

    if greek > 0 && greek >= cyrillic {
        KeyboardScript::Greek
    } else if cyrillic > 0 {
        KeyboardScript::Cyrillic
    } else if other > 0 {
        KeyboardScript::Unknown
    } else {
        KeyboardScript::Latin
    }
}

fn classify_performance(dropped: usize, slot_count: usize) -> ScannerKeyboardPerformance {
    if dropped == 0 {
        return ScannerKeyboardPerformance::High;
    }
    let ratio = dropped as f32 / slot_count.max(1) as f32;
    if ratio <= LOW_PERFORMANCE_DROP_RATIO {
        ScannerKeyboardPerformance::Medium
    } else {
        ScannerKeyboardPerformance::Low
    }
}

/// Walks the baseline response slot-for-slot against the canonical
/// repertoire and builds the primary substitution model.
pub fn infer_baseline(
    round: &CalibrationRound,
    received: &[char],
    framing_cfg: &FramingConfig,
) -> BaselineOutcome {
    if received.is_empty() {
        return BaselineOutcome::Failure(InformationType::NoCalibrationDataReported);
    }

    let payload = round.payload();
    let slots = round.expected_slots();

    // 1. Strip configured framing literals and split into slot tokens.
    let raw: String = received.iter().collect();
    let text = strip_framing(&raw, framing_cfg);
    let chars: Vec<char> = text.chars().collect();
    let mut tokens = tokenize(&chars);

    // 2. Reconcile the slot count.
    let mut inference = BaselineInference::default();
    if tokens.len() < slots.len() {
        return BaselineOutcome::Failure(classify_shortfall(&text, &payload));
    }
    if tokens.len() > slots.len() {
        let start = match find_expected_window(&slots, &tokens) {
            Some(s) => s,
            None => {
                return BaselineOutcome::Failure(
                    InformationType::IncorrectCalibrationDataReported,
                )
            }
        };
        inference.discovered_prefix = join_tokens(&tokens[..start]);
        inference.discovered_suffix = join_tokens(&tokens[start + slots.len()..]);
        tokens = tokens[start..start + slots.len()].to_vec();
        debug!(
            prefix = ?inference.discovered_prefix,
            suffix = ?inference.discovered_suffix,
            "discovered framing literals"
        );
    }

    // 3. Slot-by-slot alignment.
    inference.group_separator_reported = true;
    let mut dropped = 0usize;
    let mut printable_count = 0usize;
    let mut aim_outcome: Option<AimOutcome> = None;

    for (slot, token) in slots.iter().zip_eq(tokens.iter()) {
        match slot {
            ExpectedSlot::SectionBreak => {
                if !token.is_empty() {
                    return BaselineOutcome::Failure(
                        InformationType::IncorrectCalibrationDataReported,
                    );
                }
            }
            ExpectedSlot::Printable(expected) => {
                printable_count += 1;
                match token.as_slice() {
                    [] => {
                        inference.scanner_unassigned_keys.push(*expected);
                        dropped += 1;
                    }
                    [n] if *n == ASCII_NUL => {
                        inference
                            .scanner_dead_keys_map
                            .insert(*expected, ASCII_NUL.to_string());
                        inference.reported_characters.push(ASCII_NUL);
                        dropped += 1;
                    }
                    [r] => {
                        inference.reported_characters.push(*r);
                        inference.images.insert(*expected, *r);
                        if r != expected {
                            match inference.character_map.entry(*r) {
                                std::collections::btree_map::Entry::Vacant(e) => {
                                    e.insert(*expected);
                                }
                                std::collections::btree_map::Entry::Occupied(e) => {
                                    warn!(
                                        received = %r,
                                        kept = %e.get(),
                                        dropped = %expected,
                                        "two expected characters report the same image"
                                    );
                                }
                            }
                        }
                    }
                    [n, echo] if *n == ASCII_NUL => {
                        // Host-side dead key: the echo names it.
                        inference.reported_characters.push(ASCII_NUL);
                        inference.reported_characters.push(*echo);
                        let key = format!("{}{}", ASCII_NUL, echo);
                        inference
                            .dead_keys_map
                            .entry(key)
                            .or_insert_with(|| expected.to_string());
                        inference.dead_key_echoes.insert(*expected, *echo);
                        debug!(dead_key = %expected, echo = %echo, "discovered dead key");
                    }
                    _ => {
                        return BaselineOutcome::Failure(
                            InformationType::IncorrectCalibrationDataReported,
                        )
                    }
                }
            }
            ExpectedSlot::Control(expected) => {
                match token.as_slice() {
                    // Key produced no output; keyboard-dependent, continue.
                    [] => {
                        if *expected == GROUP_SEPARATOR {
                            inference.group_separator_reported = false;
                        }
                    }
                    [n] if *n == ASCII_NUL => {
                        inference.reported_characters.push(ASCII_NUL);
                        if *expected == GROUP_SEPARATOR {
                            inference.group_separator_reported = false;
                        }
                    }
                    [r] => {
                        inference.reported_characters.push(*r);
                        if r != expected {
                            inference.character_map.entry(*r).or_insert(*expected);
                            if *expected == LINE_FEED {
                                inference.line_feed_character = Some(*r);
                            }
                        }
                    }
                    _ => {
                        return BaselineOutcome::Failure(
                            InformationType::IncorrectCalibrationDataReported,
                        )
                    }
                }
            }
            ExpectedSlot::AimProbe => {
                let code_known = AIM_SYMBOLOGY_CODE
                    .chars()
                    .all(|c| inference.images.contains_key(&c));
                if !code_known {
                    aim_outcome = Some(AimOutcome::NotReported);
                    continue;
                }
                let outcome = resolve_aim(token, AIM_SYMBOLOGY_CODE, &inference.images);
                if outcome == AimOutcome::Misaligned {
                    return BaselineOutcome::Failure(
                        InformationType::IncorrectCalibrationDataReported,
                    );
                }
                for c in token {
                    inference.reported_characters.push(*c);
                }
                aim_outcome = Some(outcome);
            }
            ExpectedSlot::DeadKeyPair { .. } => {
                unreachable!("baseline rounds carry no dead-key pairs")
            }
        }
    }

    // 4. Resolve the AIM flag sequence.
    match aim_outcome {
        Some(AimOutcome::Resolved(seq)) => {
            inference.aim_flag_character_sequence = seq;
            inference.aim_flag_reported = true;
        }
        Some(_) => {
            inference.aim_flag_character_sequence = String::new();
            inference.aim_flag_reported = false;
        }
        None => {
            // AIM assessment disabled for this round.
            inference.aim_flag_reported = true;
        }
    }

    // 5. Classify script and scanner performance.
    inference.keyboard_script = classify_script(&inference.images);
    inference.performance = classify_performance(dropped, printable_count);

    BaselineOutcome::Success(Box::new(inference))
}

/// Walks one dead-key round. `echo` is the standalone echo character the
/// baseline round observed for this dead key.
pub fn infer_dead_key_round(
    dead: char,
    echo: char,
    received: &[char],
    images: &BTreeMap<char, char>,
    framing_cfg: &FramingConfig,
) -> Result<DeadKeyInference, InformationType> {
    if received.is_empty() {
        return Err(InformationType::NoCalibrationDataReported);
    }

    let round = CalibrationRound::DeadKey { dead_key: dead };
    let payload = round.payload();
    let slots = round.expected_slots();

    let raw: String = received.iter().collect();
    let text = strip_framing(&raw, framing_cfg);
    let chars: Vec<char> = text.chars().collect();
    let tokens = tokenize(&chars);

    if tokens.len() < slots.len() {
        return Err(classify_shortfall(&text, &payload));
    }
    if tokens.len() > slots.len() {
        return Err(InformationType::IncorrectCalibrationDataReported);
    }

    let mut inference = DeadKeyInference::default();

    for (slot, token) in slots.iter().zip_eq(tokens.iter()) {
        let base = match slot {
            ExpectedSlot::DeadKeyPair { base, .. } => *base,
            _ => unreachable!("dead-key rounds carry only pairs"),
        };
        let base_image = images.get(&base).copied().unwrap_or(base);
        let pair = format!("{}{}", dead, base);

        match token.as_slice() {
            // Scanner could not transmit the pair; nothing to learn here.
            [] => debug!(pair = %pair, "dead-key pair not transmitted"),
            [n] if *n == ASCII_NUL => debug!(pair = %pair, "dead-key pair swallowed"),
            [x] => {
                if *x == echo || *x == base_image {
                    // One half of the pair vanished; the round is garbled.
                    return Err(InformationType::IncorrectCalibrationDataReported);
                }
                // Combined without the NUL marker. This is the collision
                // case deadKeyCharacterMap disambiguates.
                inference
                    .dead_key_character_map
                    .insert(x.to_string(), pair);
            }
            [n, x] if *n == ASCII_NUL => {
                inference
                    .dead_key_character_map
                    .insert(format!("{}{}", ASCII_NUL, x), pair);
            }
            [n, x, y] if *n == ASCII_NUL => {
                if *y != base_image {
                    return Err(InformationType::IncorrectCalibrationDataReported);
                }
                inference
                    .dead_keys_map
                    .entry(format!("{}{}", ASCII_NUL, x))
                    .or_insert_with(|| dead.to_string());
            }
            [x, y] => {
                if *x == echo && *y == base_image {
                    // Both the plain and the standalone-echo reading fit;
                    // the character-map explanation wins, no entry.
                    inference.ambiguous = true;
                } else if let Some(logical) = compose(dead, base) {
                    inference
                        .ligature_map
                        .insert(format!("{}{}", x, y), logical);
                } else {
                    debug!(pair = %pair, "two-character slot with no composition, skipped");
                }
            }
            _ => return Err(InformationType::IncorrectCalibrationDataReported),
        }
    }

    Ok(inference)
}
