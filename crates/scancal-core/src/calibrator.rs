use crate::error::{ScResult, ScanCalError};
use crate::infer::{infer_baseline, infer_dead_key_round, BaselineOutcome, FramingConfig};
use crate::rounds::CalibrationRound;
use crate::segments::requests_for_round;
use crate::token::{CalibrationToken, SessionState};
use scancal_protocol::{Information, InformationType, Size};
use tracing::{debug, info, warn};
use typed_builder::TypedBuilder;

/// Renders one calibration sub-barcode. External collaborator seam: the
/// engine only ever constructs the payload text and the size class.
pub trait SymbolRenderer {
    fn render(&self, payload: &str, size: Size) -> Vec<u8>;
}

/// Drives the calibration round sequence and the substitution-inference
/// algorithm. Construction captures the session-independent configuration;
/// each `calibrate` step is a pure function from the current token and the
/// reported character codes to the next token.
#[derive(Debug, Clone, TypedBuilder)]
pub struct Calibrator {
    /// Probe for an AIM symbology-identifier flag during the baseline round.
    #[builder(default = true)]
    assess_aim: bool,
    /// Literal prefix the scanner is configured to transmit around payloads.
    #[builder(default, setter(strip_option, into))]
    prefix: Option<String>,
    /// Literal suffix the scanner is configured to transmit around payloads.
    #[builder(default, setter(strip_option, into))]
    suffix: Option<String>,
    /// Caller-supplied code literal carried through to the calibration data.
    #[builder(default, setter(strip_option, into))]
    code: Option<String>,
    #[builder(default, setter(skip))]
    reported_prefix: Option<String>,
}

impl Default for Calibrator {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// The finite, restartable sequence of probe tokens derivable before any
/// response: one per baseline sub-barcode. Dead-key rounds discovered from
/// the baseline response are appended to `remaining_barcodes` by
/// [`Calibrator::calibrate`].
#[derive(Debug)]
pub struct TokenSequence {
    tokens: std::vec::IntoIter<CalibrationToken>,
}

impl Iterator for TokenSequence {
    type Item = CalibrationToken;

    fn next(&mut self) -> Option<CalibrationToken> {
        self.tokens.next()
    }
}

impl ExactSizeIterator for TokenSequence {
    fn len(&self) -> usize {
        self.tokens.len()
    }
}

impl Calibrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeds the literal prefix as the host actually reports it, so the
    /// inference step does not have to re-discover it when the literal
    /// contains ambiguous runs of spaces.
    pub fn set_reported_prefix(&mut self, text: impl Into<String>) {
        self.reported_prefix = Some(text.into());
    }

    fn baseline_round(&self) -> CalibrationRound {
        CalibrationRound::Baseline {
            assess_aim: self.assess_aim,
        }
    }

    fn framing_config(&self) -> FramingConfig<'_> {
        FramingConfig {
            prefix: self.prefix.as_deref(),
            suffix: self.suffix.as_deref(),
            reported_prefix: self.reported_prefix.as_deref(),
        }
    }

    /// The ordered probe tokens for a fresh session at the given symbol
    /// size. Pure and restartable: the same size yields the same sequence.
    pub fn calibration_tokens(&self, size: Size) -> ScResult<TokenSequence> {
        let round = self.baseline_round();
        let requests = requests_for_round(&round, 0, size)?;

        let session = SessionState {
            rounds: vec![round],
            ..Default::default()
        };

        let tokens: Vec<CalibrationToken> = (0..requests.len())
            .map(|k| CalibrationToken {
                remaining_barcodes: requests[k..].to_vec(),
                errors: Vec::new(),
                calibration_data: None,
                session: session.clone(),
            })
            .collect();

        Ok(TokenSequence {
            tokens: tokens.into_iter(),
        })
    }

    /// Literal payloads of the baseline round, one per sub-barcode.
    pub fn baseline_barcodes(&self, size: Size) -> ScResult<Vec<String>> {
        Ok(requests_for_round(&self.baseline_round(), 0, size)?
            .into_iter()
            .map(|r| r.payload)
            .collect())
    }

    /// Literal payloads of the dead-key rounds discovered so far, keyed by
    /// dead-key character. Empty before the baseline response is processed.
    pub fn supplemental_barcodes(
        &self,
        token: &CalibrationToken,
        size: Size,
    ) -> ScResult<Vec<(char, Vec<String>)>> {
        let mut out = Vec::new();
        for (index, round) in token.session.rounds.iter().enumerate() {
            if let CalibrationRound::DeadKey { dead_key } = round {
                let payloads = requests_for_round(round, index, size)?
                    .into_iter()
                    .map(|r| r.payload)
                    .collect();
                out.push((*dead_key, payloads));
            }
        }
        Ok(out)
    }

    /// Renders every baseline sub-barcode through the collaborator.
    pub fn render_baseline<R: SymbolRenderer>(
        &self,
        renderer: &R,
        size: Size,
    ) -> ScResult<Vec<Vec<u8>>> {
        Ok(self
            .baseline_barcodes(size)?
            .iter()
            .map(|payload| renderer.render(payload, size))
            .collect())
    }

    /// Renders every discovered dead-key sub-barcode through the collaborator.
    pub fn render_supplemental<R: SymbolRenderer>(
        &self,
        renderer: &R,
        token: &CalibrationToken,
        size: Size,
    ) -> ScResult<Vec<(char, Vec<Vec<u8>>)>> {
        Ok(self
            .supplemental_barcodes(token, size)?
            .into_iter()
            .map(|(dead_key, payloads)| {
                let images = payloads
                    .iter()
                    .map(|payload| renderer.render(payload, size))
                    .collect();
                (dead_key, images)
            })
            .collect())
    }

    /// The core inference step: consumes the front barcode request of
    /// `token`, feeds the reported character codes into the current round,
    /// and returns the next token. Anomalies from the §4.4 taxonomy land on
    /// the token; `Err` is reserved for caller-contract violations.
    pub fn calibrate(
        &self,
        received: &[u32],
        token: CalibrationToken,
    ) -> ScResult<CalibrationToken> {
        let mut token = token;
        if token.is_terminal() {
            return Err(ScanCalError::Session(
                "the calibration session is already terminal".to_string(),
            ));
        }

        let chars: Vec<char> = received
            .iter()
            .map(|&code| char::from_u32(code).ok_or(ScanCalError::InvalidCharacterCode(code)))
            .collect::<ScResult<_>>()?;

        let request = token.remaining_barcodes.remove(0);
        token.session.fragments.push(chars.iter().collect());

        if !request.is_final_segment() {
            debug!(
                segment = request.segment_index,
                of = request.segment_count,
                "buffered fragment"
            );
            return Ok(token);
        }

        // Round complete: reassemble fragments positionally and infer.
        let combined: String = token.session.fragments.concat();
        token.session.fragments.clear();
        let combined_chars: Vec<char> = combined.chars().collect();

        let round = token.session.rounds[request.round_index];
        match round {
            CalibrationRound::Baseline { .. } => {
                self.process_baseline(&round, &combined_chars, &mut token, request.size)?
            }
            CalibrationRound::DeadKey { dead_key } => {
                self.process_dead_key(dead_key, &combined_chars, &mut token)
            }
        }

        if token.is_terminal() && !token.has_errors() {
            self.finalize(&mut token);
        }
        Ok(token)
    }

    fn process_baseline(
        &self,
        round: &CalibrationRound,
        received: &[char],
        token: &mut CalibrationToken,
        size: Size,
    ) -> ScResult<()> {
        match infer_baseline(round, received, &self.framing_config()) {
            BaselineOutcome::Failure(information_type) => {
                warn!(%information_type, "baseline round failed");
                token.errors.push(Information::new(information_type));
                token.remaining_barcodes.clear();
            }
            BaselineOutcome::Success(inference) => {
                if !inference.character_map.is_empty() {
                    token.errors.push(Information::new(
                        InformationType::NonCorrespondingKeyboardLayouts,
                    ));
                }
                if !inference.group_separator_reported {
                    token.errors.push(Information::new(
                        InformationType::GroupSeparatorNotReliablyReported,
                    ));
                }
                if !inference.aim_flag_reported {
                    token
                        .errors
                        .push(Information::new(InformationType::AimFlagNotReported));
                }

                let dead_keys: Vec<char> = inference.dead_key_echoes.keys().copied().collect();
                token.session.draft.absorb_baseline(*inference);

                // One supplemental round per discovered dead key.
                for dead_key in dead_keys {
                    let round = CalibrationRound::DeadKey { dead_key };
                    let index = token.session.rounds.len();
                    token
                        .remaining_barcodes
                        .extend(requests_for_round(&round, index, size)?);
                    token.session.rounds.push(round);
                    info!(dead_key = %dead_key, "scheduled dead-key round");
                }
            }
        }
        Ok(())
    }

    fn process_dead_key(&self, dead_key: char, received: &[char], token: &mut CalibrationToken) {
        let echo = token
            .session
            .draft
            .dead_key_echoes
            .get(&dead_key)
            .copied()
            .unwrap_or(dead_key);

        match infer_dead_key_round(
            dead_key,
            echo,
            received,
            &token.session.draft.images,
            &self.framing_config(),
        ) {
            Err(information_type) => {
                // A garbled dead-key round discards the whole session rather
                // than shipping a half-correct substitution model.
                warn!(%information_type, dead_key = %dead_key, "dead-key round failed");
                token.errors.push(Information::new(information_type));
                token.remaining_barcodes.clear();
            }
            Ok(inference) => {
                if inference.ambiguous {
                    token.errors.push(Information::new(
                        InformationType::AmbiguousDeadKeyInterpretation,
                    ));
                }
                token.session.draft.absorb_dead_key_round(inference);
            }
        }
    }

    fn finalize(&self, token: &mut CalibrationToken) {
        let draft = std::mem::take(&mut token.session.draft);
        let prefix = self
            .prefix
            .clone()
            .or_else(|| self.reported_prefix.clone());
        token.calibration_data =
            Some(draft.into_calibration_data(prefix, self.suffix.clone(), self.code.clone()));
        info!("calibration session complete");
    }
}
