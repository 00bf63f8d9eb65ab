/// Separator between probe slots in every calibration payload. The space
/// position is invariant across the supported layouts, which is what makes
/// slot alignment well-defined.
pub const PROBE_DELIMITER: char = ' ';

/// Reported by the capture layer when a key produces no immediate output
/// (dead keys, swallowed keys, suppressed AIM flags).
pub const ASCII_NUL: char = '\u{0}';

/// GS1 element separator (GS).
pub const GROUP_SEPARATOR: char = '\u{1d}';

/// Record separator (RS), used by ISO/IEC 15434 envelopes.
pub const RECORD_SEPARATOR: char = '\u{1e}';

/// End-of-transmission (EOT), closes ISO/IEC 15434 envelopes.
pub const END_OF_TRANSMISSION: char = '\u{4}';

/// Line feed, commonly appended by scanners as a terminator.
pub const LINE_FEED: char = '\n';

/// Control-character placeholders probed by the baseline round, in slot order.
pub const CONTROL_PLACEHOLDERS: [char; 4] = [
    GROUP_SEPARATOR,
    RECORD_SEPARATOR,
    END_OF_TRANSMISSION,
    LINE_FEED,
];

/// Conventional AIM symbology-identifier flag character.
pub const AIM_FLAG: char = ']';

/// AIM code for Data Matrix ECC200, the symbology carrying the probes.
pub const AIM_SYMBOLOGY_CODE: &str = "d2";

/// Smallest payload fragment worth emitting as its own symbol. Sizes whose
/// capacity falls below this cannot carry a calibration fragment.
pub const MIN_FRAGMENT_CAPACITY: usize = 8;

/// Received responses whose repertoire overlap falls below this ratio are
/// classified as unrecognised rather than partial.
pub const UNRECOGNISED_OVERLAP_THRESHOLD: f32 = 0.25;

/// Dropped-slot ratio above which the scanner is classified as low
/// performance.
pub const LOW_PERFORMANCE_DROP_RATIO: f32 = 0.10;

/// The printable 7-bit repertoire probed by the baseline round. The space
/// character is excluded: it is the probe delimiter.
pub fn printable_repertoire() -> impl Iterator<Item = char> {
    '!'..='~'
}

/// Base characters paired with each dead key during a dead-key round.
pub fn dead_key_bases() -> impl Iterator<Item = char> {
    ('a'..='z').chain('A'..='Z').chain('0'..='9')
}

/// Precomposed Latin accent pairs: (dead-key character, base character,
/// composed character). Closed table; pairs outside it do not compose.
const COMPOSITION_TABLE: &[(char, char, char)] = &[
    // circumflex
    ('^', 'a', '\u{e2}'),
    ('^', 'e', '\u{ea}'),
    ('^', 'i', '\u{ee}'),
    ('^', 'o', '\u{f4}'),
    ('^', 'u', '\u{fb}'),
    ('^', 'A', '\u{c2}'),
    ('^', 'E', '\u{ca}'),
    ('^', 'I', '\u{ce}'),
    ('^', 'O', '\u{d4}'),
    ('^', 'U', '\u{db}'),
    // diaeresis
    ('"', 'a', '\u{e4}'),
    ('"', 'e', '\u{eb}'),
    ('"', 'i', '\u{ef}'),
    ('"', 'o', '\u{f6}'),
    ('"', 'u', '\u{fc}'),
    ('"', 'y', '\u{ff}'),
    ('"', 'A', '\u{c4}'),
    ('"', 'E', '\u{cb}'),
    ('"', 'I', '\u{cf}'),
    ('"', 'O', '\u{d6}'),
    ('"', 'U', '\u{dc}'),
    ('"', 'Y', '\u{178}'),
    // grave
    ('`', 'a', '\u{e0}'),
    ('`', 'e', '\u{e8}'),
    ('`', 'i', '\u{ec}'),
    ('`', 'o', '\u{f2}'),
    ('`', 'u', '\u{f9}'),
    ('`', 'A', '\u{c0}'),
    ('`', 'E', '\u{c8}'),
    ('`', 'I', '\u{cc}'),
    ('`', 'O', '\u{d2}'),
    ('`', 'U', '\u{d9}'),
    // acute
    ('\'', 'a', '\u{e1}'),
    ('\'', 'e', '\u{e9}'),
    ('\'', 'i', '\u{ed}'),
    ('\'', 'o', '\u{f3}'),
    ('\'', 'u', '\u{fa}'),
    ('\'', 'y', '\u{fd}'),
    ('\'', 'A', '\u{c1}'),
    ('\'', 'E', '\u{c9}'),
    ('\'', 'I', '\u{cd}'),
    ('\'', 'O', '\u{d3}'),
    ('\'', 'U', '\u{da}'),
    ('\'', 'Y', '\u{dd}'),
    // tilde
    ('~', 'a', '\u{e3}'),
    ('~', 'n', '\u{f1}'),
    ('~', 'o', '\u{f5}'),
    ('~', 'A', '\u{c3}'),
    ('~', 'N', '\u{d1}'),
    ('~', 'O', '\u{d5}'),
];

/// Looks up the precomposed character for a dead-key / base pair.
pub fn compose(dead: char, base: char) -> Option<char> {
    COMPOSITION_TABLE
        .iter()
        .find(|(d, b, _)| *d == dead && *b == base)
        .map(|(_, _, c)| *c)
}
