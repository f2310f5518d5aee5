//! Word valences for the sentiment scorer.
//!
//! Valences run from -4 (extremely negative) to +4 (extremely positive).
//! General-purpose polarity words are mixed with market slang so that
//! retail trading chatter scores sensibly.

pub(crate) const WORDS: &[(&str, f64)] = &[
    // general positive
    ("good", 1.9),
    ("great", 3.1),
    ("amazing", 2.8),
    ("awesome", 3.1),
    ("excellent", 2.7),
    ("fantastic", 2.6),
    ("incredible", 2.6),
    ("love", 3.2),
    ("like", 1.5),
    ("best", 3.2),
    ("better", 1.9),
    ("nice", 1.8),
    ("happy", 2.7),
    ("win", 2.8),
    ("winner", 2.8),
    ("winning", 2.4),
    ("success", 2.7),
    ("successful", 2.8),
    ("strong", 2.3),
    ("stronger", 2.1),
    ("solid", 1.7),
    ("positive", 2.3),
    ("optimistic", 2.1),
    ("confident", 2.2),
    ("impressive", 2.5),
    ("outstanding", 3.0),
    ("record", 1.2),
    ("beat", 1.6),
    ("beats", 1.6),
    ("upgrade", 1.8),
    ("upgraded", 1.8),
    ("approval", 2.0),
    ("approved", 2.0),
    ("profit", 1.9),
    ("profitable", 2.1),
    ("profits", 1.9),
    ("gain", 2.0),
    ("gains", 2.0),
    ("growth", 1.8),
    ("growing", 1.4),
    ("opportunity", 1.6),
    ("safe", 1.9),
    ("undervalued", 1.5),
    ("recovery", 1.6),
    ("recover", 1.4),
    ("exciting", 2.2),
    ("excited", 2.2),
    ("hope", 1.9),
    ("thrilled", 2.9),
    // market slang positive
    ("bullish", 2.2),
    ("bull", 1.5),
    ("moon", 2.0),
    ("mooning", 2.4),
    ("rally", 1.9),
    ("rallies", 1.9),
    ("rallying", 1.9),
    ("surge", 2.0),
    ("surges", 2.0),
    ("surging", 2.1),
    ("soar", 2.2),
    ("soars", 2.2),
    ("soaring", 2.3),
    ("breakout", 1.9),
    ("rip", 1.2),
    ("ripping", 1.8),
    ("squeeze", 1.3),
    ("tendies", 1.9),
    ("calls", 0.6),
    ("buy", 1.1),
    ("buying", 1.0),
    ("long", 0.6),
    ("outperform", 1.9),
    ("uptrend", 1.7),
    ("higher", 1.0),
    ("pump", 1.0),
    // general negative
    ("bad", -2.5),
    ("worse", -2.1),
    ("worst", -3.1),
    ("terrible", -2.5),
    ("awful", -2.0),
    ("horrible", -2.5),
    ("hate", -2.7),
    ("poor", -2.1),
    ("weak", -1.9),
    ("weaker", -1.9),
    ("fail", -2.5),
    ("failed", -2.3),
    ("failure", -2.3),
    ("loss", -1.3),
    ("losses", -1.7),
    ("lose", -1.7),
    ("losing", -1.6),
    ("lost", -1.3),
    ("risk", -1.1),
    ("risky", -1.4),
    ("fear", -2.2),
    ("scared", -1.9),
    ("worried", -1.2),
    ("concern", -1.2),
    ("concerns", -1.2),
    ("negative", -2.7),
    ("disappointing", -2.2),
    ("disappointed", -1.9),
    ("miss", -1.2),
    ("missed", -1.2),
    ("misses", -1.2),
    ("downgrade", -1.8),
    ("downgraded", -1.8),
    ("lawsuit", -1.8),
    ("fraud", -3.0),
    ("scam", -2.6),
    ("bankrupt", -2.6),
    ("bankruptcy", -2.6),
    ("debt", -1.2),
    ("dilution", -1.5),
    ("overvalued", -1.5),
    ("warning", -1.4),
    ("recession", -2.0),
    ("rejected", -2.0),
    ("delay", -1.3),
    ("delayed", -1.3),
    ("sad", -2.1),
    ("angry", -2.3),
    ("ugly", -2.3),
    ("pain", -2.3),
    ("panic", -2.3),
    // market slang negative
    ("bearish", -2.2),
    ("bear", -1.4),
    ("crash", -2.6),
    ("crashed", -2.6),
    ("crashing", -2.6),
    ("plunge", -2.2),
    ("plunges", -2.2),
    ("plunging", -2.3),
    ("tank", -1.9),
    ("tanked", -2.1),
    ("tanking", -2.1),
    ("dump", -1.6),
    ("dumping", -1.7),
    ("selloff", -1.9),
    ("sell", -1.0),
    ("selling", -1.0),
    ("short", -0.6),
    ("puts", -0.6),
    ("bagholder", -1.8),
    ("bagholding", -1.8),
    ("rekt", -2.4),
    ("drop", -1.1),
    ("drops", -1.1),
    ("dropped", -1.1),
    ("downtrend", -1.7),
    ("lower", -0.9),
    ("underperform", -1.9),
    ("bubble", -1.3),
    ("volatile", -0.9),
];

pub(crate) const EMOJI: &[(char, f64)] = &[
    ('🚀', 2.5),
    ('📈', 1.8),
    ('🔥', 1.5),
    ('💎', 1.0),
    ('🙌', 1.5),
    ('💰', 1.6),
    ('😀', 2.0),
    ('😃', 2.0),
    ('😍', 2.7),
    ('👍', 1.8),
    ('📉', -1.8),
    ('💀', -1.5),
    ('😭', -1.6),
    ('😡', -2.3),
    ('🤡', -1.2),
    ('👎', -1.8),
    ('🩸', -1.5),
];

pub(crate) const NEGATIONS: &[&str] = &[
    "not", "no", "never", "none", "nobody", "nothing", "neither", "nor", "nowhere", "cannot",
    "without", "isnt", "arent", "wasnt", "dont", "doesnt", "didnt", "wont", "cant", "aint",
];

/// Intensifiers (+) and dampeners (-), applied in the direction of the
/// word they modify.
pub(crate) const BOOSTERS: &[(&str, f64)] = &[
    ("absolutely", 0.293),
    ("completely", 0.293),
    ("enormously", 0.293),
    ("especially", 0.293),
    ("extremely", 0.293),
    ("highly", 0.293),
    ("hugely", 0.293),
    ("incredibly", 0.293),
    ("insanely", 0.293),
    ("massively", 0.293),
    ("really", 0.293),
    ("so", 0.293),
    ("super", 0.293),
    ("totally", 0.293),
    ("tremendously", 0.293),
    ("truly", 0.293),
    ("very", 0.293),
    ("wildly", 0.293),
    ("barely", -0.293),
    ("hardly", -0.293),
    ("kinda", -0.293),
    ("marginally", -0.293),
    ("slightly", -0.293),
    ("somewhat", -0.293),
    ("sorta", -0.293),
];
