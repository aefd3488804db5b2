//! Stake value normalization
//!
//! Source corpora encode stakes heterogeneously: bare numbers (`"51"`,
//! `"37.5"`), lower bounds (`">50"`) and qualitative labels (`"contrôle"`).
//! Normalization is total: every input yields a percentage in [0, 100], and
//! anything that cannot be read is assumed to be a full stake.

/// Percentage assumed when a stake cannot be quantified
pub const DEFAULT_STAKE_PERCENT: f64 = 100.0;

/// Qualitative labels that denote a total or controlling interest
const FULL_STAKE_LABELS: [&str; 2] = ["contrôle", "participe"];

/// How a raw stake token was interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StakeKind {
    /// A plain number
    Exact,
    /// A `>N` lower bound, taken as exactly N
    AtLeast,
    /// A qualitative label mapped to a full stake
    Qualitative,
    /// Unreadable; the default full stake was assumed
    Defaulted,
}

/// A normalized stake
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StakeValue {
    /// Percentage in [0, 100]
    pub percent: f64,
    /// How the raw token was read
    pub kind: StakeKind,
    /// Whether the parsed number fell outside [0, 100] and was clamped
    pub clamped: bool,
}

impl StakeValue {
    fn new(percent: f64, kind: StakeKind) -> Self {
        Self {
            percent,
            kind,
            clamped: false,
        }
    }

    fn parsed(value: f64, kind: StakeKind) -> Self {
        if value.is_nan() {
            return Self::new(DEFAULT_STAKE_PERCENT, StakeKind::Defaulted);
        }
        let percent = value.clamp(0.0, 100.0);
        Self {
            percent,
            kind,
            clamped: percent != value,
        }
    }
}

/// Interpret a raw stake token
///
/// # Examples
///
/// ```
/// use ownergraph_domain::{classify_stake, StakeKind};
///
/// let stake = classify_stake(" >50 ");
/// assert_eq!(stake.percent, 50.0);
/// assert_eq!(stake.kind, StakeKind::AtLeast);
/// ```
pub fn classify_stake(raw: &str) -> StakeValue {
    let value = raw.trim().to_lowercase();

    if FULL_STAKE_LABELS.contains(&value.as_str()) {
        return StakeValue::new(DEFAULT_STAKE_PERCENT, StakeKind::Qualitative);
    }

    if let Some(bound) = value.strip_prefix('>') {
        return match bound.parse::<f64>() {
            Ok(v) => StakeValue::parsed(v, StakeKind::AtLeast),
            Err(_) => StakeValue::new(DEFAULT_STAKE_PERCENT, StakeKind::Defaulted),
        };
    }

    match value.parse::<f64>() {
        Ok(v) => StakeValue::parsed(v, StakeKind::Exact),
        Err(_) => StakeValue::new(DEFAULT_STAKE_PERCENT, StakeKind::Defaulted),
    }
}

/// Normalize a raw stake token into a percentage in [0, 100]
pub fn normalize_stake(raw: &str) -> f64 {
    classify_stake(raw).percent
}
