use thiserror::Error;

/// Reasons a configuration cannot be analysed.
///
/// Every variant is fatal for the circuit/regime combination that produced it. The variants carry
/// the concrete values of the inequality that failed so the report can point at the offending
/// parameter.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SoundnessError {
    #[error(
        "FRI folding-factor/early-stop mismatch: after {rounds} rounds the domain has size \
         {domain_size}, but FRI_early_stop_degree is {early_stop_degree}"
    )]
    FriEarlyStopMismatch {
        rounds: usize,
        domain_size: usize,
        early_stop_degree: usize,
    },

    #[error("FRI folding factor {factor} in round {round} must be >= 2 and divide the folded domain")]
    InvalidFoldingFactor { round: usize, factor: usize },

    #[error("{component}: invalid parameter `{name}` = {value} ({reason})")]
    InvalidParameter {
        component: &'static str,
        name: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error(
        "JBR proximity parameter infeasible: theta = {theta} must be < 1 - sqrt(rho_plus) = \
         {bound} (rho_plus = {rho_plus})"
    )]
    JohnsonBoundInfeasible {
        theta: f64,
        bound: f64,
        rho_plus: f64,
    },

    #[error(
        "JBR proximity parameter infeasible: theta = {theta} must be <= 1 - sqrt(rho_plus) * (1 + \
         1/(2 m_plus)) = {bound} (m_plus = {m_plus}, rho_plus = {rho_plus})"
    )]
    JohnsonMultiplicityInfeasible {
        theta: f64,
        bound: f64,
        m_plus: usize,
        rho_plus: f64,
    },

    #[error(
        "CBR proximity parameter infeasible: theta = {theta} must be < 1 - rho_plus = {bound} \
         (rho_plus = {rho_plus})"
    )]
    CapacityBoundInfeasible {
        theta: f64,
        bound: f64,
        rho_plus: f64,
    },

    #[error(
        "DEEP-ALI slack violated under {regime}: trace_length + max_combo = {lhs} must be < \
         (1 - theta) * D = {rhs}"
    )]
    DeepAliSlackViolated { regime: String, lhs: f64, rhs: f64 },

    #[error(
        "circuit `{circuit}`: multilinear zerocheck is only defined under unique decoding (set \
         udr_only)"
    )]
    ZerocheckRequiresUniqueDecoding { circuit: String },

    #[error("LogUp/GKR: alphabet size must be positive, got {0}")]
    NonPositiveAlphabetSize(usize),

    #[error("LogUp/GKR: number of lookups must be positive, got {0}")]
    NonPositiveLookupCount(usize),

    #[error("error probability {0} is outside (0, 1]; the error model upstream is broken")]
    InvalidErrorProbability(f64),

    #[error("security table already contains an entry labelled `{0}`")]
    DuplicateLabel(String),

    #[error("unknown field `{0}` (expected e.g. `BabyBear^4`, `Goldilocks^3`)")]
    UnknownField(String),

    #[error("{0} soundness formulas are not finished; no security levels are reported")]
    UnfinishedModel(&'static str),
}

pub type Result<T> = std::result::Result<T, SoundnessError>;

impl SoundnessError {
    pub(crate) fn invalid(
        component: &'static str,
        name: &'static str,
        value: impl ToString,
        reason: &'static str,
    ) -> Self {
        Self::InvalidParameter {
            component,
            name,
            value: value.to_string(),
            reason,
        }
    }
}
