use crate::code::{Alphabet, Code};
use crate::error::SolverError;

pub const DEFAULT_CODE_LENGTH: usize = 4;
pub const DEFAULT_OPENING: [&str; 4] = ["azul", "azul", "rojo", "verde"];

/// Largest universe `Solver::new` will enumerate.
pub const MAX_UNIVERSE_SIZE: usize = 1 << 22;

/// Size thresholds and sample sizes used by the guess strategist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrategyPolicy {
    /// At or below this many candidates the first one is played directly.
    pub near_terminal: usize,
    /// At or below this many candidates a random candidate is played.
    pub small: usize,
    /// At or below this many candidates the evaluation pool is drawn from the
    /// candidates, above it from the whole universe.
    pub pool_from_candidates: usize,
    /// Number of guesses evaluated per decision.
    pub pool_size: usize,
    /// Number of candidates each evaluated guess is scored against.
    pub witness_size: usize,
}

impl Default for StrategyPolicy {
    fn default() -> Self {
        Self {
            near_terminal: 2,
            small: 10,
            pool_from_candidates: 50,
            pool_size: 20,
            witness_size: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    alphabet: Alphabet,
    code_length: usize,
    opening: Code,
    policy: StrategyPolicy,
}

impl GameConfig {
    pub fn new(alphabet: Alphabet, code_length: usize) -> Result<Self, SolverError> {
        if code_length == 0 || code_length > usize::from(u8::MAX) {
            return Err(SolverError::InvalidConfig(format!(
                "code length must be within 1..={}, got {code_length}",
                u8::MAX
            )));
        }

        let universe_size = u32::try_from(code_length)
            .ok()
            .and_then(|exp| alphabet.len().checked_pow(exp))
            .filter(|&size| size <= MAX_UNIVERSE_SIZE)
            .ok_or_else(|| {
                SolverError::InvalidConfig(format!(
                    "{} colors over {code_length} positions exceeds {MAX_UNIVERSE_SIZE} codes",
                    alphabet.len()
                ))
            })?;
        log::debug!("Configured {universe_size} possible codes");

        let opening = classic_opening(&alphabet, code_length)
            .unwrap_or_else(|| default_opening(alphabet.len(), code_length));

        Ok(Self {
            alphabet,
            code_length,
            opening,
            policy: StrategyPolicy::default(),
        })
    }

    pub fn with_opening(mut self, opening: Code) -> Result<Self, SolverError> {
        self.check_code(&opening)?;
        self.opening = opening;
        Ok(self)
    }

    #[must_use]
    pub fn with_policy(mut self, policy: StrategyPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    #[must_use]
    pub fn code_length(&self) -> usize {
        self.code_length
    }

    #[must_use]
    pub fn opening(&self) -> &Code {
        &self.opening
    }

    #[must_use]
    pub fn policy(&self) -> &StrategyPolicy {
        &self.policy
    }

    /// Checks that a code has the configured length and only uses known
    /// colors.
    pub fn check_code(&self, code: &Code) -> Result<(), SolverError> {
        if code.len() != self.code_length {
            return Err(SolverError::WrongLength {
                expected: self.code_length,
                found: code.len(),
            });
        }
        if let Some(&color) = code
            .colors()
            .iter()
            .find(|&&c| usize::from(c) >= self.alphabet.len())
        {
            return Err(SolverError::UnknownColor {
                color: format!("#{color}"),
                valid: self.alphabet.names().join(", "),
            });
        }
        Ok(())
    }

    pub fn parse_code(&self, input: &str) -> Result<Code, SolverError> {
        self.alphabet.parse_code(input, self.code_length)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        let alphabet = Alphabet::default();
        let opening = classic_opening(&alphabet, DEFAULT_CODE_LENGTH)
            .unwrap_or_else(|| default_opening(alphabet.len(), DEFAULT_CODE_LENGTH));

        Self {
            alphabet,
            code_length: DEFAULT_CODE_LENGTH,
            opening,
            policy: StrategyPolicy::default(),
        }
    }
}

/// `DEFAULT_OPENING`, if the length is the default one and the alphabet has
/// all of its colors.
fn classic_opening(alphabet: &Alphabet, length: usize) -> Option<Code> {
    if length != DEFAULT_CODE_LENGTH {
        return None;
    }
    DEFAULT_OPENING
        .iter()
        .map(|name| alphabet.index_of(name))
        .collect()
}

/// Two pegs of the first color followed by the next colors in turn, the
/// shape of the classic `azul azul rojo ...` opening.
fn default_opening(colors: usize, length: usize) -> Code {
    (0..length)
        .map(|i| (i.saturating_sub(1) % colors) as u8)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.code_length(), 4);
        assert_eq!(config.alphabet().len(), 6);
        assert_eq!(
            config.alphabet().render(config.opening()),
            "(azul, azul, rojo, verde)"
        );
        assert!(config.check_code(config.opening()).is_ok());
    }

    #[test]
    fn test_default_policy_thresholds() {
        let policy = StrategyPolicy::default();
        assert_eq!(policy.near_terminal, 2);
        assert_eq!(policy.small, 10);
        assert_eq!(policy.pool_from_candidates, 50);
        assert_eq!(policy.pool_size, 20);
        assert_eq!(policy.witness_size, 50);
    }

    #[test]
    fn test_generated_opening() {
        let alphabet = Alphabet::new(["a", "b", "c"]).unwrap();
        let config = GameConfig::new(alphabet, 5).unwrap();
        assert_eq!(config.opening().colors(), &[0, 0, 1, 2, 0]);

        let single = Alphabet::new(["a"]).unwrap();
        let config = GameConfig::new(single, 3).unwrap();
        assert_eq!(config.opening().colors(), &[0, 0, 0]);
    }

    #[test]
    fn test_default_colors_keep_classic_opening() {
        let config = GameConfig::new(Alphabet::default(), DEFAULT_CODE_LENGTH).unwrap();
        assert_eq!(config.opening(), GameConfig::default().opening());

        // Same colors in another order still open by name
        let alphabet =
            Alphabet::new(["purpura", "verde", "negro", "blanco", "rojo", "azul"]).unwrap();
        let config = GameConfig::new(alphabet, DEFAULT_CODE_LENGTH).unwrap();
        assert_eq!(
            config.alphabet().render(config.opening()),
            "(azul, azul, rojo, verde)"
        );

        // Missing verde falls back to the generated opening
        let alphabet = Alphabet::new(["azul", "rojo", "blanco"]).unwrap();
        let config = GameConfig::new(alphabet, DEFAULT_CODE_LENGTH).unwrap();
        assert_eq!(config.opening().colors(), &[0, 0, 1, 2]);
    }

    #[test]
    fn test_rejects_bad_lengths() {
        assert!(GameConfig::new(Alphabet::default(), 0).is_err());
        assert!(GameConfig::new(Alphabet::default(), 300).is_err());
        // 6^10 is well past the enumeration limit
        assert!(GameConfig::new(Alphabet::default(), 10).is_err());
    }

    #[test]
    fn test_with_opening_checks_code() {
        let config = GameConfig::default();
        assert!(config.clone().with_opening(Code::new(vec![0, 1, 2])).is_err());
        assert!(config.clone().with_opening(Code::new(vec![0, 1, 2, 9])).is_err());
        let config = config.with_opening(Code::new(vec![1, 2, 3, 4])).unwrap();
        assert_eq!(config.opening().colors(), &[1, 2, 3, 4]);
    }
}
