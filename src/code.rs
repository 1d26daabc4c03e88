use crate::error::SolverError;
use std::fmt;

/// Upper bound on the alphabet size. Colors are stored as `u8` indices and
/// scoring keeps a fixed-size tally per color.
pub const MAX_COLORS: usize = 64;

pub const DEFAULT_COLORS: [&str; 6] = ["azul", "rojo", "blanco", "negro", "verde", "purpura"];

/// Named colors a code may be built from. Names are stored lowercase and
/// matched case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    names: Vec<String>,
}

impl Alphabet {
    pub fn new<I, S>(names: I) -> Result<Self, SolverError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut collected: Vec<String> = Vec::new();
        for name in names {
            let name = name.as_ref().trim().to_lowercase();
            if name.is_empty() {
                return Err(SolverError::InvalidConfig(
                    "color names may not be empty".to_string(),
                ));
            }
            if name.contains(',') || name.contains(char::is_whitespace) {
                return Err(SolverError::InvalidConfig(format!(
                    "color name \"{name}\" may not contain commas or whitespace"
                )));
            }
            if collected.contains(&name) {
                return Err(SolverError::InvalidConfig(format!(
                    "duplicate color \"{name}\""
                )));
            }
            collected.push(name);
        }

        if collected.is_empty() {
            return Err(SolverError::InvalidConfig(
                "the alphabet needs at least one color".to_string(),
            ));
        }
        if collected.len() > MAX_COLORS {
            return Err(SolverError::InvalidConfig(format!(
                "at most {MAX_COLORS} colors are supported, got {}",
                collected.len()
            )));
        }

        Ok(Self { names: collected })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn name(&self, color: u8) -> &str {
        &self.names[usize::from(color)]
    }

    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<u8> {
        let name = name.trim().to_lowercase();
        self.names
            .iter()
            .position(|n| *n == name)
            .and_then(|i| u8::try_from(i).ok())
    }

    /// Parses a code written as color names separated by commas or whitespace,
    /// e.g. `azul rojo verde negro` or `Azul, rojo, verde, negro`.
    pub fn parse_code(&self, input: &str, length: usize) -> Result<Code, SolverError> {
        let tokens: Vec<&str> = if input.contains(',') {
            input.split(',').map(str::trim).collect()
        } else {
            input.split_whitespace().collect()
        };

        if tokens.len() != length {
            return Err(SolverError::WrongLength {
                expected: length,
                found: tokens.len(),
            });
        }

        tokens
            .into_iter()
            .map(|token| {
                self.index_of(token).ok_or_else(|| SolverError::UnknownColor {
                    color: token.to_lowercase(),
                    valid: self.names.join(", "),
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Code::new)
    }

    /// Renders a code as `(azul, rojo, verde, negro)`.
    #[must_use]
    pub fn render(&self, code: &Code) -> String {
        let names: Vec<&str> = code.colors().iter().map(|&c| self.name(c)).collect();
        format!("({})", names.join(", "))
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self {
            names: DEFAULT_COLORS.iter().map(|c| (*c).to_string()).collect(),
        }
    }
}

/// An ordered, immutable sequence of color indices. Used both as secret and
/// as guess.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Code(Box<[u8]>);

impl Code {
    #[must_use]
    pub fn new(colors: Vec<u8>) -> Self {
        Self(colors.into_boxed_slice())
    }

    #[must_use]
    pub fn colors(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for Code {
    fn from(colors: Vec<u8>) -> Self {
        Self::new(colors)
    }
}

impl FromIterator<u8> for Code {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Response to a guess: pegs in the right position, and further pegs of the
/// right color in the wrong position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Feedback {
    exact: u8,
    color_only: u8,
}

impl Feedback {
    pub fn new(exact: usize, color_only: usize, code_length: usize) -> Result<Self, SolverError> {
        let exact = i64::try_from(exact).unwrap_or(i64::MAX);
        let color_only = i64::try_from(color_only).unwrap_or(i64::MAX);
        Self::from_raw(exact, color_only, code_length)
    }

    /// Validates counts as typed by a user. Nothing is clamped: anything
    /// negative, above the code length, or summing past it is rejected.
    pub fn from_raw(exact: i64, color_only: i64, code_length: usize) -> Result<Self, SolverError> {
        let invalid = || SolverError::InvalidFeedback {
            exact,
            color_only,
            code_length,
        };
        let length = i64::try_from(code_length).map_err(|_| invalid())?;

        if exact < 0 || color_only < 0 || exact > length || color_only > length {
            return Err(invalid());
        }
        if exact + color_only > length {
            return Err(invalid());
        }

        Ok(Self {
            exact: u8::try_from(exact).map_err(|_| invalid())?,
            color_only: u8::try_from(color_only).map_err(|_| invalid())?,
        })
    }

    /// Scoring output; counts are bounded by construction.
    pub(crate) fn scored(exact: u8, color_only: u8) -> Self {
        Self { exact, color_only }
    }

    #[must_use]
    pub fn exact(&self) -> usize {
        usize::from(self.exact)
    }

    #[must_use]
    pub fn color_only(&self) -> usize {
        usize::from(self.color_only)
    }

    #[must_use]
    pub fn fits(&self, code_length: usize) -> bool {
        self.exact() + self.color_only() <= code_length
    }

    #[must_use]
    pub fn is_solved(&self, code_length: usize) -> bool {
        self.exact() == code_length
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} exact, {} color-only", self.exact, self.color_only)
    }
}
