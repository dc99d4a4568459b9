//! Validation outcomes.
//!
//! Consistency checks in this crate report through [`Validation`] instead of
//! printing: the caller decides whether a warning is acceptable, and tests can
//! assert on the outcome directly.

use std::fmt;

/// Outcome of a single consistency check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    /// The check passed
    Ok,
    /// The check found something unexpected; generation may continue
    Warning(String),
    /// The check found a defect; generation must stop
    Fatal(String),
}

impl Validation {
    pub fn is_ok(&self) -> bool {
        matches!(self, Validation::Ok)
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, Validation::Warning(_))
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, Validation::Fatal(_))
    }

    /// Message carried by a warning or fatal outcome
    pub fn message(&self) -> Option<&str> {
        match self {
            Validation::Ok => None,
            Validation::Warning(msg) | Validation::Fatal(msg) => Some(msg),
        }
    }

    /// Promote warnings to fatal outcomes when `strict` is set
    ///
    /// # Examples
    /// ```
    /// use edgegrid::utils::validation::Validation;
    ///
    /// let warning = Validation::Warning("close enough".to_string());
    /// assert!(warning.clone().escalate(false).is_warning());
    /// assert!(warning.escalate(true).is_fatal());
    /// assert!(Validation::Ok.escalate(true).is_ok());
    /// ```
    pub fn escalate(self, strict: bool) -> Validation {
        match self {
            Validation::Warning(msg) if strict => Validation::Fatal(msg),
            other => other,
        }
    }

    /// Log the outcome at the matching level
    pub fn log(&self) {
        match self {
            Validation::Ok => {}
            Validation::Warning(msg) => log::warn!("{}", msg),
            Validation::Fatal(msg) => log::error!("{}", msg),
        }
    }
}

impl fmt::Display for Validation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Validation::Ok => write!(f, "ok"),
            Validation::Warning(msg) => write!(f, "warning: {}", msg),
            Validation::Fatal(msg) => write!(f, "fatal: {}", msg),
        }
    }
}

/// Combine several outcomes, keeping the most severe one
pub fn most_severe<I>(outcomes: I) -> Validation
where
    I: IntoIterator<Item = Validation>,
{
    let mut worst = Validation::Ok;
    for outcome in outcomes {
        match (&worst, &outcome) {
            (Validation::Fatal(_), _) => {}
            (_, Validation::Fatal(_)) => worst = outcome,
            (Validation::Ok, Validation::Warning(_)) => worst = outcome,
            _ => {}
        }
    }
    worst
}
