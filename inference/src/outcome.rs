/// How a value was obtained from model output.
///
/// `Degraded` means the model did not follow the requested format and the
/// value was reconstructed by a fallback parser. Hard failures are the `Err`
/// side of the surrounding `Result`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Parsed(T),
    Degraded(T)
}

impl<T> Outcome<T> {
    pub fn into_inner(self) -> T {
        match self {
            Self::Parsed(value) | Self::Degraded(value) => value
        }
    }

    pub fn value(&self) -> &T {
        match self {
            Self::Parsed(value) | Self::Degraded(value) => value
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded(_))
    }

    /// Metrics label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Parsed(_) => "parsed",
            Self::Degraded(_) => "degraded"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_accessors() {
        let parsed = Outcome::Parsed(vec!["a"]);
        assert!(!parsed.is_degraded());
        assert_eq!(parsed.label(), "parsed");
        assert_eq!(parsed.value().len(), 1);

        let degraded = Outcome::Degraded(3);
        assert!(degraded.is_degraded());
        assert_eq!(degraded.label(), "degraded");
        assert_eq!(degraded.into_inner(), 3);
    }
}
