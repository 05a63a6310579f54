use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub enum LayoutError {
    /// A direction token outside the closed Up/Down/Left/Right set.
    InvalidDirection {
        token: String,
        suggestion: Option<&'static str>,
    },
    /// A resultant was requested while some forces have no usable vector.
    /// `missing` holds their input indices.
    ResultantUnavailable { missing: Vec<usize> },
    /// No known positive magnitude; neutral scale values were used.
    DegenerateScale,
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDirection { token, suggestion } => {
                write!(f, "invalid direction {token:?}")?;
                if let Some(suggestion) = suggestion {
                    write!(f, " (did you mean {suggestion:?}?)")?;
                }
                Ok(())
            }
            Self::ResultantUnavailable { missing } => {
                let forces = missing
                    .iter()
                    .map(|index| format!("#{}", index + 1))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(
                    f,
                    "resultant vector cannot be calculated when any magnitudes are unknown (forces {forces})"
                )
            }
            Self::DegenerateScale => {
                write!(f, "no known force magnitude; drawing arrows at neutral scale")
            }
        }
    }
}

impl std::error::Error for LayoutError {}
