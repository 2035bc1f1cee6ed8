use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("Sequence for domain '{domain}' is empty")]
    EmptySequence { domain: String },

    #[error("Invalid residue code '{symbol}' at position {position} in domain '{domain}'")]
    InvalidResidue {
        domain: String,
        position: usize,
        symbol: char,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceDomain {
    id: String,       // Domain identifier, e.g. the a3m file stem
    sequence: String, // One-letter residue codes, upper-cased
}

impl SequenceDomain {
    pub fn new(id: impl Into<String>, sequence: &str) -> Result<Self, DomainError> {
        let id = id.into();
        let sequence = sequence.trim();
        if sequence.is_empty() {
            return Err(DomainError::EmptySequence { domain: id });
        }
        if let Some((position, symbol)) = sequence
            .chars()
            .enumerate()
            .find(|(_, c)| !c.is_ascii_alphabetic())
        {
            return Err(DomainError::InvalidResidue {
                domain: id,
                position,
                symbol,
            });
        }

        Ok(Self {
            id,
            sequence: sequence.to_ascii_uppercase(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    /// Number of residues, the `L` every accumulation buffer is sized by.
    #[inline]
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}
