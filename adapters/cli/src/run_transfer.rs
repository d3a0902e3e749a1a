#![allow(clippy::missing_errors_doc)]

use std::{error::Error, fmt};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use ridgeline_core::GeneratorConfig;
use serde::{Deserialize, Serialize};

const RECIPE_DOMAIN: &str = "ridge";
const RECIPE_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded recipe payload.
pub(crate) const RECIPE_HEADER: &str = "ridge:v1";
/// Delimiter used to separate the prefix, seed and payload.
const FIELD_DELIMITER: char = ':';

/// Shareable description of a generation run: the seed plus every tunable.
///
/// Two hosts that decode the same recipe and drive the sequencer with the
/// same frame inputs replay the same level.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct RunRecipe {
    /// Seed the run's RNG streams are derived from.
    pub seed: u64,
    /// Generator tunables the run was configured with.
    pub generator: GeneratorConfig,
}

impl RunRecipe {
    /// Encodes the recipe into a single-line string suitable for sharing.
    #[must_use]
    pub(crate) fn encode(&self) -> String {
        let payload = SerializableRecipe {
            generator: self.generator.clone(),
        };
        let json = serde_json::to_vec(&payload).expect("recipe serialization never fails");
        let encoded = STANDARD_NO_PAD.encode(json);
        format!("{RECIPE_HEADER}:{:016x}:{encoded}", self.seed)
    }

    /// Decodes a recipe from the provided string representation.
    pub(crate) fn decode(value: &str) -> Result<Self, RunTransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(RunTransferError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(RunTransferError::MissingPrefix)?;
        let version = parts.next().ok_or(RunTransferError::MissingVersion)?;
        let seed = parts.next().ok_or(RunTransferError::MissingSeed)?;
        let payload = parts.next().ok_or(RunTransferError::MissingPayload)?;

        if domain != RECIPE_DOMAIN {
            return Err(RunTransferError::InvalidPrefix(domain.to_owned()));
        }
        if version != RECIPE_VERSION {
            return Err(RunTransferError::UnsupportedVersion(version.to_owned()));
        }

        let seed = u64::from_str_radix(seed, 16)
            .map_err(|_| RunTransferError::InvalidSeed(seed.to_owned()))?;
        let bytes = STANDARD_NO_PAD
            .decode(payload.as_bytes())
            .map_err(RunTransferError::InvalidEncoding)?;
        let decoded: SerializableRecipe =
            serde_json::from_slice(&bytes).map_err(RunTransferError::InvalidPayload)?;

        Ok(Self {
            seed,
            generator: decoded.generator,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct SerializableRecipe {
    generator: GeneratorConfig,
}

/// Errors that can occur while decoding run recipe strings.
#[derive(Debug)]
pub(crate) enum RunTransferError {
    /// The provided string was empty or contained only whitespace.
    EmptyPayload,
    /// The prefix segment was missing from the encoded recipe.
    MissingPrefix,
    /// The encoded recipe did not contain a version segment.
    MissingVersion,
    /// The encoded recipe did not include the seed segment.
    MissingSeed,
    /// The encoded recipe did not include the payload segment.
    MissingPayload,
    /// The encoded recipe used an unexpected prefix segment.
    InvalidPrefix(String),
    /// The encoded recipe used an unsupported version identifier.
    UnsupportedVersion(String),
    /// The seed could not be parsed from the encoded recipe.
    InvalidSeed(String),
    /// The base64 payload could not be decoded.
    InvalidEncoding(base64::DecodeError),
    /// The decoded payload could not be deserialised.
    InvalidPayload(serde_json::Error),
}

impl fmt::Display for RunTransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPayload => write!(f, "recipe string was empty"),
            Self::MissingPrefix => write!(f, "recipe string is missing the prefix"),
            Self::MissingVersion => write!(f, "recipe string is missing the version"),
            Self::MissingSeed => write!(f, "recipe string is missing the seed"),
            Self::MissingPayload => write!(f, "recipe string is missing the payload"),
            Self::InvalidPrefix(prefix) => write!(f, "recipe prefix '{prefix}' is not supported"),
            Self::UnsupportedVersion(version) => {
                write!(f, "recipe version '{version}' is not supported")
            }
            Self::InvalidSeed(seed) => write!(f, "could not parse recipe seed '{seed}'"),
            Self::InvalidEncoding(error) => {
                write!(f, "could not decode recipe payload: {error}")
            }
            Self::InvalidPayload(error) => {
                write!(f, "could not parse recipe payload: {error}")
            }
        }
    }
}

impl Error for RunTransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEncoding(error) => Some(error),
            Self::InvalidPayload(error) => Some(error),
            _ => None,
        }
    }
}
