// Copyright (C) 2017 Hove and/or its affiliates.
//
// This program is free software: you can redistribute it and/or modify it
// under the terms of the GNU Affero General Public License as published by the
// Free Software Foundation, version 3.

// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more
// details.

// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>

//! Error taxonomy for the conversion pipeline.
//!
//! Plumbing errors (IO, XML shape, zip corruption) flow through
//! [`crate::Error`]/[`crate::Result`] (an alias of `anyhow`), exactly like the
//! rest of this crate. [`ConversionErrorKind`] classifies the handful of
//! failure modes the orchestrator and recovery layer need to branch on (see
//! spec §7); it is attached to an `anyhow::Error` with `.context(...)` rather
//! than replacing it, so a caller can still print the full causal chain.

use thiserror::Error;

/// Stable classification of a conversion failure, independent of the
/// free-form message carried alongside it.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionErrorKind {
    /// No codespace was supplied; fatal, abort before any IO (spec §6.3, §7).
    #[error("missing codespace")]
    MissingCodespace,
    /// The input bytes are neither a valid ZIP nor a parseable XML document.
    #[error("invalid zip archive")]
    InvalidZip,
    /// A `.xml` member failed to parse as XML.
    #[error("invalid xml document")]
    InvalidXml,
    /// No NeTEx entities of any kind were found in the input.
    #[error("no data found in input")]
    NoDataFound,
    /// A single entity failed a field-level validation rule.
    #[error("entity validation failed")]
    EntityValidation,
    /// A cross-reference (e.g. `scheduledStopPointRef`) could not be resolved.
    #[error("reference could not be resolved")]
    ReferenceUnresolved,
    /// A producer function could not build a GTFS record from its NeTEx input.
    #[error("producer failed to build a record")]
    ProducerFailure,
    /// Writing the GTFS CSV/ZIP output failed.
    #[error("serialization to GTFS failed")]
    SerializationFailure,
}

impl ConversionErrorKind {
    /// Whether this kind of error is, by its nature, one the recovery layer
    /// may attempt to paper over (as opposed to one that always aborts the
    /// whole conversion, per spec §7's propagation policy).
    pub fn is_fatal_by_default(self) -> bool {
        matches!(
            self,
            ConversionErrorKind::MissingCodespace
                | ConversionErrorKind::InvalidZip
                | ConversionErrorKind::SerializationFailure
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_kinds_match_spec_propagation_policy() {
        assert!(ConversionErrorKind::MissingCodespace.is_fatal_by_default());
        assert!(ConversionErrorKind::InvalidZip.is_fatal_by_default());
        assert!(ConversionErrorKind::SerializationFailure.is_fatal_by_default());
        assert!(!ConversionErrorKind::EntityValidation.is_fatal_by_default());
        assert!(!ConversionErrorKind::ReferenceUnresolved.is_fatal_by_default());
        assert!(!ConversionErrorKind::ProducerFailure.is_fatal_by_default());
        assert!(!ConversionErrorKind::NoDataFound.is_fatal_by_default());
    }

    #[test]
    fn messages_match_the_documented_taxonomy() {
        assert_eq!("missing codespace", ConversionErrorKind::MissingCodespace.to_string());
        assert_eq!("invalid zip archive", ConversionErrorKind::InvalidZip.to_string());
        assert_eq!("invalid xml document", ConversionErrorKind::InvalidXml.to_string());
        assert_eq!("no data found in input", ConversionErrorKind::NoDataFound.to_string());
    }
}
