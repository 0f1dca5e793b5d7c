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

//! `netex_gtfs_converter` resolves a bundle of
//! [NeTEx](http://netex-cen.eu/) transit-schedule documents into a
//! [GTFS](https://gtfs.org/reference/static) feed.
//!
//! The crate is a resolver and projection engine: [`netex`] streams a ZIP
//! (or a single XML document) of NeTEx files into an in-memory relational
//! store, [`producers`] (helped by [`shape_generator`] and
//! [`calendar_builder`]) walks that store and projects each entity into one
//! or more [`gtfs_model`] rows, and [`orchestrator`] drives the whole
//! pipeline end to end, returning a zipped GTFS archive alongside a
//! structured [`report::ConversionResult`].
//!
//! The single entry point external callers need is [`convert`].
//!
//! # Out of scope
//! Argument parsing, logging setup and packaging are left to callers (e.g.
//! a command-line front-end); this crate only exposes the conversion
//! itself.

#![deny(missing_docs)]

pub mod calendar_builder;
pub mod collection;
pub mod configuration;
pub mod error;
pub mod geometry;
pub mod gtfs_model;
pub mod netex;
pub mod orchestrator;
pub mod producers;
pub mod recovery;
pub mod report;
pub mod route_type;
pub mod shape_generator;

pub use configuration::Configuration;
pub use orchestrator::convert;
pub use report::ConversionResult;

/// The error type used by the crate.
pub type Error = anyhow::Error;

/// The corresponding result type used by the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
