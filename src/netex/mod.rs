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

//! [NeTEx](http://netex-cen.eu/) ingestion: typed entities (component D's
//! object model), frame classification, XML helpers, the indexed
//! repository, and the streaming loader that fills it (component C).

pub mod frames;
pub mod objects;
pub mod read;
pub mod repository;
pub mod xml_utils;

pub use repository::Repository;
