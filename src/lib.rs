/* Copyright © 2024-2025 Adam Train <adam@trainrelay.net>
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 */
//! Resolves partly typed account and payee names into the ones a ledger
//! actually uses, ranked by how well they match and how often they are used.
//!
//! A resolution goes: scan the ledger text ([parsing::scanner]), count what
//! the scan found into an immutable [index::frequency_index::FrequencyIndex]
//! (kept around by an [index::cache::IndexCache]), then rank the relevant
//! table against what the user typed ([ranking::ranker]). The
//! [resolve::resolver] module ties the steps to the tokens of a new entry.

pub mod config;
pub mod index;
pub mod parsing;
pub mod ranking;
pub mod resolve;
pub mod util;
