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
use crate::parsing::scanner::compile;
use anyhow::{bail, Error};
use log::debug;
use regex::Regex;
use std::fmt;

/// Transactions whose title line carries this tag are considered cleared.
pub const CLEARED_TAG: &str = "#clear";

/// Finds transactions that have not been tagged as cleared yet, so they can
/// be checked off against a statement.
pub struct PendingScanner {
	pattern: Regex,
}

/// A transaction still waiting to be cleared. The offset is the byte
/// position of the transaction in the ledger, which is how a host finds
/// it again to add the tag.
#[derive(Clone, Debug, PartialEq)]
pub struct UnclearedEntry {
	pub date: String,
	pub from: String,
	pub to: String,
	pub amount: f64,
	pub comment: String,
	pub offset: usize,
}

impl PendingScanner {
	pub fn new(pattern: &str) -> Result<Self, Error> {
		let pattern = compile("clear", pattern)?;
		// group 0 plus the four we need
		if pattern.captures_len() < 5 {
			bail!("clear pattern needs four capture groups (date, title, first leg, second leg)");
		}
		Ok(Self { pattern })
	}

	pub fn scan(&self, text: &str) -> Vec<UnclearedEntry> {
		let mut entries = vec![];

		for cap in self.pattern.captures_iter(text) {
			let (Some(whole), Some(date), Some(title), Some(first), Some(second)) =
				(cap.get(0), cap.get(1), cap.get(2), cap.get(3), cap.get(4))
			else {
				continue;
			};

			if title.as_str().contains(CLEARED_TAG) {
				continue;
			}

			let first_leg: Vec<&str> = first.as_str().split_whitespace().collect();
			let amount = match first_leg.len() {
				n if n >= 2 => first_leg[n - 2].parse::<f64>().ok(),
				_ => None,
			};
			let Some(amount) = amount else {
				debug!("skipping entry at {}: no amount on first leg", whole.start());
				continue;
			};

			let comment = title
				.as_str()
				.split('"')
				.map(str::trim)
				.find(|s| !s.is_empty())
				.map_or_else(|| "NULL".to_owned(), |s| s.to_uppercase());

			entries.push(UnclearedEntry {
				date: date.as_str().to_owned(),
				from: first_leg[0].to_owned(),
				to: second
					.as_str()
					.split_whitespace()
					.next()
					.unwrap_or_default()
					.to_owned(),
				amount: amount.abs(),
				comment,
				offset: whole.start(),
			});
		}

		entries
	}
}

impl fmt::Display for UnclearedEntry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{:>8}  {}  {:.2} with {}  {} ➟ {}",
			self.offset, self.date, self.amount, self.comment, self.from, self.to
		)
	}
}
