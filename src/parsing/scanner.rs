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
use crate::config::config_file::Patterns;
use anyhow::{anyhow, Error};
use regex::Regex;

/// Pulls raw facts out of ledger text using the configured patterns. There
/// is no grammar here: whatever the patterns do not match is ignored, so
/// the ledger format is whatever the patterns say it is.
pub struct LedgerScanner {
	open: Regex,
	close: Regex,
	payee: Regex,
	from: Regex,
	to: Regex,
}

/// Every capture of every pattern, in the order they appear in the text.
/// Nothing is deduplicated; repetition is what the index counts.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScanResult {
	pub open: Vec<String>,
	pub close: Vec<String>,
	pub payee: Vec<String>,
	pub from: Vec<String>,
	pub to: Vec<String>,
}

impl LedgerScanner {
	pub fn new(patterns: &Patterns) -> Result<Self, Error> {
		Ok(Self {
			open: compile("open", &patterns.open)?,
			close: compile("close", &patterns.close)?,
			payee: compile("payee", &patterns.payee)?,
			from: compile("from", &patterns.from)?,
			to: compile("to", &patterns.to)?,
		})
	}

	pub fn scan(&self, text: &str) -> ScanResult {
		ScanResult {
			open: captures(&self.open, text),
			close: captures(&self.close, text),
			payee: captures(&self.payee, text),
			from: captures(&self.from, text),
			to: captures(&self.to, text),
		}
	}
}

pub fn compile(name: &str, pattern: &str) -> Result<Regex, Error> {
	Regex::new(pattern).map_err(|e| anyhow!("invalid {} pattern: {}", name, e))
}

/// First group of each match, or the whole match for group-less patterns.
fn captures(re: &Regex, text: &str) -> Vec<String> {
	let group = if re.captures_len() > 1 { 1 } else { 0 };
	re.captures_iter(text)
		.filter_map(|cap| cap.get(group).map(|m| m.as_str().to_string()))
		.collect()
}
