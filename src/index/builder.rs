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
use crate::index::frequency_index::FrequencyIndex;
use crate::parsing::scanner::ScanResult;
use crate::util::transliterate::transliterate;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Turns the raw captures of a scan into a FrequencyIndex. Building is a
/// pure function of the scan; the same captures always give the same index.
pub struct IndexBuilder {
	min_payee_count: u64,
}

impl IndexBuilder {
	pub fn new(min_payee_count: u64) -> Self {
		Self { min_payee_count }
	}

	pub fn build(&self, scan: &ScanResult) -> FrequencyIndex {
		let closed: HashSet<&str> = scan.close.iter().map(String::as_str).collect();
		let from_counts = tally(&scan.from);
		let to_counts = tally(&scan.to);

		// Every live account gets an entry, used or not
		let mut from = BTreeMap::new();
		let mut to = BTreeMap::new();
		for account in scan.open.iter().filter(|a| !closed.contains(a.as_str())) {
			let name = account.as_str();
			from.insert(account.clone(), from_counts.get(name).copied().unwrap_or(0));
			to.insert(account.clone(), to_counts.get(name).copied().unwrap_or(0));
		}

		// Payees that share a key share a count. The first spelling seen
		// in the ledger is the one shown for the key.
		let mut payee = BTreeMap::new();
		let mut mapping = BTreeMap::new();
		for original in &scan.payee {
			let key = transliterate(original);
			if key.is_empty() {
				continue;
			}
			*payee.entry(key.clone()).or_insert(0) += 1;
			mapping.entry(key).or_insert_with(|| original.clone());
		}
		payee.retain(|_, count| *count >= self.min_payee_count);

		FrequencyIndex::new(from, to, payee, mapping)
	}
}

fn tally(captures: &[String]) -> HashMap<&str, u64> {
	let mut counts = HashMap::new();
	for capture in captures {
		*counts.entry(capture.as_str()).or_insert(0) += 1;
	}
	counts
}

#[cfg(test)]
mod tests {
	use super::*;

	fn strings(items: &[&str]) -> Vec<String> {
		items.iter().map(|s| s.to_string()).collect()
	}

	#[test]
	fn test_debit_legs_are_counted() {
		let scan = ScanResult {
			open: strings(&["Assets:Bank:Checking", "Expenses:Food"]),
			from: strings(&[
				"Assets:Bank:Checking",
				"Assets:Bank:Checking",
				"Assets:Bank:Checking",
			]),
			to: strings(&["Expenses:Food", "Expenses:Food", "Expenses:Food"]),
			..Default::default()
		};
		let index = IndexBuilder::new(1).build(&scan);
		assert_eq!(index.from_table()["Assets:Bank:Checking"], 3);
		assert_eq!(index.to_table()["Assets:Bank:Checking"], 0);
		assert_eq!(index.to_table()["Expenses:Food"], 3);
	}

	#[test]
	fn test_closed_accounts_are_dropped() {
		let scan = ScanResult {
			open: strings(&["Assets:Old:Account", "Assets:Cash"]),
			close: strings(&["Assets:Old:Account"]),
			from: strings(&["Assets:Old:Account", "Assets:Cash"]),
			to: strings(&["Assets:Old:Account"]),
			..Default::default()
		};
		let index = IndexBuilder::new(1).build(&scan);
		assert!(!index.from_table().contains_key("Assets:Old:Account"));
		assert!(!index.to_table().contains_key("Assets:Old:Account"));
		assert_eq!(index.from_table().len(), 1);
	}

	#[test]
	fn test_unused_and_unopened_accounts() {
		let scan = ScanResult {
			open: strings(&["Assets:New"]),
			from: strings(&["Assets:Never:Opened"]),
			..Default::default()
		};
		let index = IndexBuilder::new(1).build(&scan);
		assert_eq!(index.from_table()["Assets:New"], 0);
		assert_eq!(index.to_table()["Assets:New"], 0);
		assert!(!index.from_table().contains_key("Assets:Never:Opened"));
	}

	#[test]
	fn test_live_frequency_conserves_leg_mentions() {
		let legs = ["A:X", "A:Y", "A:X", "A:Z", "A:X", "A:Y"];
		let scan = ScanResult {
			open: strings(&["A:X", "A:Y", "A:Z", "A:W"]),
			close: strings(&["A:W"]),
			from: strings(&legs[..3]),
			to: strings(&legs[3..]),
			..Default::default()
		};
		let index = IndexBuilder::new(1).build(&scan);
		for account in index.accounts() {
			let mentions = legs.iter().filter(|l| **l == account.name).count();
			assert_eq!(account.frequency(), mentions as u64, "{}", account.name);
		}
	}

	#[test]
	fn test_payee_spellings_share_a_key() {
		let scan = ScanResult {
			payee: strings(&["Blue Bottle", "Starbucks", "blue-bottle", "BLUE BOTTLE"]),
			..Default::default()
		};
		let index = IndexBuilder::new(1).build(&scan);
		assert_eq!(index.payee_table()["bluebottle"], 3);
		assert_eq!(index.payee_table()["starbucks"], 1);
		// first spelling wins
		assert_eq!(index.original_payee("bluebottle"), Some("Blue Bottle"));
	}

	#[test]
	fn test_scripts_stay_separate() {
		let scan = ScanResult {
			payee: strings(&["星巴克", "Starbucks", "星巴克"]),
			..Default::default()
		};
		let index = IndexBuilder::new(1).build(&scan);
		assert_eq!(index.payee_table().len(), 2);
		assert_eq!(index.payee_table()["xingbake"], 2);
		assert_eq!(index.original_payee("xingbake"), Some("星巴克"));
	}

	#[test]
	fn test_rare_payees_can_be_filtered() {
		let scan = ScanResult {
			payee: strings(&["Regular", "Once", "Regular", "...", ""]),
			..Default::default()
		};
		let index = IndexBuilder::new(2).build(&scan);
		assert_eq!(index.payee_table().len(), 1);
		assert_eq!(index.payee_table()["regular"], 2);
		assert_eq!(index.original_payee("once"), Some("Once"));
		assert!(!index.payee_table().contains_key(""));
	}

	#[test]
	fn test_build_is_repeatable() {
		let scan = ScanResult {
			open: strings(&["A:B", "A:C"]),
			from: strings(&["A:B"]),
			payee: strings(&["Café", "cafe", "星巴克"]),
			..Default::default()
		};
		let builder = IndexBuilder::new(1);
		assert_eq!(builder.build(&scan), builder.build(&scan));
		assert_eq!(builder.build(&scan).original_payee("cafe"), Some("Café"));
	}
}
