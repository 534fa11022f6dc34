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
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// How often each live account and each payee has been used, as of one scan
/// of the ledger. Once built it is never changed; a rescan produces a new
/// one. The serialized form is the cache file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FrequencyIndex {
	/// live account -> times it was the source leg
	from: BTreeMap<String, u64>,
	/// live account -> times it was the destination leg
	to: BTreeMap<String, u64>,
	/// transliterated payee key -> times seen
	payee: BTreeMap<String, u64>,
	/// transliterated payee key -> payee as written in the ledger
	mapping: BTreeMap<String, String>,
}

/// A live account and its usage.
#[derive(Clone, Debug, PartialEq)]
pub struct Account {
	pub name: String,
	pub from_count: u64,
	pub to_count: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Payee {
	pub key: String,
	pub original: String,
	pub count: u64,
}

impl FrequencyIndex {
	pub(crate) fn new(
		from: BTreeMap<String, u64>,
		to: BTreeMap<String, u64>,
		payee: BTreeMap<String, u64>,
		mapping: BTreeMap<String, String>,
	) -> Self {
		Self {
			from,
			to,
			payee,
			mapping,
		}
	}

	pub fn from_table(&self) -> &BTreeMap<String, u64> {
		&self.from
	}

	pub fn to_table(&self) -> &BTreeMap<String, u64> {
		&self.to
	}

	pub fn payee_table(&self) -> &BTreeMap<String, u64> {
		&self.payee
	}

	/// The payee text a key stands for, if the key came from the ledger.
	pub fn original_payee(&self, key: &str) -> Option<&str> {
		self.mapping.get(key).map(String::as_str)
	}

	pub fn accounts(&self) -> Vec<Account> {
		self.from
			.keys()
			.chain(self.to.keys())
			.collect::<BTreeSet<_>>()
			.into_iter()
			.map(|name| Account {
				name: name.clone(),
				from_count: self.from.get(name).copied().unwrap_or(0),
				to_count: self.to.get(name).copied().unwrap_or(0),
			})
			.collect()
	}

	pub fn payees(&self) -> Vec<Payee> {
		self.payee
			.iter()
			.map(|(key, count)| Payee {
				key: key.clone(),
				original: self
					.original_payee(key)
					.unwrap_or(key.as_str())
					.to_owned(),
				count: *count,
			})
			.collect()
	}
}

impl Account {
	/// The top-level segment, e.g. "Assets" for "Assets:Bank:Checking".
	pub fn kind(&self) -> &str {
		self.name.split(':').next().unwrap_or_default()
	}

	pub fn frequency(&self) -> u64 {
		self.from_count + self.to_count
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn index() -> FrequencyIndex {
		FrequencyIndex::new(
			BTreeMap::from([
				("Assets:Cash".to_owned(), 2),
				("Expenses:Food".to_owned(), 0),
			]),
			BTreeMap::from([
				("Assets:Cash".to_owned(), 1),
				("Expenses:Food".to_owned(), 3),
			]),
			BTreeMap::from([("xingbake".to_owned(), 4)]),
			BTreeMap::from([
				("xingbake".to_owned(), "星巴克".to_owned()),
				("once".to_owned(), "Once".to_owned()),
			]),
		)
	}

	#[test]
	fn test_accounts() {
		let accounts = index().accounts();
		assert_eq!(accounts.len(), 2);
		assert_eq!(accounts[0].name, "Assets:Cash");
		assert_eq!(accounts[0].kind(), "Assets");
		assert_eq!(accounts[0].frequency(), 3);
		assert_eq!(accounts[1].kind(), "Expenses");
		assert_eq!((accounts[1].from_count, accounts[1].to_count), (0, 3));
	}

	#[test]
	fn test_payees_resolve_original_text() {
		let index = index();
		assert_eq!(
			index.payees(),
			vec![Payee {
				key: "xingbake".to_owned(),
				original: "星巴克".to_owned(),
				count: 4,
			}]
		);
		// mapped even when filtered out of the frequency table
		assert_eq!(index.original_payee("once"), Some("Once"));
		assert_eq!(index.original_payee("nobody"), None);
	}

	#[test]
	fn test_cache_schema() {
		let json = serde_json::to_value(index()).unwrap();
		let tables: Vec<&String> = json.as_object().unwrap().keys().collect();
		assert_eq!(tables, vec!["from", "mapping", "payee", "to"]);
		assert_eq!(json["payee"]["xingbake"], 4);

		let back: FrequencyIndex = serde_json::from_value(json).unwrap();
		assert_eq!(back, index());
	}

	#[test]
	fn test_schema_rejects_negative_counts() {
		let json = r#"{"from":{"A:B":-1},"to":{},"payee":{},"mapping":{}}"#;
		assert!(serde_json::from_str::<FrequencyIndex>(json).is_err());
	}
}
