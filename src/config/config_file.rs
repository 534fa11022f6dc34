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
use anyhow::{bail, Error};
use serde::Deserialize;
use std::path::PathBuf;

/// Environment variables that take precedence over the config file.
pub const ENV_LEDGER_FOLDER: &str = "BEANFILL_LEDGER_FOLDER";
pub const ENV_DEFAULT_LEDGER: &str = "BEANFILL_DEFAULT_LEDGER";
pub const ENV_DEFAULT_CURRENCY: &str = "BEANFILL_DEFAULT_CURRENCY";

const ACCOUNT: &str = r"[A-Z][^\s:]*(?::[^\s:]+)+";

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
	/// Directory holding the ledger files that get indexed
	pub ledger_folder: Option<PathBuf>,
	/// If set, only these files (relative to ledger_folder) are indexed,
	/// in this order. Otherwise every *.beancount file is.
	pub ledger_files: Option<Vec<String>>,
	/// The ledger new entries go to; scanned for uncleared entries
	pub default_ledger: Option<PathBuf>,
	/// Where the built index is stored between runs
	pub cache_path: Option<PathBuf>,

	pub default_currency: String,
	/// Maximum number of suggestions for a single token
	pub limit: usize,
	/// Payees seen fewer times than this are left out of the payee table
	pub min_payee_count: u64,

	pub patterns: Patterns,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			ledger_folder: None,
			ledger_files: None,
			default_ledger: None,
			cache_path: None,
			default_currency: "CNY".to_owned(),
			limit: 10,
			min_payee_count: 1,
			patterns: Default::default(),
		}
	}
}

impl Config {
	/// Overrides file settings with whichever of the BEANFILL_* variables
	/// the lookup function finds.
	pub fn apply_env<F>(&mut self, lookup: F)
	where
		F: Fn(&str) -> Option<String>,
	{
		if let Some(folder) = lookup(ENV_LEDGER_FOLDER) {
			self.ledger_folder = Some(PathBuf::from(folder));
		}
		if let Some(ledger) = lookup(ENV_DEFAULT_LEDGER) {
			self.default_ledger = Some(PathBuf::from(ledger));
		}
		if let Some(currency) = lookup(ENV_DEFAULT_CURRENCY) {
			self.default_currency = currency;
		}
	}

	/// Checks settings once every source has been merged in.
	pub fn validate(&self) -> Result<(), Error> {
		if self.limit == 0 {
			bail!("Limit must be at least 1");
		}
		Ok(())
	}
}

/// Regular expressions that pull facts out of the ledger text. Each one
/// yields its first capture group per match, or the whole match if it has
/// no groups. The defaults understand beancount syntax.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Patterns {
	pub open: String,
	pub close: String,
	pub payee: String,
	/// Legs money leaves from
	pub from: String,
	/// Legs money goes to
	pub to: String,
	/// Transactions for the pending report: date, rest of the title line,
	/// first leg, second leg
	pub clear: String,
}

impl Default for Patterns {
	fn default() -> Self {
		Self {
			open: format!(
				r"(?m)^\d{{4}}-\d{{2}}-\d{{2}}[ \t]+open[ \t]+({})",
				ACCOUNT
			),
			close: format!(
				r"(?m)^\d{{4}}-\d{{2}}-\d{{2}}[ \t]+close[ \t]+({})",
				ACCOUNT
			),
			payee: r#"(?m)^\d{4}-\d{2}-\d{2}[ \t]+[*!][ \t]+"([^"]+)""#
				.to_owned(),
			from: format!(r"(?m)^[ \t]+({})[ \t]+-\d", ACCOUNT),
			to: format!(r"(?m)^[ \t]+({})[ \t]+\d", ACCOUNT),
			clear: r"(?m)^(\d{4}-\d{2}-\d{2})[ \t]+[*!](.*)\n[ \t]+(.+)\n[ \t]+(.+)"
				.to_owned(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;

	#[test]
	fn test_empty_file_gives_defaults() {
		let config: Config = toml::from_str("").unwrap();
		assert_eq!(config.limit, 10);
		assert_eq!(config.min_payee_count, 1);
		assert_eq!(config.default_currency, "CNY");
		assert!(config.patterns.open.contains("open"));
	}

	#[test]
	fn test_partial_patterns_keep_other_defaults() {
		let config: Config = toml::from_str(
			r#"
			limit = 5
			ledger_folder = "/tmp/books"

			[patterns]
			payee = 'payee: (.+)'
			"#,
		)
		.unwrap();
		assert_eq!(config.limit, 5);
		assert_eq!(config.ledger_folder, Some(PathBuf::from("/tmp/books")));
		assert_eq!(config.patterns.payee, "payee: (.+)");
		assert_eq!(config.patterns.to, Patterns::default().to);
	}

	#[test]
	fn test_env_overrides() {
		let vars: HashMap<&str, &str> = HashMap::from([
			(ENV_LEDGER_FOLDER, "/books"),
			(ENV_DEFAULT_CURRENCY, "USD"),
		]);
		let mut config = Config::default();
		config.apply_env(|k| vars.get(k).map(|v| v.to_string()));
		assert_eq!(config.ledger_folder, Some(PathBuf::from("/books")));
		assert_eq!(config.default_currency, "USD");
		assert_eq!(config.default_ledger, None);
	}

	#[test]
	fn test_zero_limit_from_file_is_rejected() {
		let config: Config = toml::from_str("limit = 0").unwrap();
		assert!(config.validate().is_err());
		assert!(Config::default().validate().is_ok());
	}
}
