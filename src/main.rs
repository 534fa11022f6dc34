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
use beanfill::config::config_file::Config;
use beanfill::index::builder::IndexBuilder;
use beanfill::index::cache::{load_or_rebuild, FileCache, IndexCache};
use beanfill::index::frequency_index::FrequencyIndex;
use beanfill::parsing::filesystem::{cache_path, Filesystem};
use beanfill::parsing::pending::PendingScanner;
use beanfill::parsing::scanner::LedgerScanner;
use beanfill::ranking::ranker::Ranker;
use beanfill::resolve::resolver::{Resolution, Resolver};
use clap::{ArgAction, Parser, ValueEnum};
use env_logger::Env;
use log::debug;
use std::env;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
	name = "beanfill",
	version,
	about = "Frequency-ranked account and payee completion for plain text ledgers"
)]
struct Cli {
	// ----------------
	// -- POSITIONAL --
	// ----------------
	/// The command to execute
	command: Directive,

	/// For add: from, to, payee, amount, tags and comment, in that order.
	/// Prefix a token with ! to use it as typed.
	#[arg(required = false)]
	tokens: Vec<String>,

	// -----------
	// -- FLAGS --
	// -----------
	/// Ledger file or folder to index (default: ledger_folder from config)
	#[arg(short, long)]
	file: Option<String>,

	/// Custom config file location (default: ~/.config/beanfill/config.toml)
	#[arg(long)]
	config: Option<String>,

	/// Custom index cache location
	#[arg(long)]
	cache: Option<String>,

	/// Maximum number of suggestions to show
	#[arg(short, long)]
	limit: Option<usize>,

	/// Rebuild the index even if a cached one exists
	#[arg(short, long)]
	rebuild: bool,

	/// Log more; repeat for even more
	#[arg(short, long, action = ArgAction::Count)]
	verbose: u8,
}

impl Cli {
	/// Extra validations on top of what clap does
	fn validate(&self) -> Result<(), Error> {
		if self.command == Directive::Add && self.tokens.is_empty() {
			bail!("No tokens specified");
		}

		Ok(())
	}

	/// Flags beat the environment, which beats the config file.
	fn apply_overrides(&self, config: &mut Config) {
		if let Some(file) = &self.file {
			config.ledger_folder = Some(PathBuf::from(file));
		}
		if let Some(cache) = &self.cache {
			config.cache_path = Some(PathBuf::from(cache));
		}
		if let Some(limit) = self.limit {
			config.limit = limit;
		}
	}
}

#[derive(ValueEnum, Clone, PartialEq)]
enum Directive {
	Add, // resolve tokens into suggestions or a draft entry

	Cache,      // rebuild and store the index
	Invalidate, // drop the stored index

	Accounts, // live accounts and their usage
	Payees,   // payees and their usage

	Pending, // entries not yet tagged as cleared
}

fn main() -> Result<(), Error> {
	let args = Cli::parse();
	args.validate()?;
	init_logging(args.verbose);

	let mut fs = Filesystem::new();
	let mut config = fs.get_config(args.config.as_ref())?;
	config.apply_env(|key| env::var(key).ok());
	args.apply_overrides(&mut config);
	config.validate()?;

	let mut cache = FileCache::new(cache_path(&config)?);

	match args.command {
		Directive::Add => {
			let index =
				session_index(&mut fs, &config, &mut cache, args.rebuild)?;
			let resolver = Resolver::new(&index, Ranker::new(config.limit));
			let resolution = resolver.resolve(&args.tokens)?;
			print_resolution(&resolution, &config.default_currency);
		},
		Directive::Cache => {
			let index = build_index(&mut fs, &config)?;
			cache.store(&index)?;
			println!(
				"Indexed {} accounts and {} payees",
				index.from_table().len(),
				index.payee_table().len()
			);
		},
		Directive::Invalidate => {
			cache.invalidate()?;
			println!("Done");
		},
		Directive::Accounts => {
			let index =
				session_index(&mut fs, &config, &mut cache, args.rebuild)?;
			for account in index.accounts() {
				println!(
					"{:<12} {:<40} {:>6} {:>6}",
					account.kind(),
					account.name,
					account.from_count,
					account.to_count
				);
			}
		},
		Directive::Payees => {
			let index =
				session_index(&mut fs, &config, &mut cache, args.rebuild)?;
			for payee in index.payees() {
				println!("{:<24} {:>6}  {}", payee.key, payee.count, payee.original);
			}
		},
		Directive::Pending => {
			// an explicit file beats the configured default ledger
			let ledger = match args.file.as_ref() {
				Some(file) => PathBuf::from(file),
				None => match &config.default_ledger {
					Some(ledger) => ledger.clone(),
					None => bail!("No default ledger configured"),
				},
			};
			let text = fs.read_ledger(&ledger, None)?;
			let scanner = PendingScanner::new(&config.patterns.clear)?;
			for entry in scanner.scan(&text) {
				println!("{}", entry);
			}
		},
	}

	Ok(())
}

fn init_logging(verbosity: u8) {
	let level = match verbosity {
		0 => "warn",
		1 => "info",
		_ => "debug",
	};
	env_logger::Builder::from_env(Env::default().default_filter_or(level))
		.init();
}

/// Scans the whole ledger and builds a fresh index from it.
fn build_index(
	fs: &mut Filesystem,
	config: &Config,
) -> Result<FrequencyIndex, Error> {
	let Some(folder) = &config.ledger_folder else {
		bail!("No ledger configured; set ledger_folder or pass -f");
	};

	let text = fs.read_ledger(folder, config.ledger_files.as_deref())?;
	let scan = LedgerScanner::new(&config.patterns)?.scan(&text);
	debug!(
		"scanned {} opens, {} closes, {} payees, {} + {} legs",
		scan.open.len(),
		scan.close.len(),
		scan.payee.len(),
		scan.from.len(),
		scan.to.len()
	);

	Ok(IndexBuilder::new(config.min_payee_count).build(&scan))
}

/// The index to resolve against: the cached one unless told to rebuild or
/// there is none.
fn session_index(
	fs: &mut Filesystem,
	config: &Config,
	cache: &mut FileCache,
	rebuild: bool,
) -> Result<FrequencyIndex, Error> {
	if rebuild {
		cache.invalidate()?;
	}

	debug!("using index cache {}", cache.path().display());
	load_or_rebuild(cache, || build_index(fs, config))
}

fn print_resolution(resolution: &Resolution, currency: &str) {
	if let Some(suggestions) = &resolution.suggestions {
		debug!(
			"{} suggestions for {}",
			suggestions.candidates.len(),
			suggestions.role
		);
		for candidate in &suggestions.candidates {
			println!("{}", candidate.display());
		}
		return;
	}

	let draft = &resolution.draft;
	println!("{}", draft.describe(currency));
	if !draft.tags.is_empty() {
		println!("{}", draft.tags);
	}
	if !draft.comment.is_empty() {
		println!("{}", draft.comment);
	}
}
