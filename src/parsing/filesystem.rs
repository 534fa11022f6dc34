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
use crate::config::config_file::Config;
use anyhow::{anyhow, bail, Error};
use dirs::{cache_dir, home_dir};
use log::{debug, warn};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const LEDGER_EXTENSION: &str = "beancount";

pub struct Filesystem {
	/// Set of ledger files that have been read.
	/// Used to avoid counting the same file twice.
	read_files: HashSet<PathBuf>,
}

impl Filesystem {
	pub fn new() -> Self {
		Self {
			read_files: HashSet::new(),
		}
	}

	/// Returns false if the file was already read during this run.
	pub fn declare_file(&mut self, file_path: &Path) -> bool {
		let key = fs::canonicalize(file_path)
			.unwrap_or_else(|_| file_path.to_path_buf());
		self.read_files.insert(key)
	}

	/// Fetches the config from the given path, or default path if none. A
	/// missing default config is not an error; every setting has a default.
	pub fn get_config(
		&self,
		custom_config_path: Option<&String>,
	) -> Result<Config, Error> {
		let config_path = match &custom_config_path {
			None => {
				let Some(home_dir) = home_dir() else {
					return Ok(Config::default());
				};
				home_dir.join(".config/beanfill/config.toml")
			},
			Some(p) => PathBuf::from(p),
		};

		if !config_path.exists() && custom_config_path.is_none() {
			debug!("no config at {}, using defaults", config_path.display());
			return Ok(Config::default());
		}

		let content = fs::read_to_string(&config_path).map_err(|e| {
			anyhow!("failed to read config {}: {}", config_path.display(), e)
		})?;
		let config: Config = toml::from_str(&content)
			.map_err(|e| anyhow!("failed to parse config: {}", e))?;

		Ok(config)
	}

	/// The files making up the ledger at the given source. A file source is
	/// used as is; a directory source yields the listed files in order, or
	/// every ledger file in it sorted by name.
	pub fn ledger_paths(
		&self,
		source: &Path,
		listed: Option<&[String]>,
	) -> Result<Vec<PathBuf>, Error> {
		if source.is_file() {
			return Ok(vec![source.to_path_buf()]);
		}

		if !source.is_dir() {
			bail!("ledger source {} does not exist", source.display());
		}

		if let Some(listed) = listed {
			return Ok(listed.iter().map(|f| source.join(f)).collect());
		}

		let mut paths = vec![];
		for entry in fs::read_dir(source)? {
			let path = entry?.path();
			if path.is_file()
				&& path.extension().is_some_and(|ext| ext == LEDGER_EXTENSION)
			{
				paths.push(path);
			}
		}
		paths.sort();

		Ok(paths)
	}

	/// Reads every file of the ledger and joins them into one document.
	pub fn read_ledger(
		&mut self,
		source: &Path,
		listed: Option<&[String]>,
	) -> Result<String, Error> {
		let paths = self.ledger_paths(source, listed)?;
		if paths.is_empty() {
			bail!("no ledger files found in {}", source.display());
		}

		let mut records = vec![];
		for path in paths {
			if !self.declare_file(&path) {
				warn!("ledger file {} listed twice; reading once", path.display());
				continue;
			}
			let content = fs::read_to_string(&path).map_err(|e| {
				anyhow!("failed to read ledger {}: {}", path.display(), e)
			})?;
			debug!("read {} bytes from {}", content.len(), path.display());
			records.push(content);
		}

		Ok(records.join("\n"))
	}
}

/// The configured cache location, or a file in the platform cache dir named
/// after the ledger source, so that different ledgers get different indexes.
pub fn cache_path(config: &Config) -> Result<PathBuf, Error> {
	if let Some(path) = &config.cache_path {
		return Ok(path.clone());
	}

	let Some(dir) = cache_dir() else {
		bail!("unable to determine cache directory; set cache_path");
	};

	Ok(dir.join("beanfill").join(cache_file_name(config.ledger_folder.as_deref())))
}

fn cache_file_name(source: Option<&Path>) -> String {
	let Some(source) = source else {
		return "index.json".to_owned();
	};

	let source = fs::canonicalize(source).unwrap_or_else(|_| source.to_path_buf());
	let mut hasher = Sha256::new();
	hasher.update(source.to_string_lossy().as_bytes());
	let digest = format!("{:x}", hasher.finalize());
	format!("index-{}.json", &digest[..16])
}
