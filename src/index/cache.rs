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
use anyhow::{anyhow, Error};
use log::{debug, info, warn};
use std::fs;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Somewhere a built index can be kept between resolutions. There is no
/// freshness check: a stored index is returned until it is invalidated, no
/// matter what happened to the ledger since.
pub trait IndexCache {
	/// None on a miss, which includes unreadable or corrupt content.
	fn load(&self) -> Option<FrequencyIndex>;
	fn store(&mut self, index: &FrequencyIndex) -> Result<(), Error>;
	fn invalidate(&mut self) -> Result<(), Error>;
}

/// Returns the cached index, or on a miss builds one with the given function
/// and stores it. Failing to store is only a warning since the index in hand
/// is still good.
pub fn load_or_rebuild<C, F>(cache: &mut C, rebuild: F) -> Result<FrequencyIndex, Error>
where
	C: IndexCache + ?Sized,
	F: FnOnce() -> Result<FrequencyIndex, Error>,
{
	if let Some(index) = cache.load() {
		return Ok(index);
	}

	info!("index cache miss; rebuilding from ledger");
	let index = rebuild()?;
	if let Err(e) = cache.store(&index) {
		warn!("could not store index: {}", e);
	}

	Ok(index)
}

/// The index as a JSON file. Stores replace the file atomically so a reader
/// never sees half an index.
pub struct FileCache {
	path: PathBuf,
}

impl FileCache {
	pub fn new(path: PathBuf) -> Self {
		Self { path }
	}

	pub fn path(&self) -> &Path {
		&self.path
	}
}

impl IndexCache for FileCache {
	fn load(&self) -> Option<FrequencyIndex> {
		let content = match fs::read_to_string(&self.path) {
			Ok(content) => content,
			Err(e) => {
				debug!("no index at {}: {}", self.path.display(), e);
				return None;
			},
		};

		match serde_json::from_str(&content) {
			Ok(index) => {
				debug!("loaded index from {}", self.path.display());
				Some(index)
			},
			Err(e) => {
				warn!("ignoring corrupt index {}: {}", self.path.display(), e);
				None
			},
		}
	}

	fn store(&mut self, index: &FrequencyIndex) -> Result<(), Error> {
		let parent = match self.path.parent() {
			Some(p) if !p.as_os_str().is_empty() => p,
			_ => Path::new("."),
		};
		fs::create_dir_all(parent)?;

		let mut temp_file = NamedTempFile::new_in(parent)?;
		{
			let mut writer = BufWriter::new(temp_file.as_file_mut());
			serde_json::to_writer(&mut writer, index)?;
			writer.flush()?;
		}

		temp_file.persist(&self.path).map_err(|e| {
			anyhow!("failed to write index {}: {}", self.path.display(), e)
		})?;
		info!("stored index at {}", self.path.display());
		Ok(())
	}

	fn invalidate(&mut self) -> Result<(), Error> {
		match fs::remove_file(&self.path) {
			Ok(()) => {
				info!("removed index {}", self.path.display());
				Ok(())
			},
			Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
			Err(e) => Err(anyhow!(
				"failed to remove index {}: {}",
				self.path.display(),
				e
			)),
		}
	}
}

/// Keeps the index in memory only, for hosts that hold one session open and
/// for tests.
#[derive(Debug, Default)]
pub struct MemoryCache {
	index: Option<FrequencyIndex>,
}

impl IndexCache for MemoryCache {
	fn load(&self) -> Option<FrequencyIndex> {
		self.index.clone()
	}

	fn store(&mut self, index: &FrequencyIndex) -> Result<(), Error> {
		self.index = Some(index.clone());
		Ok(())
	}

	fn invalidate(&mut self) -> Result<(), Error> {
		self.index = None;
		Ok(())
	}
}
