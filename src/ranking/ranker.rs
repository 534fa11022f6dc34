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
use crate::ranking::similarity::partial_ratio;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Matches scoring at or below this are noise, however often they are used.
pub const SIMILARITY_FLOOR: f64 = 60.0;

pub const DEFAULT_LIMIT: usize = 10;

/// A ranked match for a fragment the user typed.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
	/// Key in the table that was ranked, or the fragment itself when
	/// nothing matched
	pub key: String,
	/// 0-100, before frequency weighting
	pub similarity: f64,
	pub score: f64,
	/// For payees, the text the key was transliterated from
	pub original: Option<String>,
}

impl Candidate {
	pub fn literal(text: &str) -> Self {
		Self {
			key: text.to_owned(),
			similarity: 0.0,
			score: 0.0,
			original: None,
		}
	}

	/// What to show and insert for this candidate.
	pub fn display(&self) -> &str {
		self.original.as_deref().unwrap_or(&self.key)
	}
}

/// Orders the keys of a frequency table by how well they match a fragment,
/// weighted by how often each has been used.
pub struct Ranker {
	limit: usize,
}

impl Ranker {
	/// A limit below one is raised to one so a fragment always gets back
	/// at least itself.
	pub fn new(limit: usize) -> Self {
		Self { limit: limit.max(1) }
	}

	pub fn rank(
		&self,
		fragment: &str,
		table: &BTreeMap<String, u64>,
	) -> Vec<Candidate> {
		self.rank_with(fragment, table, str::to_owned)
	}

	/// Like rank, but the fragment is passed through `normalize` before it is
	/// compared with the keys, for tables whose keys are normalized too. The
	/// fallback candidate is still the fragment as typed.
	pub fn rank_with<F>(
		&self,
		fragment: &str,
		table: &BTreeMap<String, u64>,
		normalize: F,
	) -> Vec<Candidate>
	where
		F: Fn(&str) -> String,
	{
		let fragment = fragment.replace(['\'', '"'], "");
		if fragment.trim().is_empty() {
			// no constraint; anything goes
			return vec![Candidate::literal("")];
		}

		let needle = normalize(&fragment);
		let mut matches: Vec<(Candidate, u64)> = table
			.iter()
			.filter_map(|(key, &frequency)| {
				let similarity = partial_ratio(&needle, key);
				(similarity > SIMILARITY_FLOOR).then(|| {
					let candidate = Candidate {
						key: key.clone(),
						similarity,
						score: 0.0,
						original: None,
					};
					(candidate, frequency)
				})
			})
			.collect();

		if matches.is_empty() {
			return vec![Candidate::literal(&fragment)];
		}

		// Both sorts are stable: equal scores keep the similarity order,
		// equal similarities keep key order.
		matches.sort_by(|a, b| descending(a.0.similarity, b.0.similarity));
		for (candidate, frequency) in matches.iter_mut() {
			let weight = (*frequency as f64 + 1.0).ln();
			candidate.score = candidate.similarity * weight;
		}
		matches.sort_by(|a, b| descending(a.0.score, b.0.score));

		matches
			.into_iter()
			.take(self.limit)
			.map(|(candidate, _)| candidate)
			.collect()
	}
}

impl Default for Ranker {
	fn default() -> Self {
		Self::new(DEFAULT_LIMIT)
	}
}

fn descending(a: f64, b: f64) -> Ordering {
	b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}
