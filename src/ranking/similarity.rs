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
use strsim::normalized_levenshtein;

/// Substring-tolerant similarity on a 0-100 scale. The shorter string is
/// compared against every window of the same length in the longer one and
/// the best window wins, so "star" scores 100 against "starbucks".
/// Case is ignored.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
	let a: Vec<char> = a.to_lowercase().chars().collect();
	let b: Vec<char> = b.to_lowercase().chars().collect();
	let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };

	if short.is_empty() {
		return 0.0;
	}

	let needle: String = short.iter().collect();
	long.windows(short.len())
		.map(|window| {
			let window: String = window.iter().collect();
			normalized_levenshtein(&needle, &window)
		})
		.fold(0.0, f64::max)
		* 100.0
}
