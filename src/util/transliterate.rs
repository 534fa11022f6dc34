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
use deunicode::deunicode_char;

/// Reduces text to the key used to look up and fuzzy-match payees: lowercase
/// ASCII letters and digits only, with every other script romanized first
/// (Chinese characters become toneless pinyin syllables, accented Latin loses
/// its accents). Whitespace and punctuation are dropped, so "Blue Bottle",
/// "blue-bottle" and "BLUEBOTTLE" all share one key.
pub fn transliterate(text: &str) -> String {
	let mut key = String::with_capacity(text.len());

	for c in text.chars() {
		if c.is_ascii() {
			if c.is_ascii_alphanumeric() {
				key.push(c.to_ascii_lowercase());
			}
			continue;
		}

		// characters with no romanization are dropped
		if let Some(latin) = deunicode_char(c) {
			key.extend(
				latin
					.chars()
					.filter(|l| l.is_ascii_alphanumeric())
					.map(|l| l.to_ascii_lowercase()),
			);
		}
	}

	key
}
