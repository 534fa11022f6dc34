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
use crate::ranking::ranker::{Candidate, Ranker};
use crate::resolve::role::Role;
use crate::util::transliterate::transliterate;
use thiserror::Error;

/// A token starting with this is used as typed instead of being matched.
pub const ESCAPE_MARKER: char = '!';

/// Problems with user input that the front end should point at.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
	#[error("amount value error: {token:?} is not a number")]
	Amount {
		token: String,
		/// Character position in the input line of the first bad character
		cursor_position: usize,
	},
}

/// The values of a new entry, as far as the user has typed them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Draft {
	pub from: String,
	pub to: String,
	pub payee: String,
	pub amount: Option<f64>,
	pub tags: String,
	pub comment: String,
}

impl Draft {
	/// One line summary, e.g. "Assets:Cash ➟ Expenses:Food by Starbucks
	/// 12.50 CNY". Parts not typed yet are left out.
	pub fn describe(&self, currency: &str) -> String {
		let mut desc: Vec<String> = vec![];
		if !self.from.is_empty() {
			desc.push(self.from.clone());
		}
		if !self.to.is_empty() {
			desc.push("➟".to_owned());
			desc.push(self.to.clone());
		}
		if !self.payee.is_empty() {
			desc.push("by".to_owned());
			desc.push(self.payee.clone());
		}
		if let Some(amount) = self.amount {
			desc.push(format!("{:.2} {}", amount, currency));
		}
		desc.join(" ")
	}
}

/// Candidates for the token still being typed.
#[derive(Clone, Debug, PartialEq)]
pub struct Suggestions {
	pub role: Role,
	pub candidates: Vec<Candidate>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Resolution {
	pub draft: Draft,
	/// Present when the last token is an account or payee still being typed
	pub suggestions: Option<Suggestions>,
}

/// Resolves what the user typed against one index snapshot.
pub struct Resolver<'a> {
	index: &'a FrequencyIndex,
	ranker: Ranker,
}

impl<'a> Resolver<'a> {
	pub fn new(index: &'a FrequencyIndex, ranker: Ranker) -> Self {
		Self { index, ranker }
	}

	/// Resolves tokens that already have their roles: the n-th token takes
	/// the n-th role of Role::ORDER, whatever it contains. Cursor positions
	/// refer to the tokens joined by single spaces.
	pub fn resolve<S: AsRef<str>>(
		&self,
		tokens: &[S],
	) -> Result<Resolution, ValidationError> {
		let tokens: Vec<&str> = tokens.iter().map(|t| t.as_ref()).collect();
		let line = tokens.join(" ");

		let mut offset = 0;
		let mut placed = Vec::with_capacity(tokens.len());
		for token in &tokens {
			placed.push((offset, *token));
			offset += token.len() + 1;
		}

		let still_typing =
			!line.is_empty() && !line.ends_with(char::is_whitespace);
		self.resolve_tokens(&line, &placed, still_typing)
	}

	/// Resolves an input line. Whitespace separates tokens, which take
	/// roles in Role::ORDER; extra tokens are ignored. If the line ends with
	/// whitespace the last token is finished and no suggestions are made.
	pub fn resolve_line(
		&self,
		line: &str,
	) -> Result<Resolution, ValidationError> {
		let tokens = tokenize(line);
		let still_typing = !line.ends_with(char::is_whitespace);
		self.resolve_tokens(line, &tokens, still_typing)
	}

	/// Tokens carry their byte offset in `line`.
	fn resolve_tokens(
		&self,
		line: &str,
		tokens: &[(usize, &str)],
		still_typing: bool,
	) -> Result<Resolution, ValidationError> {
		let mut draft = Draft::default();
		let mut suggestions = None;

		for (i, (role, &(offset, token))) in
			Role::ORDER.iter().zip(tokens.iter()).enumerate()
		{
			match role {
				Role::From | Role::To | Role::Payee => {
					let candidates = self.candidates(*role, token);
					let value = candidates
						.first()
						.map(|c| c.display().to_owned())
						.unwrap_or_default();
					match role {
						Role::From => draft.from = value,
						Role::To => draft.to = value,
						_ => draft.payee = value,
					}

					if i == tokens.len() - 1 && still_typing {
						suggestions = Some(Suggestions {
							role: *role,
							candidates,
						});
					}
				},
				Role::Amount => {
					draft.amount = Some(parse_amount(line, offset, token)?);
				},
				Role::Tags if token.is_empty() => {},
				Role::Tags => {
					let tags: Vec<&str> = token.split('+').collect();
					draft.tags = format!("#{}", tags.join(" #"));
				},
				Role::Comment => draft.comment = token.to_owned(),
			}
		}

		Ok(Resolution { draft, suggestions })
	}

	/// Ranked candidates for a token in an account or payee role.
	pub fn candidates(&self, role: Role, token: &str) -> Vec<Candidate> {
		if let Some(literal) = token.strip_prefix(ESCAPE_MARKER) {
			let text = literal.replace(role.separators(), " ");
			return vec![Candidate::literal(&text)];
		}

		let fragment = token.replace('_', " ");
		match role {
			Role::Payee => self
				.ranker
				.rank_with(&fragment, self.index.payee_table(), transliterate)
				.into_iter()
				.map(|mut c| {
					c.original =
						self.index.original_payee(&c.key).map(str::to_owned);
					c
				})
				.collect(),
			Role::To => self.ranker.rank(&fragment, self.index.to_table()),
			_ => self.ranker.rank(&fragment, self.index.from_table()),
		}
	}
}

/// Splits on whitespace, keeping the byte offset of each token.
fn tokenize(line: &str) -> Vec<(usize, &str)> {
	let mut tokens = vec![];
	let mut start = None;

	for (i, c) in line.char_indices() {
		if c.is_whitespace() {
			if let Some(s) = start.take() {
				tokens.push((s, &line[s..i]));
			}
		} else if start.is_none() {
			start = Some(i);
		}
	}
	if let Some(s) = start {
		tokens.push((s, &line[s..]));
	}

	tokens
}

/// Amounts are plain decimals: digits with at most one point.
fn parse_amount(
	line: &str,
	offset: usize,
	token: &str,
) -> Result<f64, ValidationError> {
	let error = |at: usize| ValidationError::Amount {
		token: token.to_owned(),
		cursor_position: line[..offset + at].chars().count(),
	};

	let mut seen_point = false;
	for (i, c) in token.char_indices() {
		match c {
			'0'..='9' => {},
			'.' if !seen_point => seen_point = true,
			_ => return Err(error(i)),
		}
	}

	token.parse::<f64>().map_err(|_| error(0))
}
