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
use std::fmt;

/// What a user-typed token means, by position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
	From,
	To,
	Payee,
	Amount,
	Tags,
	Comment,
}

impl Role {
	/// Tokens are assigned roles in this order.
	pub const ORDER: [Role; 6] = [
		Role::From,
		Role::To,
		Role::Payee,
		Role::Amount,
		Role::Tags,
		Role::Comment,
	];

	/// Whether tokens in this role are fuzzy-matched against the index.
	pub fn is_ranked(&self) -> bool {
		matches!(self, Role::From | Role::To | Role::Payee)
	}

	/// Characters that stand in for spaces when a token is taken verbatim.
	/// Accounts keep their colons; payees have no hierarchy to protect.
	pub fn separators(&self) -> &'static [char] {
		match self {
			Role::Payee => &['_', ':'],
			_ => &['_'],
		}
	}
}

impl fmt::Display for Role {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Role::From => "from",
			Role::To => "to",
			Role::Payee => "payee",
			Role::Amount => "amount",
			Role::Tags => "tags",
			Role::Comment => "comment",
		};
		write!(f, "{}", name)
	}
}
