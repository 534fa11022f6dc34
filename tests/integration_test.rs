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
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

const CONFIG: &str = "tests/test_data/config.toml";

/// Dynamically collects test cases from a given directory.
fn collect_test_cases(subfolder: &str) -> Vec<(String, String)> {
	let dir_path = format!("tests/test_data/{}", subfolder);

	let mut test_cases = vec![];

	if let Ok(entries) = fs::read_dir(&dir_path) {
		let mut inputs = vec![];
		let mut outputs = vec![];

		for entry in entries.flatten() {
			let file_name =
				entry.file_name().into_string().unwrap_or_default();
			if file_name.ends_with("_in.txt") {
				inputs.push(file_name);
			} else if file_name.ends_with("_out.txt") {
				outputs.push(file_name);
			}
		}

		inputs.sort();
		outputs.sort();

		// Pair inputs with corresponding outputs
		for input_file in inputs {
			let output_file = input_file.replace("_in.txt", "_out.txt");
			if outputs.contains(&output_file) {
				test_cases.push((input_file, output_file));
			}
		}
	}

	test_cases
}

#[test]
fn test_integration_accounts() {
	let test_cases = collect_test_cases("accounts");
	execute("accounts", test_cases, true, "accounts", vec![]);
}

#[test]
fn test_integration_payees() {
	let test_cases = collect_test_cases("payees");
	execute("payees", test_cases, true, "payees", vec![]);
}

#[test]
fn test_integration_account_suggestions() {
	let test_cases = collect_test_cases("suggest");
	execute("suggest", test_cases, true, "add", vec!["chk", "food"]);
}

#[test]
fn test_integration_payee_suggestions() {
	let test_cases = collect_test_cases("payee_suggest");
	execute(
		"payee_suggest",
		test_cases,
		true,
		"add",
		vec!["chk", "coffee", "xing"],
	);
}

#[test]
fn test_integration_draft() {
	let test_cases = collect_test_cases("draft");
	execute(
		"draft",
		test_cases,
		true,
		"add",
		vec!["chk", "coffee", "star", "12.50", "work+latte", "oat_milk"],
	);
}

#[test]
fn test_integration_escape() {
	let test_cases = collect_test_cases("escape");
	execute(
		"escape",
		test_cases,
		true,
		"add",
		vec!["!Expenses:New_Thing", "coffee", "!Custom:Account"],
	);
}

#[test]
fn test_integration_should_fail() {
	let test_cases = collect_test_cases("failures");
	execute(
		"failures",
		test_cases,
		false,
		"add",
		vec!["chk", "coffee", "star", "12.5x"],
	);
}

#[test]
fn test_integration_pending() {
	let test_cases = collect_test_cases("pending");
	execute("pending", test_cases, true, "pending", vec![]);
}

#[test]
fn test_integration_cache_is_stale_until_rebuilt() {
	let dir = tempdir().expect("Failed to create temp dir");
	let ledger = dir.path().join("main.beancount");
	let cache = dir.path().join("index.json");
	fs::copy("tests/test_data/accounts/basic_in.txt", &ledger)
		.expect("Failed to copy ledger");

	let stored = run(&ledger, &cache, "cache", &[]);
	assert!(stored.status.success());
	assert_eq!(
		String::from_utf8_lossy(&stored.stdout).trim(),
		"Indexed 5 accounts and 4 payees"
	);

	let mut content = fs::read_to_string(&ledger).unwrap();
	content.push_str("\n2022-01-01 open Assets:Brokerage\n");
	fs::write(&ledger, content).unwrap();

	// the cached index knows nothing of the new account
	let accounts = stdout(&run(&ledger, &cache, "accounts", &[]));
	assert!(!accounts.contains("Assets:Brokerage"));

	let accounts = stdout(&run(&ledger, &cache, "accounts", &["-r"]));
	assert!(accounts.contains("Assets:Brokerage"));

	let invalidated = run(&ledger, &cache, "invalidate", &[]);
	assert!(invalidated.status.success());
	assert!(!cache.exists());
}

#[test]
fn test_integration_corrupt_cache_is_rebuilt() {
	let dir = tempdir().expect("Failed to create temp dir");
	let ledger = Path::new("tests/test_data/accounts/basic_in.txt");
	let cache = dir.path().join("index.json");
	fs::write(&cache, "not json at all").unwrap();

	let suggestions = stdout(&run(ledger, &cache, "add", &["chk", "food"]));
	assert_eq!(
		suggestions,
		"Expenses:Food:Coffee\nExpenses:Food:Groceries"
	);
	assert!(fs::read_to_string(&cache).unwrap().starts_with('{'));
}

fn run(ledger: &Path, cache: &Path, cmd: &str, args: &[&str]) -> Output {
	let ledger = ledger.to_string_lossy().into_owned();
	let cache = cache.to_string_lossy().into_owned();
	let all_args = [
		vec![
			"run",
			"--",
			"-f",
			ledger.as_str(),
			"--config",
			CONFIG,
			"--cache",
			cache.as_str(),
			cmd,
		],
		args.to_vec(),
	]
	.concat();

	Command::new("cargo")
		.args(all_args)
		.output()
		.expect("Failed to execute process")
}

fn stdout(output: &Output) -> String {
	assert!(
		output.status.success(),
		"command failed: {}",
		String::from_utf8_lossy(&output.stderr)
	);
	String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn execute(
	subfolder: &str,
	test_cases: Vec<(String, String)>,
	should_succeed: bool,
	cmd: &str,
	args: Vec<&str>,
) {
	for (input_file, expected_output_file) in test_cases {
		println!("running for {}...", input_file);

		let loc = format!("{}/{}/{}", "tests/test_data", subfolder, input_file);

		// every case starts without an index
		let dir = tempdir().expect("Failed to create temp dir");
		let output =
			run(Path::new(&loc), &dir.path().join("index.json"), cmd, &args);

		if !should_succeed {
			assert!(
				!output.status.success(),
				"{} unexpectedly succeeded!",
				input_file
			);
			continue;
		}

		assert!(
			output.status.success(),
			"{} failed processing: {}",
			input_file,
			String::from_utf8_lossy(&output.stderr)
		);

		let stdout = String::from_utf8_lossy(&output.stdout);

		let expected_output = fs::read_to_string(format!(
			"{}/{}/{}",
			"tests/test_data", subfolder, expected_output_file
		))
		.expect("Failed to read expected output file");

		assert_eq!(
			stdout.trim(),
			expected_output.trim(),
			"Output did not match for {}; expected:\n{}\ngot:\n{}",
			input_file,
			expected_output.trim(),
			stdout.trim()
		);
	}
}
