//! Scenario test runner CLI
//!
//! Usage:
//!   cargo run --bin test-scenarios              # Run all scenarios
//!   cargo run --bin test-scenarios -- skip/     # Run category
//!   cargo run --bin test-scenarios -- timing/timeout_only  # Run single scenario
//!   cargo run --bin test-scenarios -- --verbose # Show details on failure

use std::env;
use std::path::Path;

use arena_tutorial::testing::{
    SCENARIOS_DIR, TestResult, discover_scenarios, parse_test_file, run_test,
};

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut verbose = false;
    let mut filter: Option<String> = None;

    for arg in args.iter().skip(1) {
        if arg == "--verbose" || arg == "-v" {
            verbose = true;
        } else if !arg.starts_with('-') {
            filter = Some(arg.clone());
        }
    }

    println!("Tutorial Scenarios");
    println!("==================\n");

    let scenarios_path = Path::new(SCENARIOS_DIR);
    if !scenarios_path.exists() {
        println!("No scenarios directory found at {}", SCENARIOS_DIR);
        println!("Create scenario files in tests/scenarios/");
        std::process::exit(1);
    }

    let scenarios = discover_scenarios(scenarios_path, filter.as_deref());

    if scenarios.is_empty() {
        println!("No scenario files found.");
        if let Some(f) = filter {
            println!("Filter: {}", f);
        }
        std::process::exit(1);
    }

    let mut passed = 0;
    let mut failed = 0;
    let mut errors = 0;
    let mut current_category = String::new();

    for scenario_path in &scenarios {
        let rel_path = scenario_path
            .strip_prefix(scenarios_path)
            .unwrap_or(scenario_path);

        // Print category header
        if let Some(parent) = rel_path.parent() {
            let category = parent.to_string_lossy().to_string();
            if category != current_category && !category.is_empty() {
                if !current_category.is_empty() {
                    println!();
                }
                println!("{}/", category);
                current_category = category;
            }
        }

        let name = rel_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let definition = match parse_test_file(scenario_path) {
            Ok(def) => def,
            Err(e) => {
                print_result(&name, None, &TestResult::Error { message: e }, verbose);
                errors += 1;
                continue;
            }
        };

        let result = run_test(&definition);

        match &result {
            TestResult::Pass { .. } => passed += 1,
            TestResult::Fail { .. } => failed += 1,
            TestResult::Error { .. } => errors += 1,
        }

        print_result(&name, definition.description.as_deref(), &result, verbose);
    }

    println!("\n==================");
    println!(
        "Results: {} passed, {} failed, {} errors",
        passed, failed, errors
    );

    if failed > 0 || errors > 0 {
        std::process::exit(1);
    }
}

fn print_result(name: &str, description: Option<&str>, result: &TestResult, verbose: bool) {
    let dots = ".".repeat(40 - name.len().min(39));

    match result {
        TestResult::Pass { frames } => {
            println!("  {} {} PASS ({} frames)", name, dots, frames);
        }
        TestResult::Fail { error } => {
            println!("  {} {} FAIL", name, dots);
            if verbose {
                if let Some(description) = description {
                    println!("    ({})", description.trim());
                }
                println!("    {}", error);
            } else {
                println!("    {}", error.message);
            }
        }
        TestResult::Error { message } => {
            println!("  {} {} ERROR", name, dots);
            println!("    {}", message);
        }
    }
}
