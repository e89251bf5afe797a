//! Interrogation console for the manor mystery.
//!
//! A line-oriented front end around `whodunit_core::VerdictEngine`,
//! standing in for the game's dialogue layer: type a suspect's name to
//! question them, and once everyone has been questioned the verdict is
//! announced.
//!
//! ```bash
//! cargo run -p whodunit                 # built-in case
//! cargo run -p whodunit -- case.json    # author-supplied case
//! RUST_LOG=debug cargo run -p whodunit  # trace contributed constraints
//! ```

use std::io::{self, BufRead, Write};
use whodunit_core::{sample_case, Case, Verdict, VerdictEngine};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    let case = match args.get(1) {
        Some(path) => Case::load(path)?,
        None => sample_case(),
    };
    let mut engine = VerdictEngine::new(case)?;

    println!("A body has been found in the manor. Question the suspects:");
    print_roster(&engine);
    println!("Commands: a suspect's name, `reset`, `quit`.");

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = stdin.lock().lines().next() else {
            break;
        };
        let input = line?.trim().to_string();

        match input.as_str() {
            "" => continue,
            "quit" | "exit" => break,
            "reset" => {
                engine.reset();
                println!("The investigation starts over.");
                continue;
            }
            name => {
                let Some(id) = engine.case().suspect_id(name) else {
                    log::debug!("no suspect named {name:?}");
                    println!("Nobody here by that name.");
                    print_roster(&engine);
                    continue;
                };
                let interaction = engine.record_interaction(id)?;
                println!("{name}: {}", interaction.statement);
                match interaction.verdict {
                    Some(Verdict::Determined { explanation, .. }) => {
                        println!();
                        println!("*** {explanation} ***");
                        println!("Mysteries solved so far: {}", engine.rounds_solved());
                    }
                    Some(Verdict::Undetermined) => {
                        println!();
                        println!("The statements contradict each other; no killer can");
                        println!("be determined. Type `reset` to start over.");
                    }
                    None => {}
                }
            }
        }
    }

    Ok(())
}

fn print_roster(engine: &VerdictEngine) {
    let names: Vec<&str> = engine
        .case()
        .suspects
        .iter()
        .map(|s| s.name.as_str())
        .collect();
    println!("Suspects: {}", names.join(", "));
}

fn print_help() {
    println!("whodunit - interrogation console for the manor mystery");
    println!();
    println!("USAGE:");
    println!("  whodunit [CASE_FILE]");
    println!();
    println!("ARGS:");
    println!("  CASE_FILE  Path to a JSON case file (defaults to the built-in case)");
    println!();
    println!("Set RUST_LOG=debug to trace the constraints each statement contributes.");
}
