use anyhow::{Context, Result};
use clap::Parser;
use std::{
    io::{self, stdin, Write},
    path::PathBuf,
    str::FromStr,
};

mod bank;
mod session;
mod store;

use bank::BankState;
use session::{OptionMark, QuizSession};
use store::SavedStore;

#[derive(Parser, Debug)]
struct Args {
    /// Question bank JSON file; uses the built-in bank when omitted
    #[arg(short, long)]
    bank: Option<PathBuf>,
    /// File holding the saved-questions list
    #[arg(short, long, default_value = "saved_questions.json")]
    saved: PathBuf,
    #[arg(short, long, default_value = "false")]
    list: bool,
}

enum Commands {
    Generate(String),
    Regenerate,
    Answer { question: usize, option: usize },
    Show,
    CheckScore,
    ClearAnswers,
    Save(usize),
    SavedList,
    ClearSaved,
    Categories,
    Help,
    Quit,
}

impl Commands {
    fn help() {
        println!("Available commands:");
        println!("  \\g <category> - Generate a quiz from a category");
        println!("  \\r            - Regenerate from the current category");
        println!("  <n> <letter>  - Select an option, e.g. '2 b'");
        println!("  \\p            - Print the current quiz");
        println!("  \\s            - Check your score");
        println!("  \\x            - Clear answers and highlights");
        println!("  \\save <n>     - Save question n for later review");
        println!("  \\l            - List saved questions");
        println!("  \\purge        - Clear the saved list");
        println!("  \\c            - List categories");
        println!("  \\h            - Show this help message");
        println!("  \\q            - Quit");
    }
}

impl FromStr for Commands {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s.split_whitespace().collect();
        match tokens.as_slice() {
            ["\\g", category] => Ok(Commands::Generate((*category).to_string())),
            ["\\g"] => Err("\\g needs a category name".to_string()),
            ["\\r"] => Ok(Commands::Regenerate),
            ["\\p"] => Ok(Commands::Show),
            ["\\s"] => Ok(Commands::CheckScore),
            ["\\x"] => Ok(Commands::ClearAnswers),
            ["\\save", number] => {
                let question = parse_question_number(number)?;
                Ok(Commands::Save(question))
            }
            ["\\save"] => Err("\\save needs a question number".to_string()),
            ["\\l"] => Ok(Commands::SavedList),
            ["\\purge"] => Ok(Commands::ClearSaved),
            ["\\c"] => Ok(Commands::Categories),
            ["\\h"] => Ok(Commands::Help),
            ["\\q"] => Ok(Commands::Quit),
            [number, letter] if !number.starts_with('\\') => {
                let question = parse_question_number(number)?;
                let option = parse_option_letter(letter)
                    .ok_or_else(|| "expected an option letter like 'a'".to_string())?;
                Ok(Commands::Answer { question, option })
            }
            _ => Err("Unknown command".to_string()),
        }
    }
}

/// 1-based on the surface, 0-based inside.
fn parse_question_number(token: &str) -> Result<usize, String> {
    match token.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err("expected a question number starting at 1".to_string()),
    }
}

fn parse_option_letter(token: &str) -> Option<usize> {
    let mut chars = token.chars();
    let letter = chars.next()?;
    if chars.next().is_some() || !letter.is_ascii_alphabetic() {
        return None;
    }
    Some(letter.to_ascii_lowercase() as usize - 'a' as usize)
}

fn option_letter(index: usize) -> char {
    (b'a' + index as u8) as char
}

fn render_quiz(session: &QuizSession) {
    if session.is_empty() {
        println!("No questions to display. Generate a set first.");
        return;
    }

    for (idx, question) in session.questions().iter().enumerate() {
        println!("\n{}. {}", idx + 1, question.question);
        for (opt_idx, option) in question.options.iter().enumerate() {
            let marker = if session.selection(idx) == Some(opt_idx) {
                "(o)"
            } else {
                "( )"
            };
            let mark = match session.mark(idx, opt_idx) {
                OptionMark::Correct => "  [correct]",
                OptionMark::Wrong => "  [wrong]",
                OptionMark::Unmarked => "",
            };
            println!("   {} {}. {}{}", marker, option_letter(opt_idx), option, mark);
        }
    }
}

fn render_saved(store: &SavedStore) {
    println!("Saved questions:");
    let entries = store.entries();
    if entries.is_empty() {
        println!("  No saved questions yet.");
        return;
    }
    for (idx, entry) in entries.iter().enumerate() {
        println!("  {}. {}", idx + 1, entry);
    }
}

fn render_categories(bank: &BankState) {
    match bank.bank() {
        Some(bank) if !bank.is_empty() => {
            println!("Available categories:");
            for (name, questions) in bank.iter() {
                println!("  {} ({} questions)", name, questions.len());
            }
        }
        _ => println!("No categories available."),
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush().context("Failed to flush stdout")?;

    let mut input = String::new();
    stdin()
        .read_line(&mut input)
        .context("Failed to read line from stdin")?;

    let input = input.trim().to_ascii_lowercase();
    Ok(input == "y" || input == "yes")
}

fn run_session(session: &mut QuizSession, bank: &BankState, store: &SavedStore) -> Result<()> {
    loop {
        print!("\n|> ");
        io::stdout().flush().context("Failed to flush stdout")?;

        let mut input = String::new();
        let read = stdin()
            .read_line(&mut input)
            .context("Failed to read line from stdin")?;
        if read == 0 {
            break Ok(());
        }
        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        match Commands::from_str(input) {
            Ok(Commands::Generate(category)) => {
                session.generate(bank, &category);
                render_quiz(session);
            }
            Ok(Commands::Regenerate) => {
                if session.regenerate(bank) {
                    render_quiz(session);
                } else {
                    println!("No category chosen yet. Use \\g <category> first.");
                }
            }
            Ok(Commands::Answer { question, option }) => {
                if session.is_empty() {
                    println!("No questions to display. Generate a set first.");
                } else if !session.select(question, option) {
                    println!(
                        "No question {} with an option '{}'.",
                        question + 1,
                        option_letter(option)
                    );
                }
            }
            Ok(Commands::Show) => render_quiz(session),
            Ok(Commands::CheckScore) => {
                if session.is_empty() {
                    println!("No questions to display. Generate a set first.");
                } else {
                    let score = session.reveal();
                    println!(
                        "You scored {} out of {} ({}%).",
                        score.correct,
                        score.total,
                        score.percent()
                    );
                    render_quiz(session);
                }
            }
            Ok(Commands::ClearAnswers) => {
                if session.is_empty() {
                    println!("No questions to display. Generate a set first.");
                } else {
                    session.clear_answers();
                    render_quiz(session);
                }
            }
            Ok(Commands::Save(index)) => match session.question(index) {
                Some(question) => {
                    if store.save(&question.question)? {
                        render_saved(store);
                    } else {
                        println!("Already in the saved list.");
                    }
                }
                None => println!("No question {} in the current quiz.", index + 1),
            },
            Ok(Commands::SavedList) => render_saved(store),
            Ok(Commands::ClearSaved) => {
                if confirm("Clear all saved questions?")? {
                    store.clear()?;
                    render_saved(store);
                }
            }
            Ok(Commands::Categories) => render_categories(bank),
            Ok(Commands::Help) => Commands::help(),
            Ok(Commands::Quit) => {
                println!("Quitting...");
                break Ok(());
            }
            Err(e) => eprintln!("Invalid command: {}. Type \\h for help.", e),
        }
    }
}

fn main() -> Result<()> {
    pretty_env_logger::init();
    let args = Args::parse();

    let bank = BankState::load(args.bank.as_deref());

    if args.list {
        match bank.bank() {
            Some(bank) => {
                let names: Vec<&str> = bank.iter().map(|(name, _)| name).collect();
                println!("Available categories: {}", names.join(", "));
            }
            None => println!("No categories available."),
        }
        return Ok(());
    }

    match bank.failure() {
        Some(message) => println!("Error loading questions: {}", message),
        None => {
            if let Some(loaded) = bank.bank() {
                let total: usize = loaded.iter().map(|(_, questions)| questions.len()).sum();
                println!(
                    "Loaded {} questions across {} categories.",
                    total,
                    loaded.iter().count()
                );
            }
        }
    }
    println!("Type '\\h' for commands.\n");

    let store = SavedStore::new(&args.saved);
    render_saved(&store);

    let mut session = QuizSession::new();
    run_session(&mut session, &bank, &store)?;

    Ok(())
}
