use std::{
    borrow::Cow,
    fmt,
    io::{self, BufRead},
};

use colored::Colorize;
use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};
use shell_words::split;

use crate::cli::core::{CliError, CliMode, LoopControl, ShellContext};
use crate::cli::output::info as output_info;
use crate::cli::registry::CommandRegistry;

/// Setting this variable makes the shell read commands from stdin without
/// prompting.
pub const SCRIPT_ENV: &str = "DAILY_LEDGER_CLI_SCRIPT";

const KIND_WORDS: &[&str] = &["income", "expense"];
const EDIT_FIELDS: &[&str] = &[
    "type=income",
    "type=expense",
    "amount=",
    "date=today",
    "date=",
    "category=",
    "note=",
];

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;

    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    }
}

/// Runs one line; `false` once the shell should stop.
fn execute(context: &mut ShellContext, line: &str) -> bool {
    match context.process_line(line) {
        Ok(LoopControl::Continue) => context.running,
        Ok(LoopControl::Exit) => false,
        Err(err) => {
            context.report_error(err);
            context.running
        }
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(CommandHelper::new(&context.registry)));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

    while context.running {
        match editor.readline(&context.prompt()) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                editor.add_history_entry(trimmed).ok();
                if !execute(context, trimmed) {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                if context.confirm_exit()? {
                    break;
                }
            }
            Err(ReadlineError::Eof) => {
                output_info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    for line in io::stdin().lock().lines() {
        if !execute(context, &line?) {
            break;
        }
    }
    Ok(())
}

/// A word the shell accepts in command position.
struct CommandWord {
    word: &'static str,
    name: &'static str,
    arguments: &'static str,
}

/// Completes command words and their arguments, and hints at the usage
/// once a command has been typed.
struct CommandHelper {
    words: Vec<CommandWord>,
    names: Vec<&'static str>,
}

impl CommandHelper {
    fn new(registry: &CommandRegistry) -> Self {
        let mut words = Vec::new();
        for entry in registry.list() {
            let spellings = std::iter::once(entry.name).chain(entry.aliases.iter().copied());
            for word in spellings {
                words.push(CommandWord {
                    word,
                    name: entry.name,
                    arguments: entry.arguments(),
                });
            }
        }
        words.sort_by(|a, b| a.word.cmp(b.word));
        let mut names: Vec<_> = registry.names().collect();
        names.sort_unstable();
        Self { words, names }
    }

    fn lookup(&self, word: &str) -> Option<&CommandWord> {
        self.words
            .iter()
            .find(|known| known.word.eq_ignore_ascii_case(word))
    }

    /// Replacement start and candidates for the text before the cursor.
    fn candidates(&self, before_cursor: &str) -> (usize, Vec<String>) {
        let start = before_cursor
            .rfind(char::is_whitespace)
            .map(|idx| idx + 1)
            .unwrap_or(0);
        let needle = before_cursor[start..].to_lowercase();
        let typed: Vec<&str> = before_cursor[..start].split_whitespace().collect();

        let pool: Vec<&str> = match typed.split_first() {
            None => self.words.iter().map(|known| known.word).collect(),
            Some((command, args)) => match self.lookup(command) {
                Some(known) => self.argument_choices(known.name, args.len()),
                None => Vec::new(),
            },
        };
        let matches = pool
            .into_iter()
            .filter(|choice| choice.starts_with(&needle))
            .map(str::to_string)
            .collect();
        (start, matches)
    }

    fn argument_choices(&self, command: &str, index: usize) -> Vec<&'static str> {
        match (command, index) {
            ("add", 0) => KIND_WORDS.to_vec(),
            ("add", 2) => vec!["today"],
            ("edit", n) if n >= 1 => EDIT_FIELDS.to_vec(),
            ("filter", 0) => vec!["clear", "-"],
            ("filter", 1) => vec!["-"],
            ("help", 0) => self.names.clone(),
            _ => Vec::new(),
        }
    }

    /// Usage of the command once its word and a space have been typed.
    fn usage_hint(&self, line: &str, pos: usize) -> Option<String> {
        if pos < line.len() {
            return None;
        }
        let command = line.trim_start().strip_suffix(' ')?;
        if command.is_empty() || command.contains(char::is_whitespace) {
            return None;
        }
        self.lookup(command)
            .map(|known| known.arguments)
            .filter(|arguments| !arguments.is_empty())
            .map(str::to_string)
    }
}

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, matches) = self.candidates(&line[..pos]);
        let pairs = matches
            .into_iter()
            .map(|choice| Pair {
                display: choice.clone(),
                replacement: choice,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &ReadlineContext<'_>) -> Option<String> {
        self.usage_hint(line, pos)
    }
}

impl Highlighter for CommandHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(hint.dimmed().to_string())
    }
}

impl Validator for CommandHelper {}

pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, ParseError> {
    split(input).map_err(|err| ParseError {
        message: err.to_string(),
    })
}

#[derive(Debug)]
pub(crate) struct ParseError {
    message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}
