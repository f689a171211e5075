//! rustyline helper: completion, highlighting and hints for REPL commands.

use crate::commands::{COMMANDS, DEFAULT_SOURCES_PRESET};
use colored::Colorize;
use propassist_core::knowledge_source::KnowledgeSource;
use propassist_core::state::PipelineStage;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};
use std::borrow::Cow::{self, Borrowed, Owned};

#[derive(Clone)]
pub struct CliHelper {
    commands: Vec<String>,
    stages: Vec<String>,
    sources: Vec<String>,
}

impl CliHelper {
    pub fn new() -> Self {
        Self {
            commands: COMMANDS.iter().map(|cmd| cmd.to_string()).collect(),
            stages: PipelineStage::all().map(|stage| stage.to_string()).collect(),
            sources: std::iter::once(DEFAULT_SOURCES_PRESET.to_string())
                .chain(KnowledgeSource::selectable().map(|source| source.to_string()))
                .collect(),
        }
    }

    /// Candidates for the word ending at the cursor, with the word's start offset.
    fn candidates(&self, line: &str) -> (usize, Vec<&String>) {
        let word_start = line.rfind(char::is_whitespace).map_or(0, |i| i + 1);
        let word = &line[word_start..];
        let first = line.split_whitespace().next().unwrap_or("");
        let position = line[..word_start].split_whitespace().count();

        let pool = match (first, position) {
            (_, 0) if line.starts_with('/') => &self.commands,
            ("/model" | "/prompt" | "/models", 1) => &self.stages,
            ("/sources", p) if p >= 1 => &self.sources,
            _ => return (word_start, Vec::new()),
        };
        let matches = pool.iter().filter(|c| c.starts_with(word)).collect();
        (word_start, matches)
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, matches) = self.candidates(&line[..pos]);
        let pairs = matches
            .into_iter()
            .map(|candidate| Pair {
                display: candidate.clone(),
                replacement: candidate.clone(),
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];
        if line.is_empty() {
            return None;
        }
        let (start, matches) = self.candidates(line);
        let word = &line[start..];
        match matches.as_slice() {
            [only] if only.len() > word.len() => Some(only[word.len()..].to_string()),
            _ => None,
        }
    }
}

impl Validator for CliHelper {}
