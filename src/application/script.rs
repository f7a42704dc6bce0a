//! Line-oriented command script
//!
//! One operation per line, tokens separated by whitespace. Double quotes group
//! a token that contains spaces (`\"` and `\\` escape inside quotes). An
//! unquoted token starting with `#` ends the line. Empty parent names for
//! `add` are written as `-` or `""`.
//!
//! ```text
//! create Smith
//! add Smith John "b. 1920"
//! spouse John Mary
//! sibling John Paul
//! modify John "b. 1921"
//! modify-spouse John Mary "née Brown"
//! remove-spouse John Mary
//! find John
//! show
//! ```

use regex::Regex;

use crate::application::{ApplicationError, ApplicationResult};

/// A parsed script command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    CreateTree { family: String },
    SwitchTree { family: String },
    RemoveTree { family: String },
    ListTrees,
    AddMember { parent: String, name: String, details: String },
    AddSpouse { member: String, spouse: String, details: String },
    AddSibling { target: String, name: String, details: String },
    ModifyMember { name: String, details: String },
    ModifySpouse { member: String, spouse: String, details: String },
    RemoveSpouse { member: String, spouse: String },
    Find { name: String },
    Show,
}

/// A command together with its 1-based source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    pub line: usize,
    pub operation: Operation,
}

/// Tokenizes and parses script text.
pub struct ScriptParser {
    token_regex: Regex,
}

impl ScriptParser {
    pub fn new() -> ApplicationResult<Self> {
        let token_regex = Regex::new(r#""((?:[^"\\]|\\.)*)"|(\S+)"#).map_err(|e| {
            ApplicationError::OperationFailed {
                context: "compile script token pattern".to_string(),
                source: Box::new(e),
            }
        })?;
        Ok(Self { token_regex })
    }

    /// Parses a whole script; the first malformed line aborts.
    pub fn parse_script(&self, text: &str) -> ApplicationResult<Vec<ScriptLine>> {
        let mut lines = Vec::new();
        for (idx, raw) in text.lines().enumerate() {
            let line = idx + 1;
            if let Some(operation) = self.parse_line(line, raw)? {
                lines.push(ScriptLine { line, operation });
            }
        }
        Ok(lines)
    }

    /// Parses one line; `None` for blank and comment lines.
    pub fn parse_line(&self, line: usize, text: &str) -> ApplicationResult<Option<Operation>> {
        let tokens = self.tokenize(line, text)?;
        let Some((verb, args)) = tokens.split_first() else {
            return Ok(None);
        };

        let err = |message: String| ApplicationError::Script { line, message };
        let arity = |min: usize, max: usize, usage: &str| {
            if args.len() < min || args.len() > max {
                Err(err(format!("usage: {}", usage)))
            } else {
                Ok(())
            }
        };
        let arg = |i: usize| args.get(i).cloned().unwrap_or_default();

        let operation = match verb.to_lowercase().as_str() {
            "create" => {
                arity(1, 1, "create <family>")?;
                Operation::CreateTree { family: arg(0) }
            }
            "switch" => {
                arity(1, 1, "switch <family>")?;
                Operation::SwitchTree { family: arg(0) }
            }
            "drop" => {
                arity(1, 1, "drop <family>")?;
                Operation::RemoveTree { family: arg(0) }
            }
            "trees" => {
                arity(0, 0, "trees")?;
                Operation::ListTrees
            }
            "add" => {
                arity(2, 3, "add <parent|-> <name> [details]")?;
                let parent = arg(0);
                Operation::AddMember {
                    parent: if parent == "-" { String::new() } else { parent },
                    name: arg(1),
                    details: arg(2),
                }
            }
            "spouse" => {
                arity(2, 3, "spouse <member> <spouse> [details]")?;
                Operation::AddSpouse {
                    member: arg(0),
                    spouse: arg(1),
                    details: arg(2),
                }
            }
            "sibling" => {
                arity(2, 3, "sibling <target> <name> [details]")?;
                Operation::AddSibling {
                    target: arg(0),
                    name: arg(1),
                    details: arg(2),
                }
            }
            "modify" => {
                arity(2, 2, "modify <name> <details>")?;
                Operation::ModifyMember {
                    name: arg(0),
                    details: arg(1),
                }
            }
            "modify-spouse" => {
                arity(3, 3, "modify-spouse <member> <spouse> <details>")?;
                Operation::ModifySpouse {
                    member: arg(0),
                    spouse: arg(1),
                    details: arg(2),
                }
            }
            "remove-spouse" => {
                arity(2, 2, "remove-spouse <member> <spouse>")?;
                Operation::RemoveSpouse {
                    member: arg(0),
                    spouse: arg(1),
                }
            }
            "find" => {
                arity(1, 1, "find <name>")?;
                Operation::Find { name: arg(0) }
            }
            "show" => {
                arity(0, 0, "show")?;
                Operation::Show
            }
            other => return Err(err(format!("unknown command: {}", other))),
        };
        Ok(Some(operation))
    }

    fn tokenize(&self, line: usize, text: &str) -> ApplicationResult<Vec<String>> {
        let mut tokens = Vec::new();
        for caps in self.token_regex.captures_iter(text) {
            if let Some(quoted) = caps.get(1) {
                tokens.push(unescape(quoted.as_str()));
            } else if let Some(bare) = caps.get(2) {
                let bare = bare.as_str();
                if bare.starts_with('#') {
                    break;
                }
                if bare.starts_with('"') {
                    return Err(ApplicationError::Script {
                        line,
                        message: "unterminated quote".to_string(),
                    });
                }
                tokens.push(bare.to_string());
            }
        }
        Ok(tokens)
    }
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}
