//! Session: applies script operations to a family registry

use tracing::{debug, instrument, warn};

use crate::application::registry::FamilyRegistry;
use crate::application::script::{Operation, ScriptLine, ScriptParser};
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{DomainError, GenealogyTree, TreeOptions, TreeRender};

/// Result of a successfully applied operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The registry or a tree was changed
    Applied(String),
    /// Read-only output (search result, listing, rendering)
    Output(String),
}

/// Result of one script line when running with `keep_going`.
#[derive(Debug)]
pub struct LineReport {
    pub line: usize,
    pub result: ApplicationResult<Outcome>,
}

/// Holds the registry for the lifetime of a run or a shell.
pub struct Session {
    registry: FamilyRegistry,
    parser: ScriptParser,
}

impl Session {
    pub fn new(options: TreeOptions) -> ApplicationResult<Self> {
        Ok(Self {
            registry: FamilyRegistry::new(options),
            parser: ScriptParser::new()?,
        })
    }

    pub fn registry(&self) -> &FamilyRegistry {
        &self.registry
    }

    pub fn current_tree(&self) -> ApplicationResult<&GenealogyTree> {
        self.registry.current()
    }

    /// Parses and applies a single line, as typed in the shell.
    pub fn execute_line(&mut self, line: usize, text: &str) -> ApplicationResult<Option<Outcome>> {
        match self.parser.parse_line(line, text)? {
            Some(operation) => self.apply(&operation).map(Some),
            None => Ok(None),
        }
    }

    /// Runs a whole script.
    ///
    /// Syntax errors abort before anything is applied. Without `keep_going`
    /// the first failing operation aborts with its line number; with it every
    /// line is applied and reported.
    #[instrument(level = "debug", skip(self, script))]
    pub fn run(&mut self, script: &str, keep_going: bool) -> ApplicationResult<Vec<LineReport>> {
        let lines = self.parser.parse_script(script)?;
        debug!("run: {} operations", lines.len());

        let mut reports = Vec::with_capacity(lines.len());
        for ScriptLine { line, operation } in lines {
            match self.apply(&operation) {
                Err(e) if !keep_going => {
                    return Err(ApplicationError::Line {
                        line,
                        source: Box::new(e),
                    });
                }
                result => {
                    if let Err(e) = &result {
                        warn!("line {}: {}", line, e);
                    }
                    reports.push(LineReport { line, result });
                }
            }
        }
        Ok(reports)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn apply(&mut self, operation: &Operation) -> ApplicationResult<Outcome> {
        match operation {
            Operation::CreateTree { family } => {
                self.registry.create(family)?;
                Ok(Outcome::Applied(format!("created family tree {}", family.trim())))
            }
            Operation::SwitchTree { family } => {
                self.registry.switch(family)?;
                Ok(Outcome::Applied(format!("switched to family tree {}", family)))
            }
            Operation::RemoveTree { family } => {
                self.registry.remove(family)?;
                Ok(Outcome::Applied(format!("removed family tree {}", family)))
            }
            Operation::ListTrees => {
                let listing = self
                    .registry
                    .names()
                    .map(|name| {
                        if Some(name) == self.registry.current_name() {
                            format!("* {}", name)
                        } else {
                            format!("  {}", name)
                        }
                    })
                    .collect::<Vec<_>>()
                    .join("\n");
                Ok(Outcome::Output(listing))
            }
            Operation::AddMember { parent, name, details } => {
                require_name(name, "member name")?;
                self.registry.current_mut()?.add_member(parent, name, details)?;
                if parent.is_empty() {
                    Ok(Outcome::Applied(format!("added root member {}", name)))
                } else {
                    Ok(Outcome::Applied(format!("added member {} to {}", name, parent)))
                }
            }
            Operation::AddSpouse { member, spouse, details } => {
                require_name(member, "member name")?;
                require_name(spouse, "spouse name")?;
                self.registry.current_mut()?.add_spouse(member, spouse, details)?;
                Ok(Outcome::Applied(format!("added spouse {} to {}", spouse, member)))
            }
            Operation::AddSibling { target, name, details } => {
                require_name(target, "target name")?;
                require_name(name, "sibling name")?;
                self.registry.current_mut()?.add_sibling(target, name, details)?;
                Ok(Outcome::Applied(format!("added sibling {} of {}", name, target)))
            }
            Operation::ModifyMember { name, details } => {
                self.registry.current_mut()?.modify_member(name, details)?;
                Ok(Outcome::Applied(format!("updated {}: {}", name, details)))
            }
            Operation::ModifySpouse { member, spouse, details } => {
                self.registry
                    .current_mut()?
                    .modify_spouse_details(member, spouse, details)?;
                Ok(Outcome::Applied(format!(
                    "updated spouse {} of {}: {}",
                    spouse, member, details
                )))
            }
            Operation::RemoveSpouse { member, spouse } => {
                self.registry.current_mut()?.remove_spouse(member, spouse)?;
                Ok(Outcome::Applied(format!("removed spouse {} from {}", spouse, member)))
            }
            Operation::Find { name } => {
                let tree = self.registry.current()?;
                describe_member(tree, name).map(Outcome::Output)
            }
            Operation::Show => {
                let tree = self.registry.current()?;
                Ok(Outcome::Output(tree.to_tree_string().to_string()))
            }
        }
    }
}

fn require_name(value: &str, what: &'static str) -> ApplicationResult<()> {
    if value.trim().is_empty() {
        return Err(ApplicationError::EmptyName(what));
    }
    Ok(())
}

fn describe_member(tree: &GenealogyTree, name: &str) -> ApplicationResult<String> {
    let Some((id, person)) = tree.find_member(name).and_then(|id| tree.get(id).map(|p| (id, p)))
    else {
        return Err(DomainError::MemberNotFound(name.to_string()).into());
    };

    let mut text = format!("name: {}\ndetails: {}\n", person.name(), person.details());
    let spouses: Vec<_> = tree.spouses_of(id).collect();
    if spouses.is_empty() {
        text.push_str("spouses: none");
    } else {
        text.push_str("spouses:");
        for (_, spouse) in spouses {
            text.push_str(&format!("\n - {}: {}", spouse.name(), spouse.details()));
        }
    }
    Ok(text)
}
