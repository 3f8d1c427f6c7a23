use std::collections::HashMap;

use super::ConsoleError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec<C> {
    name: String,
    help: String,
    command: C,
}

impl<C: Copy> CommandSpec<C> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    pub fn command(&self) -> C {
        self.command
    }
}

/// Name-to-command table for a console.
///
/// Names match exactly and case-sensitively. Help output follows
/// registration order.
#[derive(Debug, Clone)]
pub struct ConsoleCommandRegistry<C> {
    specs: Vec<CommandSpec<C>>,
    lookup_by_name: HashMap<String, usize>,
}

impl<C: Copy> Default for ConsoleCommandRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Copy> ConsoleCommandRegistry<C> {
    pub fn new() -> Self {
        Self {
            specs: Vec::new(),
            lookup_by_name: HashMap::new(),
        }
    }

    pub fn register(
        &mut self,
        name: impl Into<String>,
        help: impl Into<String>,
        command: C,
    ) -> Result<(), ConsoleError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ConsoleError::EmptyCommandName);
        }
        if self.lookup_by_name.contains_key(&name) {
            return Err(ConsoleError::DuplicateCommand(name));
        }

        self.lookup_by_name.insert(name.clone(), self.specs.len());
        self.specs.push(CommandSpec {
            name,
            help: help.into(),
            command,
        });
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<&CommandSpec<C>> {
        let index = self.lookup_by_name.get(name)?;
        self.specs.get(*index)
    }

    /// Resolves the first whitespace-separated token of a submitted line.
    /// Trailing tokens are ignored; an empty line resolves nothing.
    pub fn resolve_line(&self, raw_line: &str) -> Option<C> {
        let name = raw_line.split_whitespace().next().unwrap_or("");
        self.lookup(name).map(CommandSpec::command)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn iter_specs_in_order(&self) -> impl Iterator<Item = &CommandSpec<C>> {
        self.specs.iter()
    }
}
