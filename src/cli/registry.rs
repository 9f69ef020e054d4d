use std::collections::HashMap;

use crate::cli::core::CommandResult;
use crate::cli::shell_context::ShellContext;

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

pub struct CommandEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub aliases: &'static [&'static str],
    pub handler: CommandHandler,
}

impl CommandEntry {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            aliases: &[],
            handler,
        }
    }

    /// Extra words that dispatch to this command (`ls` for `list`).
    pub fn with_aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    /// Usage text after the command word, e.g. `<id>` for `remove <id>`.
    pub fn arguments(&self) -> &'static str {
        self.usage
            .strip_prefix(self.name)
            .map(str::trim_start)
            .unwrap_or(self.usage)
    }
}

/// Commands in registration order, reachable by name or alias.
#[derive(Default)]
pub struct CommandRegistry {
    commands: Vec<CommandEntry>,
    index: HashMap<&'static str, usize>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `entry`. A second entry with the same name replaces the first;
    /// an alias never shadows an existing name.
    pub fn register(&mut self, entry: CommandEntry) {
        let slot = match self.index.get(entry.name) {
            Some(&slot) if self.commands[slot].name == entry.name => {
                self.commands[slot] = entry;
                slot
            }
            _ => {
                self.commands.push(entry);
                self.commands.len() - 1
            }
        };
        let entry = &self.commands[slot];
        self.index.insert(entry.name, slot);
        for alias in entry.aliases {
            self.index.entry(*alias).or_insert(slot);
        }
    }

    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        self.index.get(name).map(|&slot| &self.commands[slot])
    }

    pub fn list(&self) -> impl Iterator<Item = &CommandEntry> + '_ {
        self.commands.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.commands.iter().map(|entry| entry.name)
    }

    pub fn handler(&self, name: &str) -> Option<CommandHandler> {
        self.get(name).map(|entry| entry.handler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
        Ok(())
    }

    #[test]
    fn aliases_resolve_to_their_command() {
        let mut registry = CommandRegistry::new();
        registry.register(CommandEntry::new("list", "", "list", noop).with_aliases(&["ls"]));
        registry.register(CommandEntry::new("remove", "", "remove <id>", noop).with_aliases(&["rm"]));

        assert_eq!(registry.get("ls").map(|entry| entry.name), Some("list"));
        assert_eq!(registry.get("rm").map(|entry| entry.name), Some("remove"));
        assert!(registry.get("lst").is_none());
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["list", "remove"]);
    }

    #[test]
    fn alias_cannot_hijack_a_name() {
        let mut registry = CommandRegistry::new();
        registry.register(CommandEntry::new("clear", "", "clear", noop));
        registry.register(CommandEntry::new("filter", "", "filter", noop).with_aliases(&["clear"]));
        assert_eq!(registry.get("clear").map(|entry| entry.name), Some("clear"));
    }

    #[test]
    fn reregistering_replaces_in_place() {
        let mut registry = CommandRegistry::new();
        registry.register(CommandEntry::new("add", "old", "add", noop));
        registry.register(CommandEntry::new("list", "", "list", noop));
        registry.register(CommandEntry::new("add", "new", "add", noop));
        let descriptions: Vec<_> = registry.list().map(|entry| entry.description).collect();
        assert_eq!(descriptions, vec!["new", ""]);
    }

    #[test]
    fn arguments_drop_the_command_word() {
        let entry = CommandEntry::new("remove", "", "remove <id>", noop);
        assert_eq!(entry.arguments(), "<id>");
        assert_eq!(CommandEntry::new("list", "", "list", noop).arguments(), "");
    }
}
