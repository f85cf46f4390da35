//! Formatter registration for a host debugger.
//!
//! Every decodable classification gets a synthetic-children hook and a
//! summary hook keyed by its name pattern, all grouped in one category.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::classify::ArrayClassification;
use crate::config::InspectConfig;

/// What a registered hook produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HookKind {
    Summary,
    Synthetic,
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookKind::Summary => f.write_str("summary"),
            HookKind::Synthetic => f.write_str("synthetic"),
        }
    }
}

/// One `(pattern, hook)` pair within a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatterRegistration {
    pub classification: ArrayClassification,
    pub pattern: String,
    pub hook: HookKind,
    pub category: String,
}

impl FormatterRegistration {
    /// LLDB command installing this hook.
    pub fn lldb_command(&self, lookup_module: &str) -> String {
        match self.hook {
            HookKind::Synthetic => format!(
                "type synthetic add -l {}.synthetic_lookup -x \"{}\" --category {}",
                lookup_module, self.pattern, self.category
            ),
            HookKind::Summary => format!(
                "type summary add -F {}.summary_lookup -e -x -h \"{}\" --category {}",
                lookup_module, self.pattern, self.category
            ),
        }
    }
}

/// All hooks for the decodable classifications.
pub fn registrations(config: &InspectConfig) -> Vec<FormatterRegistration> {
    let mut out = Vec::with_capacity(ArrayClassification::KNOWN.len() * 2);
    for class in ArrayClassification::KNOWN {
        let Some(re) = class.pattern() else {
            continue;
        };
        for hook in [HookKind::Synthetic, HookKind::Summary] {
            out.push(FormatterRegistration {
                classification: class,
                pattern: re.as_str().to_string(),
                hook,
                category: config.category.clone(),
            });
        }
    }
    out
}

/// LLDB commands registering every hook and enabling the category.
pub fn lldb_commands(config: &InspectConfig) -> Vec<String> {
    let mut commands: Vec<String> = registrations(config)
        .iter()
        .map(|r| r.lldb_command(&config.lookup_module))
        .collect();
    commands.push(format!("type category enable {}", config.category));
    commands
}
