//! Capability-tagged plugin activations.
//!
//! Plugins are applied in declared order to a shared build graph. Each
//! activation consumes capabilities set up by earlier activations
//! (`requires`) and contributes its own (`provides`). The built-in registry
//! covers the plugins a Flutter Android target activates; anything else has
//! to declare what it provides.

use petgraph::algo::toposort;
use petgraph::graph::DiGraph;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::validate::ValidationError;

/// Id of the Flutter Gradle Plugin.
pub const FLUTTER_PLUGIN_ID: &str = "dev.flutter.flutter-gradle-plugin";

/// A plugin activation from `[[plugins]]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginRef {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub provides: Vec<String>,
}

/// A built-in plugin record.
#[derive(Debug)]
pub struct PluginSpec {
    pub id: &'static str,
    pub aliases: &'static [&'static str],
    pub requires: &'static [&'static str],
    pub provides: &'static [&'static str],
}

pub const BUILTIN_PLUGINS: &[PluginSpec] = &[
    PluginSpec {
        id: "com.android.application",
        aliases: &[],
        requires: &[],
        provides: &["android"],
    },
    PluginSpec {
        id: "kotlin-android",
        aliases: &["org.jetbrains.kotlin.android"],
        requires: &["android"],
        provides: &["kotlin"],
    },
    PluginSpec {
        id: FLUTTER_PLUGIN_ID,
        aliases: &[],
        requires: &["android", "kotlin"],
        provides: &["flutter"],
    },
    PluginSpec {
        id: "com.google.gms.google-services",
        aliases: &[],
        requires: &["android"],
        provides: &["google-services"],
    },
];

/// Look up a built-in plugin by id or alias.
pub fn builtin(id: &str) -> Option<&'static PluginSpec> {
    BUILTIN_PLUGINS
        .iter()
        .find(|p| p.id == id || p.aliases.contains(&id))
}

/// One activation with its capabilities resolved against the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activation {
    /// Registry id, so aliases compare equal.
    pub canonical_id: String,
    /// Id as written in the descriptor.
    pub declared_id: String,
    pub requires: Vec<String>,
    pub provides: Vec<String>,
}

impl PluginRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: None,
            requires: Vec::new(),
            provides: Vec::new(),
        }
    }

    /// Resolve this reference to an activation, or `None` if the id is
    /// unknown and declares no capabilities of its own.
    pub fn activation(&self) -> Option<Activation> {
        let spec = builtin(&self.id);
        if spec.is_none() && self.provides.is_empty() {
            return None;
        }
        let mut requires: Vec<String> = spec
            .map(|s| s.requires.iter().map(|r| r.to_string()).collect())
            .unwrap_or_default();
        let mut provides: Vec<String> = spec
            .map(|s| s.provides.iter().map(|p| p.to_string()).collect())
            .unwrap_or_default();
        for r in &self.requires {
            if !requires.contains(r) {
                requires.push(r.clone());
            }
        }
        for p in &self.provides {
            if !provides.contains(p) {
                provides.push(p.clone());
            }
        }
        Some(Activation {
            canonical_id: spec.map(|s| s.id.to_string()).unwrap_or_else(|| self.id.clone()),
            declared_id: self.id.clone(),
            requires,
            provides,
        })
    }
}

/// Check that every activation resolves, appears once, and only requires
/// capabilities provided by an earlier activation.
///
/// `needs_flutter` is set when the descriptor has a `[flutter]` section.
pub fn check_activations(plugins: &[PluginRef], needs_flutter: bool) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut activations: Vec<Activation> = Vec::new();
    let mut seen = BTreeSet::new();

    for plugin in plugins {
        let Some(activation) = plugin.activation() else {
            errors.push(ValidationError::UnresolvedReference {
                kind: "plugin".into(),
                name: plugin.id.clone(),
                detail: "not a known plugin and declares no `provides` capabilities".into(),
            });
            continue;
        };
        if !seen.insert(activation.canonical_id.clone()) {
            errors.push(ValidationError::Inconsistent {
                field: "plugins".into(),
                detail: format!("`{}` is activated more than once", plugin.id),
            });
            continue;
        }
        activations.push(activation);
    }

    let mut provided: BTreeSet<&str> = BTreeSet::new();
    for (i, activation) in activations.iter().enumerate() {
        for capability in &activation.requires {
            if provided.contains(capability.as_str()) {
                continue;
            }
            let later = activations[i + 1..]
                .iter()
                .find(|a| a.provides.contains(capability));
            match later {
                Some(provider) => {
                    let suggested = suggested_order(&activations)
                        .map(|order| order.join(", "))
                        .unwrap_or_else(|| "none (capabilities form a cycle)".to_string());
                    errors.push(ValidationError::PluginOrder {
                        plugin: activation.declared_id.clone(),
                        capability: capability.clone(),
                        provider: provider.declared_id.clone(),
                        suggested,
                    });
                }
                None => errors.push(ValidationError::UnresolvedReference {
                    kind: "capability".into(),
                    name: capability.clone(),
                    detail: format!(
                        "required by plugin `{}` but no activated plugin provides it",
                        activation.declared_id
                    ),
                }),
            }
        }
        provided.extend(activation.provides.iter().map(|p| p.as_str()));
    }

    if needs_flutter && !provided.contains("flutter") {
        errors.push(ValidationError::UnresolvedReference {
            kind: "plugin".into(),
            name: FLUTTER_PLUGIN_ID.into(),
            detail: "the `[flutter]` section needs the Flutter Gradle Plugin activated".into(),
        });
    }

    errors
}

/// An activation order satisfying every `requires` edge, or `None` on a cycle.
pub fn suggested_order(activations: &[Activation]) -> Option<Vec<String>> {
    let mut graph = DiGraph::<usize, ()>::new();
    let nodes: Vec<_> = (0..activations.len()).map(|i| graph.add_node(i)).collect();
    for (i, consumer) in activations.iter().enumerate() {
        for capability in &consumer.requires {
            for (j, provider) in activations.iter().enumerate() {
                if i != j && provider.provides.contains(capability) {
                    graph.add_edge(nodes[j], nodes[i], ());
                }
            }
        }
    }
    let order = toposort(&graph, None).ok()?;
    Some(
        order
            .into_iter()
            .map(|n| activations[graph[n]].declared_id.clone())
            .collect(),
    )
}
