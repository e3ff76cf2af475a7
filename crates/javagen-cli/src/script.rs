//! JSON body scripts
//!
//! A script is the sequence of writer calls a generator would make for one
//! file, for example:
//!
//! ```json
//! [
//!   {"step": "package", "name": "com.acme"},
//!   {"step": "imports"},
//!   {"step": "println", "text": "public class Book extends %s {",
//!    "args": [{"type": "org.jooq.impl.TableImpl<com.acme.BookRecord>"}]},
//!   {"step": "serial"},
//!   {"step": "println", "text": "}"}
//! ]
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use javagen_codegen::{Arg, JavaWriter};
use serde::Deserialize;
use tracing::debug;

/// One writer call
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    Package {
        name: String,
    },
    Imports,
    Serial,
    Javadoc {
        text: String,
        #[serde(default)]
        args: Vec<ScriptArg>,
    },
    Header {
        text: String,
        #[serde(default)]
        args: Vec<ScriptArg>,
    },
    Override {
        #[serde(default = "default_true")]
        when: bool,
        /// Precede the annotation with a blank line
        #[serde(default)]
        inherit: bool,
    },
    Println {
        #[serde(default)]
        text: String,
        #[serde(default)]
        args: Vec<ScriptArg>,
    },
    Print {
        text: String,
        #[serde(default)]
        args: Vec<ScriptArg>,
    },
}

/// A template argument; objects are type references
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ScriptArg {
    Reference {
        #[serde(rename = "type")]
        type_name: String,
        #[serde(default = "default_keep")]
        keep: usize,
    },
    List(Vec<ScriptArg>),
    Bool(bool),
    Int(i64),
    Text(String),
}

fn default_true() -> bool {
    true
}

fn default_keep() -> usize {
    1
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Script {
    pub steps: Vec<Step>,
}

impl Script {
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Failed to parse body script")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read script: {:?}", path))?;
        Self::from_json(&content).with_context(|| format!("Invalid script: {:?}", path))
    }

    /// Replay every step against the writer
    pub fn apply(&self, out: &mut JavaWriter) {
        debug!("Applying {} step(s) to {}", self.steps.len(), out.class_name());
        for step in &self.steps {
            step.apply(out);
        }
    }
}

impl Step {
    pub fn apply(&self, out: &mut JavaWriter) {
        match self {
            Step::Package { name } => {
                out.print_package_specification(name);
            }
            Step::Imports => {
                out.print_imports();
            }
            Step::Serial => {
                out.print_serial();
            }
            Step::Javadoc { text, args } => {
                let args = resolve_args(out, args);
                out.javadoc(text, &args);
            }
            Step::Header { text, args } => {
                let args = resolve_args(out, args);
                out.header(text, &args);
            }
            Step::Override { when, inherit } => {
                if *inherit {
                    out.override_inherit_if(*when);
                } else {
                    out.print_override_if(*when);
                }
            }
            Step::Println { text, args } => {
                let args = resolve_args(out, args);
                out.println(text, &args);
            }
            Step::Print { text, args } => {
                let args = resolve_args(out, args);
                out.print(text, &args);
            }
        }
    }
}

/// Turn script arguments into template arguments, resolving references in order
fn resolve_args(out: &mut JavaWriter, args: &[ScriptArg]) -> Vec<Arg> {
    args.iter().map(|arg| resolve_arg(out, arg)).collect()
}

fn resolve_arg(out: &mut JavaWriter, arg: &ScriptArg) -> Arg {
    match arg {
        ScriptArg::Reference { type_name, keep } => Arg::Str(out.reference_keep(type_name, *keep)),
        ScriptArg::List(items) => Arg::List(resolve_args(out, items)),
        ScriptArg::Bool(b) => Arg::Bool(*b),
        ScriptArg::Int(i) => Arg::Int(*i),
        ScriptArg::Text(s) => Arg::Str(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use javagen_codegen::WriterConfig;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_steps() {
        let script = Script::from_json(
            r#"[
                {"step": "package", "name": "com.acme"},
                {"step": "imports"},
                {"step": "override"},
                {"step": "override", "when": false, "inherit": true},
                {"step": "println", "text": "%s %s %s", "args": [
                    {"type": "com.acme.Table.TABLE.ID", "keep": 3},
                    ["a", 1],
                    true
                ]}
            ]"#,
        )
        .unwrap();

        assert_eq!(
            script.steps,
            vec![
                Step::Package {
                    name: "com.acme".to_string()
                },
                Step::Imports,
                Step::Override {
                    when: true,
                    inherit: false
                },
                Step::Override {
                    when: false,
                    inherit: true
                },
                Step::Println {
                    text: "%s %s %s".to_string(),
                    args: vec![
                        ScriptArg::Reference {
                            type_name: "com.acme.Table.TABLE.ID".to_string(),
                            keep: 3
                        },
                        ScriptArg::List(vec![
                            ScriptArg::Text("a".to_string()),
                            ScriptArg::Int(1)
                        ]),
                        ScriptArg::Bool(true),
                    ]
                },
            ]
        );
    }

    #[test]
    fn test_reference_keep_defaults_to_one() {
        let arg: ScriptArg = serde_json::from_str(r#"{"type": "java.util.List"}"#).unwrap();
        assert_eq!(
            arg,
            ScriptArg::Reference {
                type_name: "java.util.List".to_string(),
                keep: 1
            }
        );
    }

    #[test]
    fn test_unknown_step_is_rejected() {
        assert!(Script::from_json(r#"[{"step": "launch"}]"#).is_err());
    }

    #[test]
    fn test_apply_resolves_references() {
        let script = Script::from_json(
            r#"[
                {"step": "package", "name": "com.acme"},
                {"step": "imports"},
                {"step": "println", "text": "class Keys {"},
                {"step": "println", "text": "%s<%s> keys;", "args": [
                    {"type": "java.util.List"},
                    {"type": "org.jooq.UniqueKey"}
                ]},
                {"step": "println", "text": "}"}
            ]"#,
        )
        .unwrap();

        let mut out = JavaWriter::new("Keys.java", &WriterConfig::default()).unwrap();
        script.apply(&mut out);

        assert_eq!(
            out.render().text(),
            "package com.acme;\n\
             \n\
             import java.util.List;\n\
             \n\
             import org.jooq.UniqueKey;\n\
             \n\
             class Keys {\n    \
             List<UniqueKey> keys;\n\
             }\n"
        );
    }
}
