//! Benchmark definitions
//!
//! A [`BenchmarkFunction`] is one comparable operation expressed once per
//! engine. Templates use `{placeholder}` tokens that a suite binds to its
//! column names; `{{` and `}}` produce literal braces.

use std::collections::BTreeMap;

use crate::engines::EngineId;

/// How a function is expressed on one engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineTemplate {
    /// SQL expression template with `{placeholder}` tokens
    Sql(String),
    /// The engine has no equivalent; the cell is reported as unsupported
    Unsupported,
}

/// One comparable operation with an equivalent expression per engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkFunction {
    name: String,
    templates: BTreeMap<EngineId, EngineTemplate>,
}

impl BenchmarkFunction {
    /// Start a definition with no engine entries
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            templates: BTreeMap::new(),
        }
    }

    /// Same expression on every engine
    pub fn portable(name: impl Into<String>, template: impl Into<String>) -> Self {
        let template = template.into();
        EngineId::ALL
            .iter()
            .fold(Self::new(name), |f, engine| f.on(*engine, template.clone()))
    }

    /// DataFusion and DuckDB spell the operation differently
    pub fn dialects(
        name: impl Into<String>,
        datafusion: impl Into<String>,
        duckdb: impl Into<String>,
    ) -> Self {
        Self::new(name)
            .on(EngineId::DataFusion, datafusion)
            .on(EngineId::DuckDb, duckdb)
    }

    pub fn on(mut self, engine: EngineId, template: impl Into<String>) -> Self {
        self.templates
            .insert(engine, EngineTemplate::Sql(template.into()));
        self
    }

    pub fn unsupported_on(mut self, engine: EngineId) -> Self {
        self.templates.insert(engine, EngineTemplate::Unsupported);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Entry for an engine; `None` means the definition never mentioned it
    pub fn template(&self, engine: EngineId) -> Option<&EngineTemplate> {
        self.templates.get(&engine)
    }

    /// First engine in [`EngineId::ALL`] without an entry
    pub fn missing_engine(&self) -> Option<EngineId> {
        EngineId::ALL
            .iter()
            .copied()
            .find(|engine| !self.templates.contains_key(engine))
    }
}

/// Substitute `{placeholder}` tokens using `bindings` (placeholder → column).
///
/// Returns the reason as a string on failure; callers wrap it with context.
pub fn render_template(
    template: &str,
    bindings: &[(String, String)],
) -> std::result::Result<String, String> {
    let mut out = String::with_capacity(template.len() + 16);
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '{' => {
                let mut token = String::new();
                let mut closed = false;
                for next in chars.by_ref() {
                    if next == '}' {
                        closed = true;
                        break;
                    }
                    token.push(next);
                }
                if !closed {
                    return Err(format!("unterminated placeholder '{{{}'", token));
                }
                let token = token.trim();
                match bindings.iter().find(|(name, _)| name == token) {
                    Some((_, column)) => out.push_str(column),
                    None => {
                        return Err(format!(
                            "placeholder '{{{}}}' has no corresponding column",
                            token
                        ))
                    }
                }
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            other => out.push(other),
        }
    }

    Ok(out)
}
