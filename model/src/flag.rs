use crate::OptionValue;
use serde::{Deserialize, Serialize};

/// The value type a create-flag accepts.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlagKind {
    String,
    Int,
    Bool,
    StringSlice,
}

/// Describes one option that a driver accepts at creation time.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flag {
    pub name: String,
    pub kind: FlagKind,
    /// The declared default. Flags that declare none are treated as the boolean `false`.
    pub default: Option<OptionValue>,
    pub usage: String,
    pub env_var: Option<String>,
}

impl Flag {
    fn new<S: Into<String>>(name: S, kind: FlagKind) -> Self {
        Self {
            name: name.into(),
            kind,
            default: None,
            usage: String::new(),
            env_var: None,
        }
    }

    pub fn string<S: Into<String>>(name: S) -> Self {
        Self::new(name, FlagKind::String)
    }

    pub fn int<S: Into<String>>(name: S) -> Self {
        Self::new(name, FlagKind::Int)
    }

    pub fn bool<S: Into<String>>(name: S) -> Self {
        Self::new(name, FlagKind::Bool)
    }

    pub fn string_slice<S: Into<String>>(name: S) -> Self {
        Self::new(name, FlagKind::StringSlice)
    }

    pub fn with_default<V: Into<OptionValue>>(mut self, default: V) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_usage<S: Into<String>>(mut self, usage: S) -> Self {
        self.usage = usage.into();
        self
    }

    pub fn with_env_var<S: Into<String>>(mut self, env_var: S) -> Self {
        self.env_var = Some(env_var.into());
        self
    }

    /// A copy of this flag advertised under `prefix`, e.g. `access-key` becomes
    /// `rancher-access-key`.
    pub fn with_prefix(&self, prefix: &str) -> Self {
        Self {
            name: format!("{}{}", prefix, self.name),
            ..self.clone()
        }
    }

    /// The value this flag contributes when no configuration source sets it.
    pub fn default_value(&self) -> OptionValue {
        self.default.clone().unwrap_or(OptionValue::Bool(false))
    }
}
