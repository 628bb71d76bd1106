//! Diagram-wide layout parameters.
//!
//! The set of parameters is fixed; each one maps onto a pic variable that
//! the `sequence.pic` macro library reads when laying out the diagram.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A parameter value: numeric (inches, mostly) or a flag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(f64),
    Flag(bool),
}

impl ParamValue {
    const fn kind(self) -> &'static str {
        match self {
            Self::Number(_) => "numeric",
            Self::Flag(_) => "boolean",
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Flag(b) => write!(f, "{}", u8::from(*b)),
        }
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

/// `0` or `1` written for a flag.
fn numeric_flag(n: f64) -> Option<bool> {
    if n.abs() < f64::EPSILON {
        Some(false)
    } else if (n - 1.0).abs() < f64::EPSILON {
        Some(true)
    } else {
        None
    }
}

/// The known layout parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Param {
    BoxHeight,
    BoxWidth,
    ActiveWidth,
    MessageSpacing,
    ObjectSpacing,
    DashInterval,
    DiagramWidth,
    DiagramHeight,
    Underline,
}

impl Param {
    pub const ALL: [Self; 9] = [
        Self::BoxHeight,
        Self::BoxWidth,
        Self::ActiveWidth,
        Self::MessageSpacing,
        Self::ObjectSpacing,
        Self::DashInterval,
        Self::DiagramWidth,
        Self::DiagramHeight,
        Self::Underline,
    ];

    /// Name used by callers (`set_param("boxWidth", ..)`).
    pub const fn name(self) -> &'static str {
        match self {
            Self::BoxHeight => "boxHeight",
            Self::BoxWidth => "boxWidth",
            Self::ActiveWidth => "activeWidth",
            Self::MessageSpacing => "messageSpacing",
            Self::ObjectSpacing => "objectSpacing",
            Self::DashInterval => "dashInterval",
            Self::DiagramWidth => "diagramWidth",
            Self::DiagramHeight => "diagramHeight",
            Self::Underline => "underline",
        }
    }

    /// The pic variable this parameter is written to.
    pub const fn pic_name(self) -> &'static str {
        match self {
            Self::BoxHeight => "boxht",
            Self::BoxWidth => "boxwid",
            Self::ActiveWidth => "awid",
            Self::MessageSpacing => "spacing",
            Self::ObjectSpacing => "movewid",
            Self::DashInterval => "dashwid",
            Self::DiagramWidth => "maxpswid",
            Self::DiagramHeight => "maxpsht",
            Self::Underline => "underline",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::BoxHeight => "Object box height",
            Self::BoxWidth => "Object box width",
            Self::ActiveWidth => "Active lifeline width",
            Self::MessageSpacing => "Spacing between messages",
            Self::ObjectSpacing => "Spacing between objects",
            Self::DashInterval => "Interval for dashed lines",
            Self::DiagramWidth => "Maximum width of picture",
            Self::DiagramHeight => "Maximum height of picture",
            Self::Underline => "Underline the name of objects",
        }
    }

    pub const fn default_value(self) -> ParamValue {
        match self {
            Self::BoxHeight => ParamValue::Number(0.3),
            Self::BoxWidth | Self::ObjectSpacing => ParamValue::Number(0.75),
            Self::ActiveWidth => ParamValue::Number(0.1),
            Self::MessageSpacing => ParamValue::Number(0.25),
            Self::DashInterval => ParamValue::Number(0.05),
            Self::DiagramWidth | Self::DiagramHeight => ParamValue::Number(11.0),
            Self::Underline => ParamValue::Flag(true),
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl FromStr for Param {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|param| param.name() == s)
            .ok_or_else(|| Error::UnknownParameter { name: s.to_string() })
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Current values for every [`Param`].
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSet {
    values: [ParamValue; Param::ALL.len()],
}

impl Default for ParamSet {
    fn default() -> Self {
        Self {
            values: Param::ALL.map(Param::default_value),
        }
    }
}

impl ParamSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a parameter by name.
    ///
    /// # Errors
    /// Returns [`Error::UnknownParameter`] if `name` is not a known parameter.
    pub fn get(&self, name: &str) -> Result<ParamValue> {
        let param = name.parse::<Param>()?;
        Ok(self.value(param))
    }

    /// Set a parameter by name.
    ///
    /// # Errors
    /// Returns [`Error::UnknownParameter`] for unknown names and
    /// [`Error::ParameterType`] when a flag is given a number or vice versa.
    /// The set is unchanged on error.
    pub fn set(&mut self, name: &str, value: impl Into<ParamValue>) -> Result<()> {
        let param = name.parse::<Param>()?;
        self.set_value(param, value.into())
    }

    pub const fn value(&self, param: Param) -> ParamValue {
        self.values[param.index()]
    }

    /// Set a parameter by its typed key. Flags also accept `0` and `1`.
    ///
    /// # Errors
    /// Returns [`Error::ParameterType`] when the value kind does not match
    /// the parameter's default, and [`Error::NonFiniteParameter`] for NaN or
    /// infinite numbers.
    pub fn set_value(&mut self, param: Param, value: ParamValue) -> Result<()> {
        let expected = param.default_value().kind();
        let value = match value {
            ParamValue::Number(n) if !n.is_finite() => {
                return Err(Error::NonFiniteParameter {
                    name: param.name().to_string(),
                    value: n,
                });
            }
            ParamValue::Number(n) if expected == "boolean" => {
                numeric_flag(n).map_or(value, ParamValue::Flag)
            }
            _ => value,
        };
        if value.kind() != expected {
            return Err(Error::ParameterType {
                name: param.name().to_string(),
                expected,
            });
        }
        tracing::debug!(param = param.name(), %value, "set parameter");
        self.values[param.index()] = value;
        Ok(())
    }

    /// `pic_name=value;` declarations, one per parameter.
    pub fn serialize(&self) -> Vec<String> {
        Param::ALL
            .into_iter()
            .map(|param| format!("{}={};", param.pic_name(), self.value(param)))
            .collect()
    }

    /// Human-readable listing of every parameter and its current value.
    pub fn describe(&self) -> String {
        let mut lines = Vec::with_capacity(Param::ALL.len() * 5);
        for param in Param::ALL {
            lines.push(format!("   param key: {}", param.name()));
            lines.push(format!(" description: {}", param.description()));
            lines.push(format!("pic variable: {}", param.pic_name()));
            lines.push(format!("       value: {}", self.value(param)));
            lines.push(String::new());
        }
        lines.join("\n")
    }
}
