use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::formats::FileProvider;

use super::{ParamKind, Parameter, ParameterComponent, Result};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParamSpec {
    pub name: String,
    pub description: String,
    pub kind: String,
    pub output: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OptionSpec {
    pub switch: String,
    pub description: String,
    pub repeatable: bool,
    pub component: ComponentSpec,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ComponentSpec {
    pub params: Vec<ParamSpec>,
    pub options: Vec<OptionSpec>,
}

fn param_spec(param: &Parameter, output: bool) -> ParamSpec {
    let choices = match param.kind {
        ParamKind::Choice(choices) => choices.iter().map(ToString::to_string).collect(),
        _ => Vec::new(),
    };
    ParamSpec {
        name: param.name.clone(),
        description: param.description.clone(),
        kind: param.kind.name().to_string(),
        output,
        choices,
    }
}

impl ComponentSpec {
    pub fn from_component(component: &ParameterComponent) -> Self {
        let params = component
            .params()
            .iter()
            .map(|param| param_spec(param, false))
            .chain(
                component
                    .outputs()
                    .iter()
                    .map(|output| param_spec(output, true)),
            )
            .collect();
        let options = component
            .options()
            .iter()
            .map(|group| OptionSpec {
                switch: group.switch.clone(),
                description: group.description.clone(),
                repeatable: group.repeatable,
                component: Self::from_component(&group.template),
            })
            .collect();
        Self { params, options }
    }
}

/// Machine-readable description of an operation's command line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OpSchema {
    pub switch: String,
    pub description: String,
    pub parameters: ComponentSpec,
}

/// Where an operation reports its results and reaches files it opens on its own.
pub struct OperationContext<'a> {
    pub out: &'a mut dyn Write,
    pub provider: &'a dyn FileProvider,
}

pub trait Operation: Send + Sync {
    /// Command-line switch, including the leading `-`.
    fn switch(&self) -> &'static str;
    fn short_description(&self) -> &'static str;
    /// A fresh, unparsed parameter declaration.
    fn parameters(&self) -> ParameterComponent;
    fn help_text(&self) -> &'static str;
    fn execute(
        &self,
        params: &mut ParameterComponent,
        context: &mut OperationContext<'_>,
    ) -> Result<()>;

    fn takes_parameters(&self) -> bool {
        !self.parameters().is_empty()
    }

    fn schema(&self) -> OpSchema {
        OpSchema {
            switch: self.switch().to_string(),
            description: self.short_description().to_string(),
            parameters: ComponentSpec::from_component(&self.parameters()),
        }
    }
}
