use std::cell::Cell;
use std::collections::HashSet;

use crate::model::{DataFile, GiftiFile};

use super::{CommandError, FileHandle, ParamKind, ParameterValue, Result};

/// A declared positional parameter or output, and its value once parsed.
#[derive(Debug, Clone)]
pub struct Parameter {
    pub name: String,
    pub description: String,
    pub kind: ParamKind,
    pub(super) value: Option<ParameterValue>,
    /// Command-line token naming where an output goes.
    pub(super) destination: Option<String>,
    checked: Cell<bool>,
}

impl Parameter {
    fn new(kind: ParamKind, name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            kind,
            value: None,
            destination: None,
            checked: Cell::new(false),
        }
    }

    pub fn value(&self) -> Option<&ParameterValue> {
        self.value.as_ref()
    }

    pub fn destination(&self) -> Option<&str> {
        self.destination.as_deref()
    }

    /// Whether an output holds something to write or print.
    pub fn is_set(&self) -> bool {
        match &self.value {
            Some(ParameterValue::File(handle)) => handle.is_loaded(),
            Some(_) => true,
            None => false,
        }
    }

    fn bound(&self) -> Result<&ParameterValue> {
        self.checked.set(true);
        self.value
            .as_ref()
            .ok_or_else(|| CommandError::MissingArgument(self.name.clone()))
    }
}

/// One parsed occurrence of an option.
#[derive(Debug, Clone)]
pub struct OptionInstance {
    /// Cursor index of the option switch on the command line.
    pub position: usize,
    pub component: ParameterComponent,
}

/// An option switch together with the grammar of its own arguments.
#[derive(Debug, Clone)]
pub struct OptionGroup {
    pub switch: String,
    pub description: String,
    pub repeatable: bool,
    pub template: ParameterComponent,
    pub(super) instances: Vec<OptionInstance>,
    checked: Cell<bool>,
}

impl OptionGroup {
    pub fn instances(&self) -> &[OptionInstance] {
        &self.instances
    }

    pub fn is_present(&self) -> bool {
        !self.instances.is_empty()
    }
}

/// The parameter grammar of an operation, or of one option nested inside it.
///
/// Operations declare parameters through the `add_*` builders; the parser fills in values and
/// option instances; the operation then reads them back by name.
#[derive(Debug, Clone, Default)]
pub struct ParameterComponent {
    pub(super) params: Vec<Parameter>,
    pub(super) outputs: Vec<Parameter>,
    pub(super) options: Vec<OptionGroup>,
}

impl ParameterComponent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_param(&mut self, kind: ParamKind, name: &str, description: &str) {
        self.params.push(Parameter::new(kind, name, description));
    }

    pub fn add_output(&mut self, kind: ParamKind, name: &str, description: &str) {
        self.outputs.push(Parameter::new(kind, name, description));
    }

    /// Declares an option that may be given at most once, returning its argument grammar.
    pub fn add_option(&mut self, switch: &str, description: &str) -> &mut ParameterComponent {
        self.push_option(switch, description, false)
    }

    pub fn add_repeatable_option(
        &mut self,
        switch: &str,
        description: &str,
    ) -> &mut ParameterComponent {
        self.push_option(switch, description, true)
    }

    fn push_option(
        &mut self,
        switch: &str,
        description: &str,
        repeatable: bool,
    ) -> &mut ParameterComponent {
        self.options.push(OptionGroup {
            switch: switch.to_string(),
            description: description.to_string(),
            repeatable,
            template: ParameterComponent::new(),
            instances: Vec::new(),
            checked: Cell::new(false),
        });
        let last = self.options.len() - 1;
        &mut self.options[last].template
    }

    pub fn params(&self) -> &[Parameter] {
        &self.params
    }

    pub fn outputs(&self) -> &[Parameter] {
        &self.outputs
    }

    pub fn options(&self) -> &[OptionGroup] {
        &self.options
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty() && self.outputs.is_empty() && self.options.is_empty()
    }

    fn param(&self, name: &str) -> Result<&Parameter> {
        self.params
            .iter()
            .find(|param| param.name == name)
            .ok_or_else(|| CommandError::UndeclaredParameter(name.to_string()))
    }

    pub fn value(&self, name: &str) -> Result<&ParameterValue> {
        self.param(name)?.bound()
    }

    pub fn bool(&self, name: &str) -> Result<bool> {
        self.value(name)?.as_bool(name)
    }

    pub fn int(&self, name: &str) -> Result<i64> {
        self.value(name)?.as_int(name)
    }

    pub fn double(&self, name: &str) -> Result<f64> {
        self.value(name)?.as_double(name)
    }

    pub fn string(&self, name: &str) -> Result<&str> {
        self.value(name)?.as_str(name)
    }

    pub fn file(&self, name: &str) -> Result<&FileHandle> {
        self.value(name)?.as_file(name)
    }

    pub fn gifti(&self, name: &str) -> Result<&GiftiFile> {
        self.value(name)?.as_gifti(name)
    }

    pub fn file_mut(&mut self, name: &str) -> Result<&mut FileHandle> {
        let param = self
            .params
            .iter_mut()
            .find(|param| param.name == name)
            .ok_or_else(|| CommandError::UndeclaredParameter(name.to_string()))?;
        param.checked.set(true);
        param
            .value
            .as_mut()
            .ok_or_else(|| CommandError::MissingArgument(name.to_string()))?
            .as_file_mut(name)
    }

    fn output_mut(&mut self, name: &str) -> Result<&mut Parameter> {
        self.outputs
            .iter_mut()
            .find(|output| output.name == name)
            .ok_or_else(|| CommandError::UndeclaredParameter(name.to_string()))
    }

    /// Stores the content to be written to a file output.
    pub fn set_output_file(&mut self, name: &str, file: impl Into<DataFile>) -> Result<()> {
        let output = self.output_mut(name)?;
        output
            .value
            .as_mut()
            .ok_or_else(|| CommandError::MissingArgument(name.to_string()))?
            .as_file_mut(name)?
            .set(file.into());
        Ok(())
    }

    /// Stores a primitive output value, which is printed rather than written.
    pub fn set_output_value(&mut self, name: &str, value: ParameterValue) -> Result<()> {
        let output = self.output_mut(name)?;
        if output.kind.is_file() || value.kind_name() != output.kind.name() {
            return Err(CommandError::type_mismatch(
                name,
                value.to_string(),
                output.kind.name(),
            ));
        }
        output.value = Some(value);
        Ok(())
    }

    fn group(&self, switch: &str) -> Result<&OptionGroup> {
        let group = self
            .options
            .iter()
            .find(|group| group.switch == switch)
            .ok_or_else(|| CommandError::UndeclaredParameter(switch.to_string()))?;
        group.checked.set(true);
        Ok(group)
    }

    /// The parsed arguments of a non-repeatable option, if it was given.
    pub fn option(&self, switch: &str) -> Result<Option<&ParameterComponent>> {
        Ok(self
            .group(switch)?
            .instances
            .first()
            .map(|instance| &instance.component))
    }

    pub fn has_option(&self, switch: &str) -> Result<bool> {
        Ok(self.group(switch)?.is_present())
    }

    /// Every parsed occurrence of a repeatable option, in command-line order.
    pub fn repeatable(&self, switch: &str) -> Result<&[OptionInstance]> {
        Ok(&self.group(switch)?.instances)
    }

    /// Checks the declaration itself: switches start with `-` and names are unique per component.
    pub fn validate(&self, owner: &str) -> Result<()> {
        let invalid = |message: String| CommandError::InvalidSchema {
            switch: owner.to_string(),
            message,
        };
        let mut names = HashSet::new();
        for param in self.params.iter().chain(&self.outputs) {
            if param.name.is_empty() {
                return Err(invalid("parameter with empty name".to_string()));
            }
            if !names.insert(param.name.as_str()) {
                return Err(invalid(format!("parameter <{}> declared twice", param.name)));
            }
        }
        let mut switches = HashSet::new();
        for group in &self.options {
            if !group.switch.starts_with('-') || group.switch.len() < 2 {
                return Err(invalid(format!(
                    "option switch \"{}\" must start with '-'",
                    group.switch
                )));
            }
            if !switches.insert(group.switch.as_str()) {
                return Err(invalid(format!("option {} declared twice", group.switch)));
            }
            group.template.validate(owner)?;
        }
        Ok(())
    }

    /// Loaded input files of this component and of every parsed option, in declaration order.
    pub fn input_files(&self) -> Vec<&FileHandle> {
        let mut files = self
            .params
            .iter()
            .filter_map(|param| match &param.value {
                Some(ParameterValue::File(handle)) => Some(handle),
                _ => None,
            })
            .collect::<Vec<_>>();
        for group in &self.options {
            for instance in &group.instances {
                files.extend(instance.component.input_files());
            }
        }
        files
    }

    /// Outputs of this component and of every parsed option.
    pub fn all_outputs(&self) -> Vec<&Parameter> {
        let mut outputs = self.outputs.iter().collect::<Vec<_>>();
        for group in &self.options {
            for instance in &group.instances {
                outputs.extend(instance.component.all_outputs());
            }
        }
        outputs
    }

    pub(super) fn all_outputs_mut(&mut self) -> Vec<&mut Parameter> {
        let mut outputs = self.outputs.iter_mut().collect::<Vec<_>>();
        for group in &mut self.options {
            for instance in &mut group.instances {
                outputs.extend(instance.component.all_outputs_mut());
            }
        }
        outputs
    }

    /// Declared parameters and options that the operation never read.
    pub fn unchecked(&self) -> Vec<String> {
        let mut found = Vec::new();
        self.collect_unchecked("", &mut found);
        found
    }

    fn collect_unchecked(&self, prefix: &str, found: &mut Vec<String>) {
        for param in &self.params {
            if !param.checked.get() {
                found.push(format!("{prefix}<{}>", param.name));
            }
        }
        for group in &self.options {
            if !group.checked.get() {
                found.push(format!("{prefix}{}", group.switch));
                continue;
            }
            for instance in &group.instances {
                instance
                    .component
                    .collect_unchecked(&format!("{prefix}{} ", group.switch), found);
            }
        }
    }
}
