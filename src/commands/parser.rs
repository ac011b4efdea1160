use tracing::{debug, warn};

use crate::formats::FileProvider;

use super::{
    CommandError, FileHandle, OptionInstance, ParamKind, ParameterComponent, ParameterValue,
    Result, TokenCursor,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Param,
    Output,
}

/// Recursive-descent parser binding command-line tokens to a `ParameterComponent`.
///
/// Each component is parsed as: required parameters, then required outputs, then any of its
/// options. Options may also appear between positional arguments. File inputs are loaded through
/// the provider as soon as their path is read.
pub struct CommandParser<'a> {
    provider: &'a dyn FileProvider,
}

impl<'a> CommandParser<'a> {
    pub fn new(provider: &'a dyn FileProvider) -> Self {
        Self { provider }
    }

    /// Parses the whole token stream; tokens left over afterwards are an error.
    pub fn parse(
        &self,
        component: &mut ParameterComponent,
        cursor: &mut TokenCursor,
    ) -> Result<()> {
        self.parse_component(component, cursor)?;
        match cursor.peek() {
            Some(token) => Err(CommandError::ExtraArgument(token.to_string())),
            None => Ok(()),
        }
    }

    fn parse_component(
        &self,
        component: &mut ParameterComponent,
        cursor: &mut TokenCursor,
    ) -> Result<()> {
        for index in 0..component.params.len() {
            self.parse_required(component, Slot::Param, index, cursor)?;
        }
        for index in 0..component.outputs.len() {
            self.parse_required(component, Slot::Output, index, cursor)?;
        }
        self.parse_remaining_options(component, cursor)
    }

    fn parse_required(
        &self,
        component: &mut ParameterComponent,
        slot: Slot,
        index: usize,
        cursor: &mut TokenCursor,
    ) -> Result<()> {
        let (name, kind) = {
            let param = match slot {
                Slot::Param => &component.params[index],
                Slot::Output => &component.outputs[index],
            };
            (param.name.clone(), param.kind)
        };

        loop {
            let Some(token) = cursor.peek().map(str::to_string) else {
                return Err(CommandError::MissingArgument(name));
            };
            if !token.starts_with('-') {
                break;
            }
            if self.parse_option(component, cursor)? {
                continue;
            }
            if slot == Slot::Param && kind.accepts_dash_literal() {
                debug!(token = %token, parameter = %name, "treating dash token as a literal");
                break;
            }
            return Err(CommandError::MalformedOption {
                token,
                expected: name,
            });
        }

        match slot {
            Slot::Param => {
                let value = self.parse_value(kind, &name, cursor)?;
                debug!(parameter = %name, value = %value, "parsed parameter");
                component.params[index].value = Some(value);
            }
            Slot::Output => {
                let destination = cursor.next_string(&name)?;
                debug!(output = %name, destination = %destination, "parsed output");
                let output = &mut component.outputs[index];
                output.value = match kind {
                    ParamKind::File(file_kind) => Some(ParameterValue::File(FileHandle::new(
                        file_kind,
                        destination.as_str(),
                    ))),
                    other => {
                        warn!(
                            kind = other.name(),
                            output = %name,
                            "encountered ignored output type"
                        );
                        None
                    }
                };
                output.destination = Some(destination);
            }
        }
        Ok(())
    }

    fn parse_value(
        &self,
        kind: ParamKind,
        name: &str,
        cursor: &mut TokenCursor,
    ) -> Result<ParameterValue> {
        let value = match kind {
            ParamKind::Bool => ParameterValue::Bool(cursor.next_bool(name)?),
            ParamKind::Int => ParameterValue::Int(cursor.next_int(name)?),
            ParamKind::Double => ParameterValue::Double(cursor.next_double(name)?),
            ParamKind::String => ParameterValue::String(cursor.next_string(name)?),
            ParamKind::Choice(choices) => {
                let token = cursor.next_string(name)?;
                if !choices.contains(&token.as_str()) {
                    return Err(CommandError::type_mismatch(
                        name,
                        token,
                        format!("one of {}", choices.join(", ")),
                    ));
                }
                ParameterValue::String(token)
            }
            ParamKind::File(file_kind) => {
                let mut handle = FileHandle::new(file_kind, cursor.next_string(name)?);
                handle.load(self.provider)?;
                ParameterValue::File(handle)
            }
        };
        Ok(value)
    }

    /// Matches the token under the cursor against the component's option switches.
    ///
    /// Returns `false`, leaving the cursor where it was, when no switch matches.
    fn parse_option(
        &self,
        component: &mut ParameterComponent,
        cursor: &mut TokenCursor,
    ) -> Result<bool> {
        let position = cursor.index();
        let token = cursor.next_string("option")?;
        let Some(group) = component
            .options
            .iter_mut()
            .find(|group| group.switch == token)
        else {
            cursor.backup();
            return Ok(false);
        };
        if !group.repeatable && group.is_present() {
            return Err(CommandError::DuplicateOption(token));
        }
        debug!(option = %token, position, "parsing option");
        let mut instance = group.template.clone();
        self.parse_component(&mut instance, cursor)?;
        group.instances.push(OptionInstance {
            position,
            component: instance,
        });
        Ok(true)
    }

    fn parse_remaining_options(
        &self,
        component: &mut ParameterComponent,
        cursor: &mut TokenCursor,
    ) -> Result<()> {
        while cursor.peek().is_some_and(|token| token.starts_with('-')) {
            if !self.parse_option(component, cursor)? {
                break;
            }
        }
        Ok(())
    }
}
