use super::{Operation, ParameterComponent};

pub const INDENT_INCREMENT: usize = 3;
pub const MAX_WIDTH: usize = 79;
pub const MAX_INDENT: usize = 31;
pub const MIN_INDENT: usize = 0;

fn indent_string(desired: usize) -> String {
    " ".repeat(desired.clamp(MIN_INDENT, MAX_INDENT))
}

/// Word-wraps `text` at `indent`, breaking at spaces and hyphenating words that do not fit.
///
/// With `hanging` set, wrapped continuation lines get one extra indent step.
pub fn format_text(text: &str, indent: usize, hanging: bool) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut indent_text = indent_string(indent);
    let mut width = MAX_WIDTH.saturating_sub(indent_text.len()).max(2);
    let mut added_break = false;
    let mut out = String::new();
    let mut start = 0;
    let slice = |from: usize, to: usize| chars[from..to].iter().collect::<String>();

    while start < chars.len() {
        if hanging {
            let depth = if added_break {
                indent + INDENT_INCREMENT
            } else {
                indent
            };
            indent_text = indent_string(depth);
            width = MAX_WIDTH.saturating_sub(indent_text.len()).max(2);
        }

        let mut end = start;
        while end - start < width && end < chars.len() && chars[end] != '\n' {
            end += 1;
        }

        if end >= chars.len() {
            out.push_str(&indent_text);
            out.push_str(&slice(start, end));
            out.push('\n');
        } else if chars[end] == '\n' {
            while end < chars.len() && chars[end] == '\n' {
                end += 1;
            }
            added_break = false;
            out.push_str(&indent_text);
            out.push_str(&slice(start, end));
        } else {
            let saved_end = end;
            while end > start && chars[end] != ' ' {
                end -= 1;
            }
            if end > start {
                while end > start && chars[end] == ' ' {
                    end -= 1;
                }
                if chars[end] != ' ' {
                    end += 1;
                } else {
                    end = saved_end;
                }
                added_break = true;
                out.push_str(&indent_text);
                out.push_str(&slice(start, end));
                out.push('\n');
            } else {
                end = saved_end - 1;
                added_break = true;
                out.push_str(&indent_text);
                out.push_str(&slice(start, end));
                out.push_str("-\n");
            }
        }

        start = end;
        if added_break {
            while start < chars.len() && chars[start] == ' ' {
                start += 1;
            }
        }
    }
    out
}

/// Placeholder listing: `<name>` for positional arguments, `[switch]` for options.
pub fn usage(component: &ParameterComponent, indent: usize) -> String {
    let mut out = String::new();
    for param in component.params().iter().chain(component.outputs()) {
        out.push_str(&format_text(&format!("<{}>", param.name), indent, true));
    }
    for group in component.options() {
        let marker = if group.repeatable { " (repeatable)" } else { "" };
        out.push_str(&format_text(
            &format!("[{}]{marker}", group.switch),
            indent,
            true,
        ));
        out.push_str(&usage(&group.template, indent + INDENT_INCREMENT));
    }
    out
}

/// One description line per parameter, output and option, recursing into option arguments.
pub fn descriptions(component: &ParameterComponent, indent: usize) -> String {
    let mut out = String::new();
    for param in component.params() {
        out.push_str(&format_text(
            &format!("<{}> - {}", param.name, param.description),
            indent,
            true,
        ));
    }
    for output in component.outputs() {
        out.push_str(&format_text(
            &format!("<{}> - output - {}", output.name, output.description),
            indent,
            true,
        ));
    }
    for group in component.options() {
        let marker = if group.repeatable { "repeatable - " } else { "" };
        out.push('\n');
        out.push_str(&format_text(
            &format!("[{}] - {marker}{}", group.switch, group.description),
            indent,
            true,
        ));
        out.push_str(&descriptions(&group.template, indent + INDENT_INCREMENT));
    }
    out
}

/// Full help for one operation.
pub fn operation_help(operation: &dyn Operation, program: &str) -> String {
    let mut indent = MIN_INDENT;
    let mut out = format_text(operation.short_description(), indent, true);
    indent += INDENT_INCREMENT;
    // never wrapped, so it can be copied
    out.push_str(&format!(
        "{}{program} {}\n",
        indent_string(indent),
        operation.switch()
    ));
    indent += INDENT_INCREMENT;
    let parameters = operation.parameters();
    out.push_str(&usage(&parameters, indent));
    out.push('\n');
    out.push_str(&descriptions(&parameters, indent));
    out.push('\n');
    out.push_str(&format_text(operation.help_text(), indent, false));
    out
}
