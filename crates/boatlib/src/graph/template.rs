//! Description templates for waiting states.
//!
//! `{days}` is the number of days left and `{s}` is `"s"` unless that number
//! is 1. Any other `{name}` is looked up in the property bag of the state the
//! delayed transition starts from. `{{` and `}}` produce literal braces.

use std::fmt::Write as _;

use crate::error::TemplateError;
use crate::model::Properties;

/// Renders `template` for `days` remaining days.
pub fn render(template: &str, days: u32, bag: Option<&Properties>) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((offset, c)) = chars.next() {
        match c {
            '{' if chars.next_if(|&(_, c)| c == '{').is_some() => out.push('{'),
            '}' if chars.next_if(|&(_, c)| c == '}').is_some() => out.push('}'),
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some((_, '}')) => break,
                        Some((_, '{')) | None => {
                            return Err(TemplateError::UnbalancedBrace {
                                offset,
                                template: template.to_string(),
                            });
                        }
                        Some((_, c)) => name.push(c),
                    }
                }
                substitute(&mut out, &name, days, bag).ok_or_else(|| {
                    TemplateError::UnknownPlaceholder {
                        name,
                        template: template.to_string(),
                    }
                })?;
            }
            '}' => {
                return Err(TemplateError::UnbalancedBrace {
                    offset,
                    template: template.to_string(),
                });
            }
            c => out.push(c),
        }
    }

    Ok(out)
}

fn substitute(out: &mut String, name: &str, days: u32, bag: Option<&Properties>) -> Option<()> {
    match name {
        "days" => {
            let _ = write!(out, "{days}");
        }
        "s" => {
            if days != 1 {
                out.push('s');
            }
        }
        key => {
            let value = bag?.get(key)?;
            let _ = write!(out, "{value}");
        }
    }
    Some(())
}
