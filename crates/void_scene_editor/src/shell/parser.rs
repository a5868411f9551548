//! Command parser
//!
//! Turns one input line into a [`ShellCommand`].

use std::path::PathBuf;

use glam::{Quat, Vec3};
use void_scene::{Rgba, ShapeKind};

/// Parse error
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("Empty input")]
    EmptyInput,

    #[error("Unclosed quote")]
    UnclosedQuote,

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Unknown shape: {0} (expected cube, sphere or mesh)")]
    UnknownShape(String),

    #[error("Unknown field: {0} (expected name, color, position, orientation or dims)")]
    UnknownField(String),

    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),

    #[error("Invalid number: {0}")]
    InvalidNumber(String),

    #[error("{field} takes {expected} value(s), got {found}")]
    WrongArity {
        field: &'static str,
        expected: &'static str,
        found: usize,
    },
}

/// How `select` names its target.
#[derive(Debug, Clone, PartialEq)]
pub enum Selector {
    Id(u32),
    Name(String),
}

/// A field value typed at the prompt.
///
/// Dimensions stay a flat list until the selected entity's kind is known.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldInput {
    Name(String),
    Color(Rgba),
    Position(Vec3),
    /// Entered as `w x y z`
    Orientation(Quat),
    Dimensions(Vec<f32>),
}

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    Add { kind: ShapeKind, source: Option<PathBuf> },
    Select(Selector),
    Deselect,
    Set(FieldInput),
    /// One drag sample
    Drag(Vec3),
    /// End the drag gesture
    Drop,
    /// Abandon the drag gesture
    Cancel,
    Delete,
    Undo,
    Redo,
    List,
    Show,
    History,
    Save,
    Help,
    Quit,
}

/// Parse a command line.
pub fn parse_line(input: &str) -> Result<ShellCommand, ParseError> {
    let tokens = tokenize(input.trim())?;
    let Some((name, args)) = tokens.split_first() else {
        return Err(ParseError::EmptyInput);
    };

    let cmd = match name.to_lowercase().as_str() {
        "add" => {
            let kind = args.first().ok_or(ParseError::MissingArgument("shape"))?;
            let kind = match kind.to_lowercase().as_str() {
                "cube" => ShapeKind::Cube,
                "sphere" => ShapeKind::Sphere,
                "mesh" | "stl" => ShapeKind::ImportedMesh,
                _ => return Err(ParseError::UnknownShape(kind.clone())),
            };
            ShellCommand::Add {
                kind,
                source: args.get(1).map(PathBuf::from),
            }
        }
        "select" | "sel" => {
            let target = args.first().ok_or(ParseError::MissingArgument("id or name"))?;
            match target.parse::<u32>() {
                Ok(id) => ShellCommand::Select(Selector::Id(id)),
                Err(_) => ShellCommand::Select(Selector::Name(target.clone())),
            }
        }
        "deselect" => ShellCommand::Deselect,
        "set" => {
            let field = args.first().ok_or(ParseError::MissingArgument("field"))?;
            ShellCommand::Set(parse_field(field, &args[1..])?)
        }
        "drag" => {
            let [dx, dy, dz] = floats::<3>("drag", "3", args)?;
            ShellCommand::Drag(Vec3::new(dx, dy, dz))
        }
        "drop" | "release" => ShellCommand::Drop,
        "cancel" => ShellCommand::Cancel,
        "delete" | "del" | "rm" => ShellCommand::Delete,
        "undo" => ShellCommand::Undo,
        "redo" => ShellCommand::Redo,
        "list" | "ls" => ShellCommand::List,
        "show" => ShellCommand::Show,
        "history" => ShellCommand::History,
        "save" => ShellCommand::Save,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        _ => return Err(ParseError::UnknownCommand(name.clone())),
    };
    Ok(cmd)
}

fn parse_field(field: &str, values: &[String]) -> Result<FieldInput, ParseError> {
    let input = match field.to_lowercase().as_str() {
        "name" => {
            if values.is_empty() {
                return Err(ParseError::MissingArgument("name"));
            }
            FieldInput::Name(values.join(" "))
        }
        "color" | "colour" => FieldInput::Color(parse_color(values)?),
        "position" | "pos" => {
            let [x, y, z] = floats::<3>("position", "3", values)?;
            FieldInput::Position(Vec3::new(x, y, z))
        }
        "orientation" | "rot" => {
            let [w, x, y, z] = floats::<4>("orientation", "4", values)?;
            FieldInput::Orientation(Quat::from_xyzw(x, y, z, w))
        }
        "dims" | "dimensions" => {
            if values.is_empty() {
                return Err(ParseError::MissingArgument("dimensions"));
            }
            FieldInput::Dimensions(values.iter().map(|v| parse_float(v)).collect::<Result<Vec<f32>, ParseError>>()?)
        }
        _ => return Err(ParseError::UnknownField(field.to_string())),
    };
    Ok(input)
}

/// `r g b [a]`, alpha defaulting to opaque.
fn parse_color(values: &[String]) -> Result<Rgba, ParseError> {
    if !(3..=4).contains(&values.len()) {
        return Err(ParseError::WrongArity {
            field: "color",
            expected: "3 or 4",
            found: values.len(),
        });
    }
    let mut color = [255u8; 4];
    for (channel, value) in color.iter_mut().zip(values) {
        *channel = value
            .parse()
            .map_err(|_| ParseError::InvalidNumber(value.clone()))?;
    }
    Ok(color)
}

fn floats<const N: usize>(
    field: &'static str,
    expected: &'static str,
    values: &[String],
) -> Result<[f32; N], ParseError> {
    if values.len() != N {
        return Err(ParseError::WrongArity {
            field,
            expected,
            found: values.len(),
        });
    }
    let mut out = [0.0; N];
    for (slot, value) in out.iter_mut().zip(values) {
        *slot = parse_float(value)?;
    }
    Ok(out)
}

fn parse_float(value: &str) -> Result<f32, ParseError> {
    value
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ParseError::InvalidNumber(value.to_string()))
}

/// Split on whitespace, keeping double-quoted runs together.
fn tokenize(input: &str) -> Result<Vec<String>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            // Whitespace - skip
            ' ' | '\t' => {
                chars.next();
            }

            // Quoted string
            '"' => {
                chars.next();
                let mut word = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == '"' {
                        closed = true;
                        break;
                    }
                    word.push(c);
                }
                if !closed {
                    return Err(ParseError::UnclosedQuote);
                }
                tokens.push(word);
            }

            // Regular word
            _ => {
                let mut word = String::new();
                while let Some(&c) = chars.peek() {
                    if c == ' ' || c == '\t' || c == '"' {
                        break;
                    }
                    word.push(c);
                    chars.next();
                }
                tokens.push(word);
            }
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        assert_eq!(parse_line("undo").unwrap(), ShellCommand::Undo);
        assert_eq!(parse_line("  QUIT ").unwrap(), ShellCommand::Quit);
        assert_eq!(parse_line("   "), Err(ParseError::EmptyInput));
    }

    #[test]
    fn test_parse_add() {
        assert_eq!(
            parse_line("add cube").unwrap(),
            ShellCommand::Add {
                kind: ShapeKind::Cube,
                source: None
            }
        );
        assert_eq!(
            parse_line("add mesh \"my meshes/car.stl\"").unwrap(),
            ShellCommand::Add {
                kind: ShapeKind::ImportedMesh,
                source: Some(PathBuf::from("my meshes/car.stl"))
            }
        );
        assert_eq!(parse_line("add cone"), Err(ParseError::UnknownShape("cone".into())));
    }

    #[test]
    fn test_parse_select() {
        assert_eq!(parse_line("select 3").unwrap(), ShellCommand::Select(Selector::Id(3)));
        assert_eq!(
            parse_line("select Cube1").unwrap(),
            ShellCommand::Select(Selector::Name("Cube1".into()))
        );
    }

    #[test]
    fn test_parse_set_fields() {
        assert_eq!(
            parse_line("set name \"Red Box\"").unwrap(),
            ShellCommand::Set(FieldInput::Name("Red Box".into()))
        );
        assert_eq!(
            parse_line("set color 255 0 0").unwrap(),
            ShellCommand::Set(FieldInput::Color([255, 0, 0, 255]))
        );
        assert_eq!(
            parse_line("set position 5 0 0").unwrap(),
            ShellCommand::Set(FieldInput::Position(Vec3::new(5.0, 0.0, 0.0)))
        );
        assert_eq!(
            parse_line("set orientation 1 0 0 0").unwrap(),
            ShellCommand::Set(FieldInput::Orientation(Quat::IDENTITY))
        );
        assert_eq!(
            parse_line("set dims 2.5").unwrap(),
            ShellCommand::Set(FieldInput::Dimensions(vec![2.5]))
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            parse_line("set position 1 2"),
            Err(ParseError::WrongArity {
                field: "position",
                expected: "3",
                found: 2
            })
        );
        assert_eq!(parse_line("set color 256 0 0"), Err(ParseError::InvalidNumber("256".into())));
        assert_eq!(parse_line("set size 1"), Err(ParseError::UnknownField("size".into())));
        assert_eq!(parse_line("drag 1 x 0"), Err(ParseError::InvalidNumber("x".into())));
        assert_eq!(parse_line("drag 1 NaN 0"), Err(ParseError::InvalidNumber("NaN".into())));
        assert_eq!(parse_line("fly"), Err(ParseError::UnknownCommand("fly".into())));
        assert_eq!(parse_line("set name \"open"), Err(ParseError::UnclosedQuote));
    }
}
