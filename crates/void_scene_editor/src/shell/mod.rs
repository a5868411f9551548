//! Line-oriented front end for the editor.
//!
//! Each input line is parsed into a [`ShellCommand`] and run against an
//! [`EditorState`]. The inspector is a [`FieldBuffer`], printed back after
//! every edit.

mod parser;

pub use parser::{parse_line, FieldInput, ParseError, Selector, ShellCommand};

use std::fmt::Write as _;

use thiserror::Error;
use void_scene::{Attribute, Dimensions, EntityId, SceneError, ShapeKind, SpawnParams};

use crate::core::EditorState;
use crate::session::{CommitOutcome, FieldBuffer, SessionError};

/// Usage text for `help`.
pub const HELP: &str = "\
Commands:
  add cube|sphere|mesh [path]     Add a shape (mesh defaults to the configured mesh)
  select <id|name>                Select an entity
  deselect                        Clear the selection
  set name <text>                 Rename the selection
  set color <r> <g> <b> [a]       Set color, 0-255 per channel
  set position <x> <y> <z>        Move the selection
  set orientation <w> <x> <y> <z> Rotate the selection
  set dims <values..>             Resize (3 values, or 1 for spheres)
  drag <dx> <dy> <dz>             Drag the selection by one step
  drop                            Release the drag as one undo step
  cancel                          Abandon the drag
  delete                          Delete the selection
  undo | redo                     Step through edit history
  list | show | history           Inspect the scene, selection, history
  save                            Write the scene file
  help                            Show this help
  quit                            Exit (saves if save_on_exit is set)";

/// Errors reported for a single input line.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error("No entity matches '{0}'")]
    NoMatch(String),
}

/// Result of running one line.
#[derive(Debug, Clone, PartialEq)]
pub enum ShellReply {
    /// Text to print. May be empty.
    Output(String),
    Quit,
}

/// Stateless command runner.
pub struct Shell;

impl Shell {
    /// Run one input line. Errors are reported as output, never propagated.
    pub fn run_line(state: &mut EditorState<FieldBuffer>, line: &str) -> ShellReply {
        match Self::execute(state, line) {
            Ok(reply) => reply,
            Err(e) => {
                log::debug!("'{}' failed: {}", line.trim(), e);
                ShellReply::Output(format!("error: {}", e))
            }
        }
    }

    fn execute(state: &mut EditorState<FieldBuffer>, line: &str) -> Result<ShellReply, ShellError> {
        let cmd = match parse_line(line) {
            Err(ParseError::EmptyInput) => return Ok(ShellReply::Output(String::new())),
            other => other?,
        };

        let output = match cmd {
            ShellCommand::Add { kind, source } => {
                let mut params = SpawnParams::new();
                if let Some(source) = source {
                    params = params.with_source(source);
                }
                let id = state.add_shape(kind, params)?;
                let name = state.scene.get(id).map(|e| e.name().to_string()).unwrap_or_default();
                format!("Added {} ({})", name, id)
            }
            ShellCommand::Select(selector) => {
                let id = resolve(state, selector)?;
                state.select(Some(id))?;
                format_fields(state.session().fields())
            }
            ShellCommand::Deselect => {
                state.select(None)?;
                "Selection cleared".to_string()
            }
            ShellCommand::Set(input) => {
                let attribute = to_attribute(state, input)?;
                match state.commit(attribute)? {
                    CommitOutcome::Applied => format_fields(state.session().fields()),
                    CommitOutcome::Unchanged => "Unchanged".to_string(),
                    CommitOutcome::Suppressed => "Ignored".to_string(),
                }
            }
            ShellCommand::Drag(delta) => {
                state.drag_by(delta)?;
                format_fields(state.session().fields())
            }
            ShellCommand::Drop => {
                if state.end_drag()? {
                    "Move recorded".to_string()
                } else {
                    "Nothing moved".to_string()
                }
            }
            ShellCommand::Cancel => {
                state.cancel_drag()?;
                format_fields(state.session().fields())
            }
            ShellCommand::Delete => {
                let entity = state.delete_selected().ok_or(SessionError::NoSelection)?;
                format!("Deleted {}", entity.name())
            }
            ShellCommand::Undo => {
                state.undo();
                state.status_message.clone()
            }
            ShellCommand::Redo => {
                state.redo();
                state.status_message.clone()
            }
            ShellCommand::List => format_list(state),
            ShellCommand::Show => format_fields(state.session().fields()),
            ShellCommand::History => format_history(state),
            ShellCommand::Save => {
                state.save()?;
                state.status_message.clone()
            }
            ShellCommand::Help => HELP.to_string(),
            ShellCommand::Quit => return Ok(ShellReply::Quit),
        };
        Ok(ShellReply::Output(output))
    }
}

fn resolve(state: &EditorState<FieldBuffer>, selector: Selector) -> Result<EntityId, ShellError> {
    match selector {
        Selector::Id(n) if state.scene.contains(EntityId(n)) => Ok(EntityId(n)),
        Selector::Id(n) => Err(ShellError::NoMatch(n.to_string())),
        Selector::Name(name) => state.scene.find_by_name(&name).ok_or(ShellError::NoMatch(name)),
    }
}

fn to_attribute(state: &EditorState<FieldBuffer>, input: FieldInput) -> Result<Attribute, ShellError> {
    let attribute = match input {
        FieldInput::Name(name) => Attribute::Name(name),
        FieldInput::Color(color) => Attribute::Color(color),
        FieldInput::Position(position) => Attribute::Position(position),
        FieldInput::Orientation(orientation) => Attribute::Orientation(orientation),
        FieldInput::Dimensions(values) => {
            let kind = state.selected_entity().ok_or(SessionError::NoSelection)?.kind();
            let dimensions = Dimensions::from_slice(kind, &values).ok_or(ParseError::WrongArity {
                field: "dims",
                expected: if kind == ShapeKind::Sphere { "1" } else { "3" },
                found: values.len(),
            })?;
            Attribute::Dimensions(dimensions)
        }
    };
    Ok(attribute)
}

fn join(values: &[f32]) -> String {
    values.iter().map(|v| format!("{:.3}", v)).collect::<Vec<_>>().join(" ")
}

fn format_fields(fields: &FieldBuffer) -> String {
    let Some(kind) = fields.kind else {
        return "Nothing selected".to_string();
    };
    let [r, g, b, a] = fields.color;
    format!(
        "name:        {} ({})\ncolor:       {} {} {} {}\nposition:    {}\norientation: {}\ndims:        {}",
        fields.name,
        kind,
        r,
        g,
        b,
        a,
        join(&fields.position),
        join(&fields.orientation),
        join(&fields.dimensions),
    )
}

fn format_list(state: &EditorState<FieldBuffer>) -> String {
    if state.scene.is_empty() {
        return "Scene is empty".to_string();
    }
    let mut out = String::new();
    for entity in state.scene.iter() {
        let marker = if Some(entity.id()) == state.selected() { '*' } else { ' ' };
        let p = entity.position();
        let _ = writeln!(
            out,
            "{} {:>4}  {:<16} {:<6} ({:.2}, {:.2}, {:.2})",
            marker,
            entity.id().0,
            entity.name(),
            entity.kind().name(),
            p.x,
            p.y,
            p.z
        );
    }
    if state.is_modified() {
        out.push_str("(unsaved changes)");
    }
    out.trim_end().to_string()
}

fn format_history(state: &EditorState<FieldBuffer>) -> String {
    let history = state.session().history();
    if history.is_empty() {
        return "History is empty".to_string();
    }
    let cursor = history.cursor();
    let mut out = String::new();
    for (i, (description, applied)) in history.entries().enumerate() {
        let marker = if Some(i) == cursor { '>' } else { ' ' };
        let suffix = if applied { "" } else { " (undone)" };
        let _ = writeln!(out, "{} {:>3}: {}{}", marker, i, description, suffix);
    }
    out.trim_end().to_string()
}
