use crate::language::Direction;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Run the full pipeline for a query
    Analyze { query: String, direction: Direction },
    /// Retrieval only, no completion call
    Lookup { query: String, direction: Direction },
    SetDirection(Direction),
    ShowHistory,
    OpenRecord(String),
    /// Re-run retrieval for the active record and show the matched lines
    ShowEvidence,
    DeleteRecord(String),
    ClearHistory,
    ShowStatus,
    Quit,
}

impl AppEvent {
    /// Parse one line of interactive input. Plain text is a query in the
    /// current direction, `/`-prefixed lines are commands.
    pub fn parse_line(line: &str, direction: Direction) -> Result<Option<AppEvent>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let Some(command) = line.strip_prefix('/') else {
            return Ok(Some(AppEvent::Analyze {
                query: line.to_string(),
                direction,
            }));
        };

        let mut parts = command.splitn(2, char::is_whitespace);
        let name = parts.next().unwrap_or_default();
        let arg = parts.next().map(str::trim).unwrap_or_default();

        let event = match name {
            "mode" => AppEvent::SetDirection(arg.parse().map_err(|e| format!("{e}"))?),
            "context" | "lookup" if !arg.is_empty() => AppEvent::Lookup {
                query: arg.to_string(),
                direction,
            },
            "history" => AppEvent::ShowHistory,
            "open" if !arg.is_empty() => AppEvent::OpenRecord(arg.to_string()),
            "evidence" => AppEvent::ShowEvidence,
            "delete" if !arg.is_empty() => AppEvent::DeleteRecord(arg.to_string()),
            "clear" => AppEvent::ClearHistory,
            "status" => AppEvent::ShowStatus,
            "quit" | "exit" => AppEvent::Quit,
            other => return Err(format!("Unknown or incomplete command: /{other}")),
        };

        Ok(Some(event))
    }
}
