use crate::KeyAction;
use std::path::PathBuf;

/// Parse a slash command (without the leading `/`) and return the appropriate action
pub fn parse_slash_command(cmd: String) -> Option<KeyAction> {
    let parts: Vec<&str> = cmd.split_whitespace().collect();
    if parts.is_empty() {
        return None;
    }

    match parts[0] {
        "new" => Some(KeyAction::SlashCommandNew),
        "kb" => match parts.get(1).copied() {
            None | Some("list") => Some(KeyAction::SlashCommandKbList),
            Some("use") if parts.len() > 2 => Some(KeyAction::SlashCommandKbUse { id: parts[2].to_string() }),
            Some("create") if parts.len() > 2 => Some(KeyAction::SlashCommandKbCreate {
                name: parts[2].to_string(),
                description: parts[3..].join(" "),
            }),
            Some("delete") if parts.len() > 2 => Some(KeyAction::SlashCommandKbDelete { id: parts[2].to_string() }),
            _ => None,
        },
        "rag" => match parts.get(1).copied() {
            Some("on") => Some(KeyAction::SlashCommandRag { enabled: true }),
            Some("off") => Some(KeyAction::SlashCommandRag { enabled: false }),
            _ => None,
        },
        "upload" => {
            if parts.len() > 1 {
                let paths = parts[1..].iter().map(PathBuf::from).collect();
                Some(KeyAction::SlashCommandUpload { paths })
            } else {
                None
            }
        }
        "copy" => Some(KeyAction::SlashCommandCopy),
        "regen" => Some(KeyAction::SlashCommandRegen),
        "help" => Some(KeyAction::SlashCommandHelp),
        "quit" | "exit" => Some(KeyAction::Quit),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_slash_command_new() {
        assert_eq!(parse_slash_command("new".to_string()), Some(KeyAction::SlashCommandNew));
    }

    #[test]
    fn test_parse_slash_command_kb_list() {
        assert_eq!(parse_slash_command("kb".to_string()), Some(KeyAction::SlashCommandKbList));
        assert_eq!(parse_slash_command("kb list".to_string()), Some(KeyAction::SlashCommandKbList));
    }

    #[test]
    fn test_parse_slash_command_kb_use() {
        let action = parse_slash_command("kb use kb_17".to_string());
        assert_eq!(action, Some(KeyAction::SlashCommandKbUse { id: "kb_17".to_string() }));
        assert!(parse_slash_command("kb use".to_string()).is_none());
    }

    #[test]
    fn test_parse_slash_command_kb_create() {
        let action = parse_slash_command("kb create Roasts single origin beans".to_string());
        assert_eq!(
            action,
            Some(KeyAction::SlashCommandKbCreate {
                name: "Roasts".to_string(),
                description: "single origin beans".to_string()
            })
        );

        let action = parse_slash_command("kb create Tea".to_string());
        assert!(matches!(action, Some(KeyAction::SlashCommandKbCreate { description, .. }) if description.is_empty()));
    }

    #[test]
    fn test_parse_slash_command_kb_delete() {
        let action = parse_slash_command("kb delete kb_3".to_string());
        assert_eq!(action, Some(KeyAction::SlashCommandKbDelete { id: "kb_3".to_string() }));
        assert!(parse_slash_command("kb frobnicate".to_string()).is_none());
    }

    #[test]
    fn test_parse_slash_command_rag() {
        assert_eq!(parse_slash_command("rag on".to_string()), Some(KeyAction::SlashCommandRag { enabled: true }));
        assert_eq!(parse_slash_command("rag off".to_string()), Some(KeyAction::SlashCommandRag { enabled: false }));
        assert!(parse_slash_command("rag".to_string()).is_none());
        assert!(parse_slash_command("rag maybe".to_string()).is_none());
    }

    #[test]
    fn test_parse_slash_command_upload() {
        let action = parse_slash_command("upload notes.md  menu.pdf".to_string());
        assert_eq!(
            action,
            Some(KeyAction::SlashCommandUpload { paths: vec![PathBuf::from("notes.md"), PathBuf::from("menu.pdf")] })
        );
        assert!(parse_slash_command("upload".to_string()).is_none());
    }

    #[test]
    fn test_parse_slash_command_simple() {
        assert_eq!(parse_slash_command("copy".to_string()), Some(KeyAction::SlashCommandCopy));
        assert_eq!(parse_slash_command("regen".to_string()), Some(KeyAction::SlashCommandRegen));
        assert_eq!(parse_slash_command("help".to_string()), Some(KeyAction::SlashCommandHelp));
        assert_eq!(parse_slash_command("quit".to_string()), Some(KeyAction::Quit));
    }

    #[test]
    fn test_parse_slash_command_unknown() {
        assert!(parse_slash_command("unknown_command".to_string()).is_none());
    }

    #[test]
    fn test_parse_slash_command_empty() {
        assert!(parse_slash_command("".to_string()).is_none());
        assert!(parse_slash_command("   ".to_string()).is_none());
    }
}
