//! Command parsing for the watchlist prompt

use crate::error::{Result, WatchlistError};

/// Parsed command from user input
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Add a ticker; blank input is ignored by the store
    Add { input: String },
    /// Remove a ticker
    Remove { input: String },
    /// Open the detail view for a ticker on the list
    View { input: String },
    /// Close the detail view
    Close,
    /// Re-read and re-resolve the watchlist
    List,
    /// Remove every ticker
    Clear,
    /// Show help
    Help,
    /// Exit the program
    Exit,
}

impl Command {
    /// Parse a command from user input
    ///
    /// Text without a leading `/` is treated as a ticker to add.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();

        if input.is_empty() {
            return Err(WatchlistError::CommandError("Empty input".to_string()));
        }

        let Some(rest) = input.strip_prefix('/') else {
            if input.contains(char::is_whitespace) {
                return Err(WatchlistError::CommandError("Enter one ticker at a time".to_string()));
            }
            return Ok(Command::Add {
                input: input.to_string(),
            });
        };

        let parts: Vec<&str> = rest.split_whitespace().collect();
        let Some(first) = parts.first() else {
            return Err(WatchlistError::CommandError("Empty command".to_string()));
        };

        let cmd = first.to_lowercase();
        if parts.len() > 2 {
            return Err(WatchlistError::CommandError(format!("/{cmd} takes a single ticker")));
        }
        let arg = parts.get(1).copied().unwrap_or_default().to_string();

        match cmd.as_str() {
            "add" | "a" | "hinzufügen" => Ok(Command::Add { input: arg }),
            "remove" | "rm" | "r" | "entfernen" => Ok(Command::Remove { input: arg }),
            "view" | "v" | "details" => {
                if arg.is_empty() {
                    return Err(WatchlistError::CommandError(
                        "Missing ticker for view command".to_string(),
                    ));
                }
                Ok(Command::View { input: arg })
            }
            "close" | "schließen" => Ok(Command::Close),
            "list" | "ls" | "refresh" | "liste" => Ok(Command::List),
            "clear" | "leeren" => Ok(Command::Clear),
            "help" | "h" | "?" | "hilfe" => Ok(Command::Help),
            "exit" | "quit" | "q" | "beenden" => Ok(Command::Exit),
            _ => Err(WatchlistError::CommandError(format!("Unknown command: {cmd}"))),
        }
    }

    /// Get help text for all commands
    pub fn help_text() -> &'static str {
        r"
Watchlist Commands
==================

  <ticker>               Aktie hinzufügen (Add ticker)
  /add <ticker>          Aktie hinzufügen (Add ticker)
  /remove <ticker>       Aktie entfernen (Remove ticker)
  /view <ticker>         Details anzeigen (Price chart and description)
  /close                 Details schließen (Close detail view)
  /list                  Liste aktualisieren (Refresh quotes)
  /clear                 Liste leeren (Remove all tickers)
  /help                  Hilfe (Show help)
  /exit                  Beenden (Exit)

Command Aliases:
  /a = /add        /rm, /r = /remove     /v = /view
  /ls = /list      /refresh = /list      /q = /exit
"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add() {
        let cmd = Command::parse("/add aapl").unwrap();
        assert_eq!(
            cmd,
            Command::Add {
                input: "aapl".to_string()
            }
        );

        let cmd = Command::parse("/a MSFT").unwrap();
        assert_eq!(
            cmd,
            Command::Add {
                input: "MSFT".to_string()
            }
        );
    }

    #[test]
    fn test_parse_bare_text_is_add() {
        let cmd = Command::parse("  tsla ").unwrap();
        assert_eq!(
            cmd,
            Command::Add {
                input: "tsla".to_string()
            }
        );
    }

    #[test]
    fn test_parse_missing_arg_is_blank() {
        assert_eq!(
            Command::parse("/add").unwrap(),
            Command::Add {
                input: String::new()
            }
        );
        assert_eq!(
            Command::parse("/rm").unwrap(),
            Command::Remove {
                input: String::new()
            }
        );
    }

    #[test]
    fn test_parse_view() {
        assert_eq!(
            Command::parse("/v nvda").unwrap(),
            Command::View {
                input: "nvda".to_string()
            }
        );
        assert!(Command::parse("/view").is_err());
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!(Command::parse("/refresh").unwrap(), Command::List);
        assert_eq!(Command::parse("/LS").unwrap(), Command::List);
        assert_eq!(Command::parse("/?").unwrap(), Command::Help);
        assert_eq!(Command::parse("/hilfe").unwrap(), Command::Help);
        assert_eq!(Command::parse("/quit").unwrap(), Command::Exit);
        assert_eq!(Command::parse("/close").unwrap(), Command::Close);
        assert_eq!(Command::parse("/clear").unwrap(), Command::Clear);
    }

    #[test]
    fn test_parse_rejects_several_tickers() {
        assert!(matches!(
            Command::parse("tsla aapl"),
            Err(WatchlistError::CommandError(_))
        ));
        assert!(Command::parse("/add a b").is_err());
        assert!(Command::parse("/rm msft nvda").is_err());
        assert!(Command::parse("/view x y").is_err());
    }

    #[test]
    fn test_parse_errors() {
        assert!(Command::parse("").is_err());
        assert!(Command::parse("/").is_err());
        assert!(matches!(
            Command::parse("/analyze AAPL"),
            Err(WatchlistError::CommandError(_))
        ));
    }

    #[test]
    fn test_help_lists_commands() {
        let help = Command::help_text();
        for cmd in ["/add", "/remove", "/view", "/close", "/list", "/clear", "/exit"] {
            assert!(help.contains(cmd), "missing {cmd}");
        }
    }
}
