use crate::commands::{CmdMessage, CmdResult};
use crate::config::RepsConfig;
use crate::error::Result;
use std::path::Path;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

/// Reads or edits `config.json` in `dir`. Changes apply from the next start.
pub fn run(dir: &Path, action: ConfigAction) -> Result<CmdResult> {
    let mut config = RepsConfig::load(dir)?;
    match action {
        ConfigAction::ShowAll => Ok(CmdResult::default().with_config(config)),
        ConfigAction::ShowKey(key) => {
            let mut result = CmdResult::default();
            match config.get(&key) {
                Some(val) => result.add_message(CmdMessage::info(val)),
                None => {
                    result.add_message(CmdMessage::error(format!("Unknown config key: {}", key)))
                }
            }
            Ok(result)
        }
        ConfigAction::Set(key, value) => {
            if let Err(e) = config.set(&key, &value) {
                let mut result = CmdResult::default();
                result.add_message(CmdMessage::error(e.to_string()));
                return Ok(result);
            }
            config.save(dir)?;
            let shown = config.get(&key).unwrap_or(value);
            let mut result = CmdResult::default().with_config(config);
            result.add_message(CmdMessage::success(format!("{} set to {}", key, shown)));
            Ok(result)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use tempfile::tempdir;

    #[test]
    fn show_all_returns_defaults() {
        let dir = tempdir().unwrap();
        let result = run(dir.path(), ConfigAction::ShowAll).unwrap();
        assert_eq!(result.config, Some(RepsConfig::default()));
    }

    #[test]
    fn set_persists_and_get_reads_back() {
        let dir = tempdir().unwrap();
        let result = run(
            dir.path(),
            ConfigAction::Set("top_k".to_string(), "4".to_string()),
        )
        .unwrap();
        assert_eq!(result.messages[0].level, MessageLevel::Success);
        assert_eq!(RepsConfig::load(dir.path()).unwrap().top_k, 4);

        let result = run(dir.path(), ConfigAction::ShowKey("top_k".to_string())).unwrap();
        assert_eq!(result.messages[0].content, "4");
    }

    #[test]
    fn invalid_values_are_reported_not_saved() {
        let dir = tempdir().unwrap();
        let result = run(
            dir.path(),
            ConfigAction::Set("max_deltas".to_string(), "zero".to_string()),
        )
        .unwrap();
        assert_eq!(result.messages[0].level, MessageLevel::Error);
        assert!(!dir.path().join(crate::config::CONFIG_FILENAME).exists());

        let result = run(dir.path(), ConfigAction::ShowKey("colour".to_string())).unwrap();
        assert_eq!(result.messages[0].level, MessageLevel::Error);
    }
}
