use clap::Parser;
use std::path::PathBuf;

const APP_DIR: &str = "money-quest";

#[derive(Debug, Clone, Parser)]
#[command(name = "money-quest", version, about = "A gamified personal-finance course")]
pub struct Config {
    /// Directory holding acts.toml and level_*.toml
    #[arg(long, env = "MONEY_QUEST_COURSE_DIR", default_value = "course")]
    pub course_dir: PathBuf,

    /// Save file [default: <data dir>/money-quest/save.json]
    #[arg(long, env = "MONEY_QUEST_SAVE_FILE")]
    pub save_file: Option<PathBuf>,

    /// Log file [default: <data dir>/money-quest/money-quest.log]
    #[arg(long, env = "MONEY_QUEST_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Wipe saved progress before starting
    #[arg(long)]
    pub reset: bool,
}

impl Config {
    pub fn save_path(&self) -> PathBuf {
        self.save_file
            .clone()
            .unwrap_or_else(|| data_dir().join("save.json"))
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| data_dir().join("money-quest.log"))
    }
}

fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_paths_win() {
        let config = Config::parse_from([
            "money-quest",
            "--course-dir",
            "/srv/course",
            "--save-file",
            "/tmp/s.json",
            "--log-file",
            "/tmp/q.log",
            "--reset",
        ]);
        assert_eq!(config.course_dir, PathBuf::from("/srv/course"));
        assert_eq!(config.save_path(), PathBuf::from("/tmp/s.json"));
        assert_eq!(config.log_path(), PathBuf::from("/tmp/q.log"));
        assert!(config.reset);
    }

    #[test]
    fn default_save_lives_in_app_dir() {
        let config = Config {
            course_dir: PathBuf::from("course"),
            save_file: None,
            log_file: None,
            reset: false,
        };
        let save = config.save_path();
        assert!(save.ends_with("money-quest/save.json"));
        assert!(config.log_path().ends_with("money-quest/money-quest.log"));
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Config::command().debug_assert();
    }
}
