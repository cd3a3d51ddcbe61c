//! Credentials file for the query API.
//!
//! The file is a small INI-style document with one section per API instance:
//!
//! ```text
//! [instance.live]
//! url=https://app.dimensions.ai
//! login=me@example.org
//! password=secret
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use dialoguer::{Confirm, Input, Password};
use regex::Regex;
use tracing::{debug, trace};

use crate::error::ConsoleError;

pub const DEFAULT_API_URL: &str = "https://app.dimensions.ai";
pub const DEFAULT_INSTANCE: &str = "live";
pub const CONFIG_DIR_NAME: &str = ".dimensions";
pub const CONFIG_FILE_NAME: &str = "dsl.ini";

const INSTANCE_PREFIX: &str = "instance.";

static SECTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[\s*([^\]\s]+)\s*\]$").expect("valid section pattern"));

static ENTRY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z_][A-Za-z0-9_.-]*)\s*=\s*(.*)$").expect("valid entry pattern")
});

/// Connection details for one API instance.
///
/// Values are stored trimmed: the config file has no quoting, so leading and
/// trailing spaces of a value cannot be represented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    pub url: String,
    pub login: String,
    pub password: String,
}

impl Instance {
    /// The instance as a config file section.
    pub fn to_section(&self, name: &str) -> String {
        format!(
            "[{INSTANCE_PREFIX}{name}]\nurl={}\nlogin={}\npassword={}\n",
            self.url, self.login, self.password
        )
    }
}

/// All instances declared in a config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsoleConfig {
    instances: BTreeMap<String, Instance>,
}

impl ConsoleConfig {
    pub fn parse(input: &str) -> Result<Self, ConsoleError> {
        let mut sections: Vec<(String, usize, BTreeMap<String, String>)> = Vec::new();

        for (index, raw) in input.lines().enumerate() {
            let line_no = index + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if let Some(caps) = SECTION_RE.captures(line) {
                trace!("config section '{}' at line {}", &caps[1], line_no);
                sections.push((caps[1].to_string(), line_no, BTreeMap::new()));
            } else if let Some(caps) = ENTRY_RE.captures(line) {
                let Some((_, _, entries)) = sections.last_mut() else {
                    return Err(ConsoleError::Config {
                        line: line_no,
                        message: format!("entry '{}' outside of a section", &caps[1]),
                    });
                };
                entries.insert(caps[1].to_string(), caps[2].trim().to_string());
            } else {
                return Err(ConsoleError::Config {
                    line: line_no,
                    message: format!("expected [section] or key=value, found '{line}'"),
                });
            }
        }

        let mut instances = BTreeMap::new();
        for (section, line_no, mut entries) in sections {
            let Some(name) = section.strip_prefix(INSTANCE_PREFIX) else {
                debug!("ignoring config section [{}]", section);
                continue;
            };

            let mut required = |key: &str| {
                entries.remove(key).ok_or_else(|| ConsoleError::Config {
                    line: line_no,
                    message: format!("section [{section}] has no '{key}'"),
                })
            };
            let login = required("login")?;
            let password = required("password")?;
            let url = entries
                .remove("url")
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string());

            instances.insert(
                name.to_string(),
                Instance {
                    url,
                    login,
                    password,
                },
            );
        }

        Ok(Self { instances })
    }

    pub fn load(path: &Path) -> Result<Self, ConsoleError> {
        Self::parse(&std::fs::read_to_string(path)?)
    }

    pub fn instance(&self, name: &str) -> Result<&Instance, ConsoleError> {
        self.instances
            .get(name)
            .ok_or_else(|| ConsoleError::MissingInstance(name.to_string()))
    }

    pub fn instance_names(&self) -> impl Iterator<Item = &str> {
        self.instances.keys().map(String::as_str)
    }
}

/// `~/.dimensions` and `~/.dimensions/dsl.ini`, if a home directory is known.
pub fn default_config_paths() -> Option<(PathBuf, PathBuf)> {
    let dir = dirs::home_dir()?.join(CONFIG_DIR_NAME);
    let file = dir.join(CONFIG_FILE_NAME);
    Some((dir, file))
}

/// Interaction needed to bootstrap a config file.
pub trait Prompter {
    fn notify(&mut self, message: &str);
    fn confirm(&mut self, question: &str) -> Result<bool, ConsoleError>;
    fn input(&mut self, prompt: &str, default: Option<&str>) -> Result<String, ConsoleError>;
    /// Hidden input, asked twice.
    fn password(&mut self, prompt: &str) -> Result<String, ConsoleError>;
}

/// Prompts on the controlling terminal.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn notify(&mut self, message: &str) {
        eprintln!("{message}");
    }

    fn confirm(&mut self, question: &str) -> Result<bool, ConsoleError> {
        Ok(Confirm::new()
            .with_prompt(question)
            .default(false)
            .interact()?)
    }

    fn input(&mut self, prompt: &str, default: Option<&str>) -> Result<String, ConsoleError> {
        let mut input = Input::<String>::new().with_prompt(prompt);
        if let Some(default) = default {
            input = input.default(default.to_string());
        }
        Ok(input.interact_text()?)
    }

    fn password(&mut self, prompt: &str) -> Result<String, ConsoleError> {
        Ok(Password::new()
            .with_prompt(prompt)
            .with_confirmation("Repeat password", "Error: the passwords don't match.")
            .interact()?)
    }
}

/// Create `dir` and ask for the credentials to write into `file`.
///
/// An existing file is only replaced after confirmation. Returns `Ok(false)`
/// when the user declines, `Ok(true)` once the file is written.
pub fn init_config_folder(
    dir: &Path,
    file: &Path,
    prompter: &mut dyn Prompter,
) -> Result<bool, ConsoleError> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)?;
        debug!("created {}", dir.display());
    }

    if file.exists() {
        prompter.notify(&format!(
            "The config file `{}` already exists.",
            file.display()
        ));
        if !prompter.confirm("Overwrite?")? {
            prompter.notify("Goodbye");
            return Ok(false);
        }
    }

    let url = prompter.input(
        "Please enter the API URL or leave blank for default",
        Some(DEFAULT_API_URL),
    )?;
    let login = prompter.input("Please enter your username", None)?;
    let password = prompter.password("Please enter your password")?;

    let instance = Instance {
        url: if url.trim().is_empty() {
            DEFAULT_API_URL.to_string()
        } else {
            url.trim().to_string()
        },
        login: login.trim().to_string(),
        password: password.trim().to_string(),
    };
    std::fs::write(file, instance.to_section(DEFAULT_INSTANCE))?;
    prompter.notify(&format!("Created {}", file.display()));

    Ok(true)
}
