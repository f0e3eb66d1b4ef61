//! Persona definitions and the role registry.
//!
//! A persona seeds a conversation's first (system) message. The
//! definition text always begins `You are {name}`, which is also how a
//! stored record is mapped back to its persona. Conversational personas
//! end with an `APPLY MARKDOWN` instruction; the printer selection keys
//! off that marker.

pub const DEFAULT_ROLE_NAME: &str = "Quill";
pub const SHELL_ROLE_NAME: &str = "Shell Command Generator";
pub const DESCRIBE_SHELL_ROLE_NAME: &str = "Shell Command Descriptor";
pub const CODE_ROLE_NAME: &str = "Code Generator";

/// Marker personas include when markdown output is expected.
pub const APPLY_MARKDOWN: &str = "APPLY MARKDOWN";

/// A named system-level instruction template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemRole {
    pub name: String,
    pub definition: String,
}

impl SystemRole {
    fn new(name: &str, definition: String) -> Self {
        Self {
            name: name.to_string(),
            definition,
        }
    }

    /// Whether this is the unspecified/default persona.
    pub fn is_default(&self) -> bool {
        self.name == DEFAULT_ROLE_NAME
    }

    /// Whether a stored initial message was produced by this persona.
    pub fn matches(&self, initial_message: &str) -> bool {
        initial_message.contains(&format!("You are {}", self.name))
    }

    /// Whether responses from this persona should be rendered as markdown.
    pub fn wants_markdown(&self) -> bool {
        self.definition.contains(APPLY_MARKDOWN)
    }
}

/// Resolves persona names to definitions and stored first messages back
/// to persona names.
pub struct RoleRegistry {
    roles: Vec<SystemRole>,
}

impl RoleRegistry {
    /// Build the built-in personas for the current platform.
    pub fn with_defaults(os_name: &str, shell_name: &str) -> Self {
        let default = format!(
            "You are {DEFAULT_ROLE_NAME}\n\
             You are a programming and system administration assistant.\n\
             You are managing {os_name} operating system with {shell_name} shell.\n\
             Provide short responses in about 100 words, unless you are explicitly asked for more details.\n\
             If you need to store any data, assume it will be stored in the conversation.\n\
             {APPLY_MARKDOWN} formatting when possible."
        );
        let shell = format!(
            "You are {SHELL_ROLE_NAME}\n\
             Provide only {shell_name} commands for {os_name} without any description.\n\
             If there is a lack of details, provide the most logical solution.\n\
             Ensure the output is a valid shell command.\n\
             If multiple steps are required, try to combine them together using &&.\n\
             Provide only plain text without Markdown formatting."
        );
        let describe_shell = format!(
            "You are {DESCRIBE_SHELL_ROLE_NAME}\n\
             Provide a terse, single sentence description of the given shell command.\n\
             Describe each argument and option of the command.\n\
             Provide short responses in about 80 words.\n\
             {APPLY_MARKDOWN} syntax for better readability."
        );
        let code = format!(
            "You are {CODE_ROLE_NAME}\n\
             Provide only code as output without any description.\n\
             Provide only code in plain text format without Markdown formatting.\n\
             If there is a lack of details, provide the most logical solution.\n\
             You are not allowed to ask for more details."
        );

        Self {
            roles: vec![
                SystemRole::new(DEFAULT_ROLE_NAME, default),
                SystemRole::new(SHELL_ROLE_NAME, shell),
                SystemRole::new(DESCRIBE_SHELL_ROLE_NAME, describe_shell),
                SystemRole::new(CODE_ROLE_NAME, code),
            ],
        }
    }

    /// Resolve a persona by name. Accepts both the CLI aliases
    /// (`default`, `shell`, `describe-shell`, `code`) and full persona
    /// names as stored in records.
    pub fn get(&self, name: &str) -> Option<&SystemRole> {
        let wanted = match name.to_lowercase().as_str() {
            "default" => DEFAULT_ROLE_NAME,
            "shell" => SHELL_ROLE_NAME,
            "describe-shell" | "describe_shell" => DESCRIBE_SHELL_ROLE_NAME,
            "code" => CODE_ROLE_NAME,
            _ => name,
        };
        self.roles.iter().find(|role| role.name == wanted)
    }

    /// The unspecified/default persona.
    pub fn default_role(&self) -> &SystemRole {
        &self.roles[0]
    }

    /// Extract the persona name encoded in a stored first message.
    ///
    /// Returns None when the first line does not carry a `You are {name}`
    /// header.
    pub fn name_from_message(&self, initial_message: &str) -> Option<String> {
        let first_line = initial_message.lines().next()?;
        first_line
            .strip_prefix("You are ")
            .map(|rest| rest.trim().to_string())
            .filter(|name| !name.is_empty())
    }
}
