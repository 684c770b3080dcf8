use thiserror::Error;

/// The main error type for scanning, parsing and evaluating case configurations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfError {
    /// Raised when no token rule matches at the current position.
    #[error("[CASECONF] Lex Error at {line}:{column}: invalid input '{fragment}'{}", suffix(.hint, .code))]
    Lex {
        fragment: String,
        line: usize,
        column: usize,
        hint: Option<String>,
        code: Option<u32>,
    },

    /// Raised when no production applies to the current token.
    #[error("[CASECONF] Syntax Error at {line}:{column}: unexpected {kind} token '{value}'{}", suffix(.hint, .code))]
    Syntax {
        kind: String,
        value: String,
        line: usize,
        column: usize,
        hint: Option<String>,
        code: Option<u32>,
    },

    #[error("[CASECONF] Variable \"{name}\" already exists in this block{}", suffix(.hint, .code))]
    DuplicateName {
        name: String,
        hint: Option<String>,
        code: Option<u32>,
    },

    #[error("[CASECONF] Variable \"{name}\" does not exist in this block{}", suffix(.hint, .code))]
    MissingVariable {
        name: String,
        hint: Option<String>,
        code: Option<u32>,
    },

    /// Operand or conversion of the wrong type.
    #[error("[CASECONF] Type Error: {message}{}", suffix(.hint, .code))]
    Type {
        message: String,
        hint: Option<String>,
        code: Option<u32>,
    },

    /// Operand of the right type but an unusable value (division by zero, overflow, cycles).
    #[error("[CASECONF] Value Error: {message}{}", suffix(.hint, .code))]
    Value {
        message: String,
        hint: Option<String>,
        code: Option<u32>,
    },

    #[error("[CASECONF] File Error '{path}': {message}{}", suffix(.hint, .code))]
    File {
        message: String,
        path: String,
        hint: Option<String>,
        code: Option<u32>,
    },
}

fn suffix(hint: &Option<String>, code: &Option<u32>) -> String {
    format!(
        "{}{}",
        hint.as_ref().map_or(String::new(), |h| format!(" Hint: {}", h)),
        code.map_or(String::new(), |c| format!(" Code: {}", c))
    )
}

impl ConfError {
    pub fn duplicate(name: &str) -> Self {
        ConfError::DuplicateName {
            name: name.to_string(),
            hint: Some("Each name may only be assigned once per block".into()),
            code: Some(301),
        }
    }

    pub fn missing(name: &str) -> Self {
        ConfError::MissingVariable {
            name: name.to_string(),
            hint: None,
            code: Some(302),
        }
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        ConfError::Type {
            message: message.into(),
            hint: None,
            code: Some(401),
        }
    }

    pub fn value_error(message: impl Into<String>) -> Self {
        ConfError::Value {
            message: message.into(),
            hint: None,
            code: Some(402),
        }
    }

    /// Helper for file-related errors when reading or writing configs.
    pub fn file_error(message: String, path: String) -> Self {
        ConfError::File {
            message,
            path,
            hint: Some("Check file path and permissions".into()),
            code: Some(500),
        }
    }

    /// Attach or replace the hint carried by this error.
    pub fn with_hint(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        match &mut self {
            ConfError::Lex { hint, .. }
            | ConfError::Syntax { hint, .. }
            | ConfError::DuplicateName { hint, .. }
            | ConfError::MissingVariable { hint, .. }
            | ConfError::Type { hint, .. }
            | ConfError::Value { hint, .. }
            | ConfError::File { hint, .. } => *hint = Some(text),
        }
        self
    }
}

pub type Result<T> = std::result::Result<T, ConfError>;
